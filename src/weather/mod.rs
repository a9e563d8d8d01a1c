//! Daily temperature series and its relation to usage.

pub mod correlation;
pub mod degree_days;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use correlation::{WeatherCorrelation, correlate};
pub use degree_days::{DegreeDays, degree_days};

/// One day of observed temperatures in °F.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub temp_mean: f64,
}

/// Mean temperature by date. Later entries for the same date win; non-finite
/// means are dropped.
pub fn mean_temps_by_date(weather: &[DailyWeather]) -> BTreeMap<NaiveDate, f64> {
    weather
        .iter()
        .filter(|w| w.temp_mean.is_finite())
        .map(|w| (w.date, w.temp_mean))
        .collect()
}
