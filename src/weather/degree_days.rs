//! Heating and cooling degree days.

use serde::Serialize;

use super::DailyWeather;

/// Accumulated degree days over a weather series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DegreeDays {
    pub base_temp: f64,
    pub heating: f64,
    pub cooling: f64,
}

/// Sums `max(base - mean, 0)` as heating and `max(mean - base, 0)` as cooling.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tariff_insights::weather::{DailyWeather, degree_days};
///
/// let day = DailyWeather {
///     date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     temp_max: 45.0,
///     temp_min: 35.0,
///     temp_mean: 40.0,
/// };
/// let dd = degree_days(&[day], 65.0);
/// assert_eq!(dd.heating, 25.0);
/// assert_eq!(dd.cooling, 0.0);
/// ```
pub fn degree_days(weather: &[DailyWeather], base_temp: f64) -> DegreeDays {
    let mut dd = DegreeDays {
        base_temp,
        ..DegreeDays::default()
    };
    for w in weather.iter().filter(|w| w.temp_mean.is_finite()) {
        dd.heating += (base_temp - w.temp_mean).max(0.0);
        dd.cooling += (w.temp_mean - base_temp).max(0.0);
    }
    dd
}
