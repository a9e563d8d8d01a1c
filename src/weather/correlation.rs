//! Regression of daily usage on daily mean temperature.

use chrono::NaiveDate;
use serde::Serialize;

use super::{DailyWeather, mean_temps_by_date};
use crate::config::WeatherConfig;
use crate::stats::regression::{LinearFit, linear_fit, pearson};
use crate::usage::DailyTotal;

/// A day with both a usage total and a mean temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairedDay {
    pub date: NaiveDate,
    pub temp: f64,
    pub usage: f64,
}

/// Temperature sensitivity of daily usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherCorrelation {
    pub paired_days: usize,
    /// Pearson r of usage against mean temperature.
    pub r: f64,
    /// Usage (kWh/day) as a linear function of temperature (°F).
    pub fit: LinearFit,
    /// Mean temperature of the lowest-usage days.
    pub base_temp: f64,
    /// kWh/°F on days well below the base temperature.
    pub heating_slope: Option<f64>,
    /// kWh/°F on days well above the base temperature.
    pub cooling_slope: Option<f64>,
    pub has_heating: bool,
    pub has_cooling: bool,
}

/// Joins daily totals with weather on exact date.
pub fn pair_days(days: &[DailyTotal], weather: &[DailyWeather]) -> Vec<PairedDay> {
    let temps = mean_temps_by_date(weather);
    days.iter()
        .filter_map(|d| {
            temps.get(&d.date).map(|t| PairedDay {
                date: d.date,
                temp: *t,
                usage: d.total_usage,
            })
        })
        .collect()
}

fn band_slope(band: &[&PairedDay], min_days: usize) -> Option<f64> {
    if band.len() <= min_days {
        return None;
    }
    let xs: Vec<f64> = band.iter().map(|p| p.temp).collect();
    let ys: Vec<f64> = band.iter().map(|p| p.usage).collect();
    linear_fit(&xs, &ys).map(|fit| fit.slope)
}

/// Correlates usage with temperature.
///
/// Returns `None` when fewer than `min_paired_days` days pair up or every
/// paired day has the same temperature.
pub fn correlate(
    days: &[DailyTotal],
    weather: &[DailyWeather],
    cfg: &WeatherConfig,
) -> Option<WeatherCorrelation> {
    let paired = pair_days(days, weather);
    if paired.len() < cfg.min_paired_days {
        return None;
    }

    let temps: Vec<f64> = paired.iter().map(|p| p.temp).collect();
    let usages: Vec<f64> = paired.iter().map(|p| p.usage).collect();
    let fit = linear_fit(&temps, &usages)?;
    let r = pearson(&temps, &usages);

    let mut by_usage: Vec<&PairedDay> = paired.iter().collect();
    by_usage.sort_by(|a, b| a.usage.total_cmp(&b.usage));
    let take = ((paired.len() as f64 * cfg.base_temp_fraction).floor() as usize).max(1);
    let base_temp = by_usage.iter().take(take).map(|p| p.temp).sum::<f64>() / take as f64;

    let cold: Vec<&PairedDay> = paired
        .iter()
        .filter(|p| p.temp < base_temp - cfg.band_offset_f)
        .collect();
    let hot: Vec<&PairedDay> = paired
        .iter()
        .filter(|p| p.temp > base_temp + cfg.band_offset_f)
        .collect();
    let heating_slope = band_slope(&cold, cfg.min_band_days);
    let cooling_slope = band_slope(&hot, cfg.min_band_days);

    Some(WeatherCorrelation {
        paired_days: paired.len(),
        r,
        fit,
        base_temp,
        heating_slope,
        cooling_slope,
        has_heating: heating_slope.is_some_and(|s| s < -cfg.sensitivity_kwh_per_f),
        has_cooling: cooling_slope.is_some_and(|s| s > cfg.sensitivity_kwh_per_f),
    })
}
