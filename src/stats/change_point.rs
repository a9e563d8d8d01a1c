//! Sustained month-over-month shifts in daily usage.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::descriptive::mean;
use crate::config::{ChangePointConfig, WeatherConfig};
use crate::tariff::is_winter_month;
use crate::usage::{DailyTotal, MonthKey};
use crate::weather::{DailyWeather, WeatherCorrelation, mean_temps_by_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Up,
    Down,
}

/// A month whose average daily usage moved away from the previous month and
/// stayed there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangePoint {
    pub month: MonthKey,
    /// First day of the month present in the data.
    pub date: NaiveDate,
    pub before_avg: f64,
    pub after_avg: f64,
    /// Magnitude of the change from the previous month (%).
    pub change_pct: f64,
    pub direction: ChangeDirection,
}

/// Result of a change-point scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangePointScan {
    /// Whether usage was temperature-normalized before scanning.
    pub weather_adjusted: bool,
    /// Most recent first.
    pub points: Vec<ChangePoint>,
}

struct MonthAverage {
    key: MonthKey,
    first_date: NaiveDate,
    avg: f64,
    winter: bool,
}

fn pct_change(from: f64, to: f64) -> Option<f64> {
    (from != 0.0).then(|| (to - from) / from * 100.0)
}

/// Replaces each day's usage by its residual from the temperature fit,
/// re-centered on the overall mean. Days without a temperature keep their
/// usage.
fn normalize_for_weather(
    days: &[DailyTotal],
    weather: &[DailyWeather],
    correlation: &WeatherCorrelation,
) -> Vec<f64> {
    let temps = mean_temps_by_date(weather);
    let overall = mean(&days.iter().map(|d| d.total_usage).collect::<Vec<_>>());
    days.iter()
        .map(|d| match temps.get(&d.date) {
            Some(t) => overall + (d.total_usage - correlation.fit.predict(*t)),
            None => d.total_usage,
        })
        .collect()
}

fn month_averages(days: &[DailyTotal], usage: &[f64], min_days: usize) -> Vec<MonthAverage> {
    let mut groups: BTreeMap<MonthKey, (NaiveDate, Vec<f64>)> = BTreeMap::new();
    for (day, u) in days.iter().zip(usage) {
        let entry = groups
            .entry(MonthKey::from_date(day.date))
            .or_insert_with(|| (day.date, Vec::new()));
        entry.0 = entry.0.min(day.date);
        entry.1.push(*u);
    }
    groups
        .into_iter()
        .filter(|(_, (_, values))| values.len() >= min_days)
        .map(|(key, (first_date, values))| MonthAverage {
            key,
            first_date,
            avg: mean(&values),
            winter: is_winter_month(key.month0()),
        })
        .collect()
}

/// Scans chronological daily totals for persistent monthly shifts.
///
/// Usage is temperature-normalized first when a correlation is supplied,
/// the weather covers at least `weather_cfg.min_paired_days` days and
/// `|r|` exceeds `weather_cfg.adjustment_min_abs_r`. Without that
/// normalization, pairs of months on opposite sides of the winter/summer
/// boundary are not compared.
pub fn detect_change_points(
    days: &[DailyTotal],
    weather: &[DailyWeather],
    correlation: Option<&WeatherCorrelation>,
    cfg: &ChangePointConfig,
    weather_cfg: &WeatherConfig,
) -> ChangePointScan {
    if days.len() < cfg.min_daily_points {
        return ChangePointScan::default();
    }

    let adjustment = correlation.filter(|c| {
        weather.len() >= weather_cfg.min_paired_days && c.r.abs() > weather_cfg.adjustment_min_abs_r
    });
    let usage = match adjustment {
        Some(c) => normalize_for_weather(days, weather, c),
        None => days.iter().map(|d| d.total_usage).collect(),
    };
    let weather_adjusted = adjustment.is_some();

    let months = month_averages(days, &usage, cfg.min_days_per_month);
    if months.len() < cfg.min_months {
        return ChangePointScan {
            weather_adjusted,
            points: Vec::new(),
        };
    }

    let threshold = if weather_adjusted {
        cfg.weather_adjusted_min_change_pct
    } else {
        cfg.min_change_pct
    };

    let mut points = Vec::new();
    for i in 2..months.len().saturating_sub(1) {
        let (two_back, prev, curr, next) = (&months[i - 2], &months[i - 1], &months[i], &months[i + 1]);
        if !weather_adjusted && prev.winter != curr.winter {
            continue;
        }
        let Some(change) = pct_change(prev.avg, curr.avg) else {
            continue;
        };
        if change.abs() < threshold {
            continue;
        }
        let persists = pct_change(curr.avg, next.avg).is_some_and(|c| c.abs() < cfg.persistence_pct);
        let not_oscillation = pct_change(two_back.avg, curr.avg)
            .is_some_and(|c| c.abs() >= threshold * cfg.oscillation_factor);
        if persists && not_oscillation {
            points.push(ChangePoint {
                month: curr.key,
                date: curr.first_date,
                before_avg: prev.avg,
                after_avg: curr.avg,
                change_pct: change.abs(),
                direction: if change > 0.0 {
                    ChangeDirection::Up
                } else {
                    ChangeDirection::Down
                },
            });
        }
    }

    points.reverse();
    points.truncate(cfg.max_reported);
    ChangePointScan {
        weather_adjusted,
        points,
    }
}
