//! Bundles every daily-usage statistic into one report.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use super::anomaly::{Anomaly, detect_anomalies};
use super::change_point::{ChangePointScan, detect_change_points};
use super::descriptive::{coefficient_of_variation, mean, median_sorted, sorted, std_dev};
use super::patterns::{BaseloadEstimate, SkewDirection, baseload_estimate, weekly_pattern_strength};
use super::regression::lag1_autocorrelation;
use super::seasonal::{ColdWarmSplit, SeasonalComparison, cold_warm_split, seasonal_comparison};
use super::trend::{Trend, linear_trend};
use crate::config::AnalysisConfig;
use crate::usage::DailyTotal;
use crate::weather::{DailyWeather, DegreeDays, WeatherCorrelation, correlate, degree_days};

/// Weekly pattern strength (%) above which usage clearly depends on the day.
const STRONG_WEEKLY_PATTERN_PCT: f64 = 10.0;

/// Day-to-day consistency bucket derived from the coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variability {
    /// CV below 20 %.
    Consistent,
    /// CV from 20 % to 40 %.
    Moderate,
    /// CV of 40 % or more.
    High,
}

impl Variability {
    pub fn from_cv(cv: f64) -> Self {
        if cv < 20.0 {
            Variability::Consistent
        } else if cv < 40.0 {
            Variability::Moderate
        } else {
            Variability::High
        }
    }
}

/// Statistics over the daily usage series, optionally joined with weather.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageStatistics {
    pub day_count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// Coefficient of variation (%).
    pub cv: f64,
    pub variability: Variability,
    pub skew: SkewDirection,
    pub trend: Trend,
    pub autocorrelation: f64,
    pub anomalies: Vec<Anomaly>,
    /// Spread of day-of-week means as a share of the overall mean (%).
    pub weekly_pattern_strength: f64,
    pub strong_weekly_pattern: bool,
    pub baseload: BaseloadEstimate,
    pub seasonal: Option<SeasonalComparison>,
    pub cold_warm: Option<ColdWarmSplit>,
    pub weather: Option<WeatherCorrelation>,
    /// Over the weather days that have usage.
    pub degree_days: Option<DegreeDays>,
    pub change_points: ChangePointScan,
}

impl UsageStatistics {
    /// Computes every statistic.
    ///
    /// Returns `None` with fewer than `cfg.statistics.min_days` days. Input
    /// need not be sorted.
    pub fn compute(
        days: &[DailyTotal],
        weather: &[DailyWeather],
        cfg: &AnalysisConfig,
    ) -> Option<Self> {
        let s = &cfg.statistics;
        if days.len() < s.min_days {
            debug!(days = days.len(), required = s.min_days, "not enough days for statistics");
            return None;
        }

        let mut days = days.to_vec();
        days.sort_by_key(|d| d.date);
        let usages: Vec<f64> = days.iter().map(|d| d.total_usage).collect();
        let ascending = sorted(&usages);

        let m = mean(&usages);
        let median = median_sorted(&ascending);
        let cv = coefficient_of_variation(&usages);
        let weekly = weekly_pattern_strength(&days);

        let correlation = correlate(&days, weather, &cfg.weather);
        let dates: BTreeSet<_> = days.iter().map(|d| d.date).collect();
        let observed: Vec<DailyWeather> = weather
            .iter()
            .filter(|w| dates.contains(&w.date))
            .cloned()
            .collect();
        let degree_days =
            (!observed.is_empty()).then(|| degree_days(&observed, cfg.weather.degree_day_base_f));

        let change_points = detect_change_points(
            &days,
            weather,
            correlation.as_ref(),
            &cfg.change_point,
            &cfg.weather,
        );

        Some(Self {
            day_count: days.len(),
            mean: m,
            median,
            std_dev: std_dev(&usages),
            cv,
            variability: Variability::from_cv(cv),
            skew: SkewDirection::from_mean_median(m, median),
            trend: linear_trend(&usages, s.trend_days_per_month),
            autocorrelation: lag1_autocorrelation(&usages),
            anomalies: detect_anomalies(&days, s.anomaly_z_threshold),
            weekly_pattern_strength: weekly,
            strong_weekly_pattern: weekly > STRONG_WEEKLY_PATTERN_PCT,
            baseload: baseload_estimate(&ascending, s.peak_to_base_floor_kwh),
            seasonal: seasonal_comparison(&days, s),
            cold_warm: cold_warm_split(&days, weather, &cfg.weather, s.seasonal_min_days),
            weather: correlation,
            degree_days,
            change_points,
        })
    }
}
