//! Z-score outlier detection over daily usage.

use chrono::NaiveDate;
use serde::Serialize;

use super::descriptive::{mean, std_dev};
use crate::usage::DailyTotal;

/// A day whose usage deviates from the mean by more than the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub date: NaiveDate,
    pub usage: f64,
    pub z_score: f64,
}

/// Flags days with `|z| > threshold`, most extreme first.
///
/// A zero standard deviation yields no anomalies.
pub fn detect_anomalies(days: &[DailyTotal], threshold: f64) -> Vec<Anomaly> {
    let usages: Vec<f64> = days.iter().map(|d| d.total_usage).collect();
    let m = mean(&usages);
    let sd = std_dev(&usages);
    if sd == 0.0 {
        return Vec::new();
    }

    let mut anomalies: Vec<Anomaly> = days
        .iter()
        .map(|d| Anomaly {
            date: d.date,
            usage: d.total_usage,
            z_score: (d.total_usage - m) / sd,
        })
        .filter(|a| a.z_score.abs() > threshold)
        .collect();
    anomalies.sort_by(|a, b| b.z_score.abs().total_cmp(&a.z_score.abs()));
    anomalies
}
