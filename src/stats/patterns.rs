//! Shape of the daily usage distribution: weekly rhythm, baseload, skew.

use serde::Serialize;

use super::descriptive::{mean, percentile_sorted};
use crate::usage::DailyTotal;

/// Population stddev of the seven day-of-week means as a percentage of the
/// overall mean.
///
/// Days of the week without samples take the overall mean so they do not pull
/// the spread toward zero. Zero mean yields 0.
pub fn weekly_pattern_strength(days: &[DailyTotal]) -> f64 {
    let usages: Vec<f64> = days.iter().map(|d| d.total_usage).collect();
    let overall = mean(&usages);
    if overall == 0.0 {
        return 0.0;
    }

    let mut sums = [0.0_f64; 7];
    let mut counts = [0_usize; 7];
    for d in days {
        let dow = d.day_of_week() as usize;
        sums[dow] += d.total_usage;
        counts[dow] += 1;
    }

    let variance = (0..7)
        .map(|i| {
            let m = if counts[i] > 0 {
                sums[i] / counts[i] as f64
            } else {
                overall
            };
            (m - overall).powi(2)
        })
        .sum::<f64>()
        / 7.0;
    variance.sqrt() / overall * 100.0
}

/// Always-on consumption estimate and peak-to-base ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaseloadEstimate {
    pub p5: f64,
    pub p10: f64,
    pub p95: f64,
    /// Mean of the 5th and 10th percentile (kWh/day).
    pub baseload: f64,
    /// Baseload as a share of mean daily usage (%).
    pub baseload_pct_of_mean: f64,
    /// p95 / max(p5, floor).
    pub peak_to_base: f64,
}

/// Estimates baseload from an ascending series of daily totals.
pub fn baseload_estimate(sorted: &[f64], floor_kwh: f64) -> BaseloadEstimate {
    let p5 = percentile_sorted(sorted, 0.05);
    let p10 = percentile_sorted(sorted, 0.10);
    let p95 = percentile_sorted(sorted, 0.95);
    let baseload = (p5 + p10) / 2.0;
    let m = mean(sorted);
    let base = p5.max(floor_kwh);

    BaseloadEstimate {
        p5,
        p10,
        p95,
        baseload,
        baseload_pct_of_mean: if m > 0.0 { baseload / m * 100.0 } else { 0.0 },
        peak_to_base: if base > 0.0 { p95 / base } else { 0.0 },
    }
}

/// Which side of the median the mean falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewDirection {
    /// Mean above median: occasional heavy days.
    Right,
    /// Mean below median: occasional light days.
    Left,
    Symmetric,
}

impl SkewDirection {
    pub fn from_mean_median(mean: f64, median: f64) -> Self {
        if mean > median {
            SkewDirection::Right
        } else if mean < median {
            SkewDirection::Left
        } else {
            SkewDirection::Symmetric
        }
    }
}
