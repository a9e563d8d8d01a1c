//! Linear trend of daily usage over time.

use serde::Serialize;

use super::regression::linear_fit;

/// Monthly drift below this magnitude (kWh/day per month) reads as stable.
const STABLE_BAND: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// OLS slope of daily usage against a sequential day index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    /// kWh/day change per day.
    pub slope_per_day: f64,
    /// kWh/day change per month.
    pub per_month: f64,
    pub direction: TrendDirection,
}

/// Fits `values` (chronological) against their index.
pub fn linear_trend(values: &[f64], days_per_month: f64) -> Trend {
    let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    let slope = linear_fit(&xs, values).map_or(0.0, |fit| fit.slope);
    let per_month = slope * days_per_month;
    let direction = if per_month > STABLE_BAND {
        TrendDirection::Up
    } else if per_month < -STABLE_BAND {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };
    Trend {
        slope_per_day: slope,
        per_month,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_series() {
        let v: Vec<f64> = (0..30).map(|i| 10.0 + 0.1 * i as f64).collect();
        let t = linear_trend(&v, 30.0);
        assert!((t.slope_per_day - 0.1).abs() < 1e-9);
        assert!((t.per_month - 3.0).abs() < 1e-9);
        assert_eq!(t.direction, TrendDirection::Up);
    }

    #[test]
    fn flat_and_tiny_input_is_stable() {
        assert_eq!(linear_trend(&[5.0; 20], 30.0).direction, TrendDirection::Stable);
        assert_eq!(linear_trend(&[5.0], 30.0).per_month, 0.0);
    }
}
