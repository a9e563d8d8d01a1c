//! Residential electricity tariffs: parameter table, rate classifier, cost calculator.

mod classifier;
pub mod cost;
mod window;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TariffConfig;

pub use classifier::is_winter_month;
pub use cost::{CostCalculator, PlanComparison, PlanCosts, PlanEstimate, WhatIfShift};
pub use window::HourWindow;

/// The three residential rate schedules under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatePlan {
    /// Schedule 7: tiered flat rate.
    Flat,
    /// Schedule 307: peak and off-peak.
    TimeOfUse,
    /// Schedule 327: peak, mid-peak and super off-peak.
    TimeOfUseSuper,
}

impl RatePlan {
    /// All plans in display order.
    pub const ALL: [RatePlan; 3] = [RatePlan::Flat, RatePlan::TimeOfUse, RatePlan::TimeOfUseSuper];

    /// Published schedule number.
    pub fn schedule(self) -> &'static str {
        match self {
            RatePlan::Flat => "Schedule 7",
            RatePlan::TimeOfUse => "Schedule 307",
            RatePlan::TimeOfUseSuper => "Schedule 327",
        }
    }
}

impl fmt::Display for RatePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RatePlan::Flat => "Flat Rate",
            RatePlan::TimeOfUse => "Time-of-Use",
            RatePlan::TimeOfUseSuper => "TOU + Super Off-Peak",
        };
        write!(f, "{name} ({})", self.schedule())
    }
}

impl FromStr for RatePlan {
    type Err = String;

    /// Accepts the serialized names plus the `tou` / `tou-super` short forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(RatePlan::Flat),
            "time-of-use" | "tou" => Ok(RatePlan::TimeOfUse),
            "time-of-use-super" | "tou-super" => Ok(RatePlan::TimeOfUseSuper),
            other => Err(format!(
                "unknown rate plan \"{other}\" (expected flat, tou, or tou-super)"
            )),
        }
    }
}

/// Rate period an interval falls into under a given plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePeriod {
    /// Elevated weekday window.
    Peak,
    /// Default window (called mid-peak under the three-period plan).
    OffPeak,
    /// Nightly lowest-price window.
    SuperOffPeak,
    /// No time dependency (flat plan).
    Standard,
}

/// An immutable tariff parameter table.
///
/// Wraps a validated [`TariffConfig`] and is passed by reference to the
/// aggregator and cost calculator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tariff {
    config: TariffConfig,
}

impl Tariff {
    pub fn new(config: TariffConfig) -> Self {
        Self { config }
    }

    /// Underlying parameter table.
    pub fn config(&self) -> &TariffConfig {
        &self.config
    }

    /// Fixed monthly basic charge ($).
    pub fn basic_charge(&self) -> f64 {
        self.config.basic_charge
    }

    /// Label of the rate period these parameters were published for.
    pub fn effective_date(&self) -> &str {
        &self.config.effective_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_rates_are_in_plausible_ranges() {
        let t = Tariff::default();
        let c = t.config();
        assert!((5.0..12.0).contains(&c.basic_charge));
        assert!((0.15..0.25).contains(&c.flat.tier1_rate));
        assert!((0.18..0.28).contains(&c.flat.tier2_rate));
        assert!(c.flat.tier2_rate > c.flat.tier1_rate);
        assert!((0.45..0.65).contains(&c.tou.peak_winter));
        assert!((0.25..0.45).contains(&c.tou.peak_summer));
        assert!((0.08..0.18).contains(&c.tou.off_peak));
        assert!((0.05..0.12).contains(&c.tou_super.super_off_peak));
    }

    #[test]
    fn super_off_peak_is_cheapest_rate() {
        let c = Tariff::default().config().clone();
        let others = [
            c.flat.tier1_rate,
            c.tou.off_peak,
            c.tou_super.mid_peak_summer,
            c.tou_super.mid_peak_winter,
            c.tou_super.peak_summer,
        ];
        assert!(others.iter().all(|r| c.tou_super.super_off_peak < *r));
    }

    #[test]
    fn plan_display_names_schedule() {
        assert_eq!(RatePlan::Flat.to_string(), "Flat Rate (Schedule 7)");
        assert_eq!(RatePlan::TimeOfUseSuper.schedule(), "Schedule 327");
    }

    #[test]
    fn plan_parses_short_names() {
        assert_eq!("tou".parse::<RatePlan>(), Ok(RatePlan::TimeOfUse));
        assert_eq!("TOU-Super".parse::<RatePlan>(), Ok(RatePlan::TimeOfUseSuper));
        assert_eq!("flat".parse::<RatePlan>(), Ok(RatePlan::Flat));
        assert!("schedule-7".parse::<RatePlan>().is_err());
    }

    #[test]
    fn plan_serializes_kebab_case() {
        let json = serde_json::to_string(&RatePlan::TimeOfUseSuper).ok();
        assert_eq!(json.as_deref(), Some("\"time-of-use-super\""));
    }
}
