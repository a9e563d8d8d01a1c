//! Plan costs from aggregated usage, plan comparison and load-shift estimates.

use serde::Serialize;

use super::{RatePlan, Tariff};
use crate::rounding::round_hundredths;
use crate::usage::{MonthlyBucket, UsageSummary, UsageTotals};

/// Prices aggregated usage under each plan.
#[derive(Debug, Clone, Copy)]
pub struct CostCalculator<'a> {
    tariff: &'a Tariff,
}

impl<'a> CostCalculator<'a> {
    pub fn new(tariff: &'a Tariff) -> Self {
        Self { tariff }
    }

    /// Monthly bill under the tiered flat plan, basic charge included.
    ///
    /// Usage up to the tier limit is billed at the tier-1 rate and the rest
    /// at the tier-2 rate. Negative usage is treated as zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use tariff_insights::tariff::{CostCalculator, Tariff};
    ///
    /// let tariff = Tariff::default();
    /// let calc = CostCalculator::new(&tariff);
    /// assert_eq!(calc.flat_rate_cost(0.0), tariff.basic_charge());
    /// assert!(calc.flat_rate_cost(800.0) > calc.flat_rate_cost(600.0));
    /// ```
    pub fn flat_rate_cost(&self, monthly_kwh: f64) -> f64 {
        let flat = &self.tariff.config().flat;
        let kwh = if monthly_kwh.is_finite() {
            monthly_kwh.max(0.0)
        } else {
            0.0
        };
        let energy = if kwh <= flat.tier1_limit_kwh {
            kwh * flat.tier1_rate
        } else {
            flat.tier1_limit_kwh * flat.tier1_rate + (kwh - flat.tier1_limit_kwh) * flat.tier2_rate
        };
        self.tariff.basic_charge() + energy
    }

    /// One month's bill under `plan`, basic charge included.
    pub fn month_cost(&self, plan: RatePlan, bucket: &MonthlyBucket) -> f64 {
        match plan {
            RatePlan::Flat => self.flat_rate_cost(bucket.total_usage),
            RatePlan::TimeOfUse => bucket.tou_energy_cost + self.tariff.basic_charge(),
            RatePlan::TimeOfUseSuper => bucket.tou_super_energy_cost + self.tariff.basic_charge(),
        }
    }

    /// Sums monthly bills under every plan.
    pub fn plan_costs(&self, summary: &UsageSummary) -> PlanCosts {
        let sum = |plan| {
            summary
                .monthly
                .values()
                .map(|b| self.month_cost(plan, b))
                .sum::<f64>()
        };
        PlanCosts {
            flat: sum(RatePlan::Flat),
            tou: sum(RatePlan::TimeOfUse),
            tou_super: sum(RatePlan::TimeOfUseSuper),
            month_count: summary.monthly.len(),
        }
    }
}

/// Total cost of the analyzed period under each plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlanCosts {
    pub flat: f64,
    pub tou: f64,
    pub tou_super: f64,
    /// Calendar months spanned by the data.
    pub month_count: usize,
}

impl PlanCosts {
    pub fn cost(&self, plan: RatePlan) -> f64 {
        match plan {
            RatePlan::Flat => self.flat,
            RatePlan::TimeOfUse => self.tou,
            RatePlan::TimeOfUseSuper => self.tou_super,
        }
    }

    /// Cheapest plan; ties go to the earlier plan in [`RatePlan::ALL`].
    pub fn best_plan(&self) -> RatePlan {
        RatePlan::ALL
            .into_iter()
            .min_by(|a, b| self.cost(*a).total_cmp(&self.cost(*b)))
            .unwrap_or(RatePlan::Flat)
    }

    fn per_month(&self, plan: RatePlan) -> f64 {
        if self.month_count == 0 {
            0.0
        } else {
            self.cost(plan) / self.month_count as f64
        }
    }
}

/// One plan's normalized cost within a [`PlanComparison`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEstimate {
    pub plan: RatePlan,
    pub period_cost: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    /// Yearly savings compared with the current plan (negative when dearer).
    pub yearly_savings_vs_current: f64,
    pub is_current: bool,
    pub is_best: bool,
}

/// Plan costs normalized per month and per year, relative to the current plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanComparison {
    pub current_plan: RatePlan,
    pub best_plan: RatePlan,
    pub month_count: usize,
    pub plans: Vec<PlanEstimate>,
}

impl PlanComparison {
    pub fn new(costs: &PlanCosts, current_plan: RatePlan) -> Self {
        let best_plan = costs.best_plan();
        let current_yearly = costs.per_month(current_plan) * 12.0;

        let plans = RatePlan::ALL
            .into_iter()
            .map(|plan| {
                let monthly = costs.per_month(plan);
                let yearly = monthly * 12.0;
                PlanEstimate {
                    plan,
                    period_cost: round_hundredths(costs.cost(plan)),
                    monthly_cost: round_hundredths(monthly),
                    yearly_cost: round_hundredths(yearly),
                    yearly_savings_vs_current: round_hundredths(current_yearly - yearly),
                    is_current: plan == current_plan,
                    is_best: plan == best_plan,
                }
            })
            .collect();

        Self {
            current_plan,
            best_plan,
            month_count: costs.month_count,
            plans,
        }
    }

    /// Yearly amount saved by switching from the current plan to the best one.
    pub fn best_yearly_savings(&self) -> f64 {
        self.plans
            .iter()
            .find(|p| p.is_best)
            .map_or(0.0, |p| p.yearly_savings_vs_current)
    }
}

/// Estimated effect of moving part of the peak-window usage to off-peak hours
/// under the two-period plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhatIfShift {
    /// Share of peak usage moved (0-100).
    pub shift_percent: f64,
    pub shifted_kwh: f64,
    /// Extra savings from the shift alone.
    pub additional_savings: f64,
    /// Savings vs. the flat plan over the analyzed period, shift included.
    pub period_savings: f64,
    pub monthly_savings: f64,
    pub yearly_savings: f64,
}

impl WhatIfShift {
    /// Prices the shifted energy at the mean of the seasonal peak rates versus
    /// the off-peak rate. `shift_percent` is clamped to `0..=100`.
    pub fn evaluate(
        totals: &UsageTotals,
        costs: &PlanCosts,
        shift_percent: f64,
        tariff: &Tariff,
    ) -> Self {
        let shift_percent = if shift_percent.is_finite() {
            shift_percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let tou = &tariff.config().tou;
        let avg_peak_rate = (tou.peak_winter + tou.peak_summer) / 2.0;

        let shifted_kwh = totals.peak_usage * shift_percent / 100.0;
        let additional_savings = shifted_kwh * (avg_peak_rate - tou.off_peak);
        let period_savings = (costs.flat - costs.tou) + additional_savings;
        let monthly_savings = if costs.month_count == 0 {
            0.0
        } else {
            period_savings / costs.month_count as f64
        };

        Self {
            shift_percent,
            shifted_kwh: round_hundredths(shifted_kwh),
            additional_savings: round_hundredths(additional_savings),
            period_savings: round_hundredths(period_savings),
            monthly_savings: round_hundredths(monthly_savings),
            yearly_savings: round_hundredths(monthly_savings * 12.0),
        }
    }
}
