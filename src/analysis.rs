//! End-to-end analysis: aggregate, price, and summarize a usage export.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::rounding::round_hundredths;
use crate::stats::{TrendDirection, UsageStatistics};
use crate::tariff::{CostCalculator, PlanComparison, PlanCosts, RatePlan, Tariff, WhatIfShift};
use crate::usage::{
    HighUsageDay, HourlyAverage, MonthlyStats, UsageAggregator, UsageRecord, UsageTotals,
    WeekdayProfile,
};
use crate::weather::DailyWeather;

/// Number of highest-usage days listed in the report.
const HIGH_USAGE_DAYS: usize = 5;

/// Caller choices that are not part of the tariff or thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Plan the household is on today.
    pub current_plan: RatePlan,
    /// Share of peak usage assumed movable in the what-if estimate (0-100).
    pub shift_percent: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            current_plan: RatePlan::Flat,
            shift_percent: 20.0,
        }
    }
}

/// Everything derived from one usage export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub effective_date: String,
    pub totals: UsageTotals,
    pub monthly: Vec<MonthlyStats>,
    pub hourly: Vec<HourlyAverage>,
    pub plan_costs: PlanCosts,
    pub comparison: PlanComparison,
    pub what_if: WhatIfShift,
    pub weekday_profile: WeekdayProfile,
    pub high_usage_days: Vec<HighUsageDay>,
    /// `None` when there are too few days.
    pub statistics: Option<UsageStatistics>,
}

impl AnalysisReport {
    /// Runs the full pipeline over `records`, joining `weather` by date.
    ///
    /// Empty input yields an all-zero report.
    pub fn build(
        records: &[UsageRecord],
        weather: &[DailyWeather],
        cfg: &AnalysisConfig,
        options: AnalysisOptions,
    ) -> Self {
        let tariff = Tariff::new(cfg.tariff.clone());
        let summary = UsageAggregator::new(&tariff).aggregate(records);
        let calculator = CostCalculator::new(&tariff);

        let totals = summary.totals();
        let plan_costs = calculator.plan_costs(&summary);
        let comparison = PlanComparison::new(&plan_costs, options.current_plan);
        let what_if = WhatIfShift::evaluate(&totals, &plan_costs, options.shift_percent, &tariff);
        let statistics = UsageStatistics::compute(&summary.daily_totals(), weather, cfg);

        info!(
            records = records.len(),
            days = totals.day_count,
            months = totals.month_count,
            weather_days = weather.len(),
            best_plan = %comparison.best_plan,
            "analysis complete"
        );

        Self {
            effective_date: tariff.effective_date().to_string(),
            totals: UsageTotals {
                total_usage: round_hundredths(totals.total_usage),
                peak_usage: round_hundredths(totals.peak_usage),
                off_peak_usage: round_hundredths(totals.off_peak_usage),
                super_off_peak_usage: round_hundredths(totals.super_off_peak_usage),
                ..totals
            },
            monthly: summary.monthly_stats(&calculator),
            hourly: summary.hourly_averages(),
            plan_costs: PlanCosts {
                flat: round_hundredths(plan_costs.flat),
                tou: round_hundredths(plan_costs.tou),
                tou_super: round_hundredths(plan_costs.tou_super),
                ..plan_costs
            },
            comparison,
            what_if,
            weekday_profile: summary.weekday_profile(),
            high_usage_days: summary.high_usage_days(HIGH_USAGE_DAYS),
            statistics,
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.totals;
        writeln!(f, "--- Usage Summary ---")?;
        writeln!(
            f,
            "Period:                {} days, {} months, {} intervals",
            t.day_count, t.month_count, t.interval_count
        )?;
        writeln!(f, "Total usage:           {:.2} kWh", t.total_usage)?;
        writeln!(
            f,
            "Peak usage:            {:.2} kWh ({:.1}%)",
            t.peak_usage,
            t.peak_share_pct()
        )?;
        writeln!(f, "Off-peak usage:        {:.2} kWh", t.off_peak_usage)?;
        writeln!(f, "Super off-peak usage:  {:.2} kWh", t.super_off_peak_usage)?;

        writeln!(f)?;
        writeln!(f, "--- Plan Comparison (rates {}) ---", self.effective_date)?;
        for p in &self.comparison.plans {
            let marker = match (p.is_current, p.is_best) {
                (true, true) => " [current, best]",
                (true, false) => " [current]",
                (false, true) => " [best]",
                (false, false) => "",
            };
            writeln!(
                f,
                "{:<32} ${:>9.2} period  ${:>8.2}/mo  ${:>9.2}/yr{marker}",
                p.plan.to_string(),
                p.period_cost,
                p.monthly_cost,
                p.yearly_cost
            )?;
        }
        writeln!(
            f,
            "Switching to the best plan saves ${:.2}/yr",
            self.comparison.best_yearly_savings()
        )?;
        let w = &self.what_if;
        writeln!(
            f,
            "Shifting {:.0}% of peak usage ({:.2} kWh) saves ${:.2} more; \
             TOU vs flat: ${:.2}/mo, ${:.2}/yr",
            w.shift_percent, w.shifted_kwh, w.additional_savings, w.monthly_savings, w.yearly_savings
        )?;

        if !self.monthly.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Monthly ---")?;
            for m in &self.monthly {
                writeln!(
                    f,
                    "{}  {:>8.2} kWh  flat ${:>7.2}  tou ${:>7.2}  tou+super ${:>7.2}",
                    m.month, m.total_usage, m.flat_cost, m.tou_cost, m.tou_super_cost
                )?;
            }
        }

        let wp = &self.weekday_profile;
        writeln!(f)?;
        writeln!(
            f,
            "Weekday avg {:.2} kWh/day, weekend avg {:.2} kWh/day ({:+.0}%)",
            wp.weekday_average, wp.weekend_average, wp.weekend_difference_pct
        )?;

        match &self.statistics {
            None => write!(f, "Statistics: need at least two weeks of data"),
            Some(s) => {
                writeln!(f)?;
                writeln!(f, "--- Statistics ---")?;
                writeln!(
                    f,
                    "Daily mean/median:     {:.2} / {:.2} kWh (skew {:?})",
                    s.mean, s.median, s.skew
                )?;
                writeln!(
                    f,
                    "Std dev / CV:          {:.2} kWh / {:.1}% ({:?})",
                    s.std_dev, s.cv, s.variability
                )?;
                let trend = match s.trend.direction {
                    TrendDirection::Up => "trending up",
                    TrendDirection::Down => "trending down",
                    TrendDirection::Stable => "stable",
                };
                writeln!(
                    f,
                    "Trend:                 {:+.2} kWh/day per month ({trend})",
                    s.trend.per_month
                )?;
                writeln!(f, "Lag-1 autocorrelation: {:.2}", s.autocorrelation)?;
                writeln!(
                    f,
                    "Weekly pattern:        {:.1}%{}",
                    s.weekly_pattern_strength,
                    if s.strong_weekly_pattern { " (strong)" } else { "" }
                )?;
                writeln!(
                    f,
                    "Baseload:              {:.2} kWh/day ({:.0}% of mean), peak-to-base {:.1}x",
                    s.baseload.baseload, s.baseload.baseload_pct_of_mean, s.baseload.peak_to_base
                )?;
                writeln!(f, "Anomalies:             {}", s.anomalies.len())?;
                if let Some(season) = &s.seasonal {
                    writeln!(
                        f,
                        "Winter/summer:         {:.2} / {:.2} kWh/day (ratio {:.2})",
                        season.winter_average, season.summer_average, season.ratio
                    )?;
                }
                if let Some(c) = &s.weather {
                    writeln!(
                        f,
                        "Weather:               r = {:.2} over {} days, base {:.1} F",
                        c.r, c.paired_days, c.base_temp
                    )?;
                }
                if let Some(dd) = &s.degree_days {
                    writeln!(
                        f,
                        "Degree days (base {:.0} F): {:.0} HDD, {:.0} CDD",
                        dd.base_temp, dd.heating, dd.cooling
                    )?;
                }
                write!(
                    f,
                    "Change points:         {}{}",
                    s.change_points.points.len(),
                    if s.change_points.weather_adjusted {
                        " (weather adjusted)"
                    } else {
                        ""
                    }
                )?;
                for p in &s.change_points.points {
                    write!(
                        f,
                        "\n  {} {:?} {:.0}% ({:.2} -> {:.2} kWh/day)",
                        p.month, p.direction, p.change_pct, p.before_avg, p.after_avg
                    )?;
                }
                Ok(())
            }
        }
    }
}
