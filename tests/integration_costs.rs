mod common;

use common::{date, record};
use tariff_insights::config::AnalysisConfig;
use tariff_insights::tariff::{CostCalculator, PlanComparison, RatePlan, Tariff, WhatIfShift};
use tariff_insights::usage::UsageAggregator;

#[test]
fn flat_cost_is_continuous_and_monotonic() {
    let tariff = Tariff::default();
    let calc = CostCalculator::new(&tariff);

    let below = calc.flat_rate_cost(599.999);
    let at = calc.flat_rate_cost(600.0);
    let above = calc.flat_rate_cost(600.001);
    assert!((at - below).abs() < 0.01);
    assert!((above - at).abs() < 0.01);

    let mut prev = calc.flat_rate_cost(0.0);
    for kwh in (10..=1500).step_by(10) {
        let cost = calc.flat_rate_cost(kwh as f64);
        assert!(cost >= prev, "cost fell at {kwh} kWh");
        prev = cost;
    }
}

#[test]
fn negative_and_nan_usage_cost_only_the_basic_charge() {
    let tariff = Tariff::default();
    let calc = CostCalculator::new(&tariff);
    assert_eq!(calc.flat_rate_cost(-5.0), tariff.basic_charge());
    assert_eq!(calc.flat_rate_cost(f64::NAN), tariff.basic_charge());
}

#[test]
fn overnight_heavy_household_prefers_super_off_peak() {
    let tariff = Tariff::default();
    let calc = CostCalculator::new(&tariff);
    // 30 days of 10 kWh at 01:00 (EV charging) and 1 kWh at 12:00
    let records: Vec<_> = date(2025, 4, 1)
        .iter_days()
        .take(30)
        .flat_map(|d| [record(d, 1, 0, 10.0), record(d, 12, 0, 1.0)])
        .collect();
    let summary = UsageAggregator::new(&tariff).aggregate(&records);
    let costs = calc.plan_costs(&summary);

    assert_eq!(costs.best_plan(), RatePlan::TimeOfUseSuper);

    let comparison = PlanComparison::new(&costs, RatePlan::Flat);
    assert_eq!(comparison.current_plan, RatePlan::Flat);
    assert_eq!(comparison.best_plan, RatePlan::TimeOfUseSuper);
    assert!(comparison.best_yearly_savings() > 0.0);
    assert_eq!(comparison.plans.iter().filter(|p| p.is_best).count(), 1);
    assert_eq!(comparison.plans.iter().filter(|p| p.is_current).count(), 1);
}

#[test]
fn what_if_shift_grows_with_shift_percent() {
    let tariff = Tariff::default();
    let calc = CostCalculator::new(&tariff);
    let records: Vec<_> = date(2025, 1, 6)
        .iter_days()
        .take(5)
        .flat_map(|d| [record(d, 18, 0, 3.0), record(d, 2, 0, 1.0)])
        .collect();
    let summary = UsageAggregator::new(&tariff).aggregate(&records);
    let totals = summary.totals();
    let costs = calc.plan_costs(&summary);

    let none = WhatIfShift::evaluate(&totals, &costs, 0.0, &tariff);
    let some = WhatIfShift::evaluate(&totals, &costs, 20.0, &tariff);
    let all = WhatIfShift::evaluate(&totals, &costs, 100.0, &tariff);
    let clamped = WhatIfShift::evaluate(&totals, &costs, 250.0, &tariff);

    assert_eq!(none.additional_savings, 0.0);
    assert!(some.additional_savings > 0.0);
    assert!(all.additional_savings > some.additional_savings);
    assert_eq!(clamped.shift_percent, 100.0);
    assert!((clamped.shifted_kwh - totals.peak_usage).abs() < 0.01);
}

#[test]
fn configured_rates_change_costs() {
    let cfg = AnalysisConfig::from_toml_str(
        r#"
        [tariff]
        basic_charge = 10.0

        [tariff.flat]
        tier1_rate = 0.20
        "#,
    )
    .unwrap();
    assert!(cfg.validate().is_empty());

    let tariff = Tariff::new(cfg.tariff);
    let calc = CostCalculator::new(&tariff);
    assert!((calc.flat_rate_cost(100.0) - 30.0).abs() < 1e-9);
}
