//! Folds interval records into daily, monthly and hour-of-week buckets.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::types::{
    DAY_NAMES, DailyTotal, HighUsageDay, HourOfWeekBucket, HourOfWeekKey, HourlyAverage,
    MonthKey, MonthlyBucket, MonthlyStats, UsageRecord, UsageTotals, WeekdayAverage,
    WeekdayProfile,
};
use crate::rounding::{round_hundredths, round_thousandths};
use crate::tariff::{CostCalculator, RatePlan, Tariff};

/// Applies the rate classifier to each interval while bucketing it.
#[derive(Debug, Clone, Copy)]
pub struct UsageAggregator<'a> {
    tariff: &'a Tariff,
}

impl<'a> UsageAggregator<'a> {
    pub fn new(tariff: &'a Tariff) -> Self {
        Self { tariff }
    }

    /// Buckets `records` in any order.
    ///
    /// Each record lands in exactly one monthly, one hour-of-week and one daily
    /// bucket, chosen by its own date and start hour. Monthly time-of-use energy
    /// cost is accumulated per interval at that interval's rate.
    pub fn aggregate(&self, records: &[UsageRecord]) -> UsageSummary {
        let mut summary = UsageSummary::default();

        for r in records {
            let usage = r.usage_kwh();
            let hour = r.hour();
            let dow = r.day_of_week();
            let month0 = r.month0();
            let is_peak = self.tariff.is_peak_hour(hour, dow);

            let month = summary.monthly.entry(r.month_key()).or_default();
            month.total_usage += usage;
            month.interval_count += 1;
            if is_peak {
                month.peak_usage += usage;
            } else {
                month.off_peak_usage += usage;
            }
            if self.tariff.is_super_off_peak_hour(hour) {
                month.super_off_peak_usage += usage;
            }
            month.tou_energy_cost += usage * self.tariff.rate(RatePlan::TimeOfUse, month0, hour, dow);
            month.tou_super_energy_cost +=
                usage * self.tariff.rate(RatePlan::TimeOfUseSuper, month0, hour, dow);

            let cell = summary
                .hour_of_week
                .entry(HourOfWeekKey { weekday: dow, hour })
                .or_default();
            cell.sum += usage;
            cell.count += 1;

            let day = summary
                .daily
                .entry(r.date())
                .or_insert_with(|| DailyTotal::new(r.date()));
            day.total_usage += usage;
            day.interval_count += 1;
            if is_peak {
                day.peak_usage += usage;
            } else {
                day.off_peak_usage += usage;
            }
            if let Some(slot) = day.hourly_usage.get_mut(hour as usize) {
                *slot += usage;
            }
        }

        debug!(
            records = records.len(),
            months = summary.monthly.len(),
            days = summary.daily.len(),
            "aggregated usage"
        );
        summary
    }
}

/// Bucketed usage. All maps iterate in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageSummary {
    pub monthly: BTreeMap<MonthKey, MonthlyBucket>,
    pub hour_of_week: BTreeMap<HourOfWeekKey, HourOfWeekBucket>,
    pub daily: BTreeMap<NaiveDate, DailyTotal>,
}

impl UsageSummary {
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    /// Per-month usage and plan costs, chronologically sorted.
    pub fn monthly_stats(&self, calculator: &CostCalculator<'_>) -> Vec<MonthlyStats> {
        self.monthly
            .iter()
            .map(|(key, b)| MonthlyStats {
                month: *key,
                total_usage: round_hundredths(b.total_usage),
                flat_cost: round_hundredths(calculator.flat_rate_cost(b.total_usage)),
                tou_cost: round_hundredths(calculator.month_cost(RatePlan::TimeOfUse, b)),
                tou_super_cost: round_hundredths(calculator.month_cost(RatePlan::TimeOfUseSuper, b)),
                peak_usage: round_hundredths(b.peak_usage),
                off_peak_usage: round_hundredths(b.off_peak_usage),
            })
            .collect()
    }

    /// Mean interval usage per hour-of-week cell, ordered by weekday then hour.
    pub fn hourly_averages(&self) -> Vec<HourlyAverage> {
        self.hour_of_week
            .iter()
            .map(|(key, b)| HourlyAverage {
                hour: key.hour,
                weekday: key.weekday,
                average: round_thousandths(b.average()),
            })
            .collect()
    }

    /// Daily totals in chronological order.
    pub fn daily_totals(&self) -> Vec<DailyTotal> {
        self.daily.values().cloned().collect()
    }

    /// Unrounded totals across every bucket.
    pub fn totals(&self) -> UsageTotals {
        let mut totals = UsageTotals {
            day_count: self.daily.len(),
            month_count: self.monthly.len(),
            ..UsageTotals::default()
        };
        for b in self.monthly.values() {
            totals.total_usage += b.total_usage;
            totals.peak_usage += b.peak_usage;
            totals.off_peak_usage += b.off_peak_usage;
            totals.super_off_peak_usage += b.super_off_peak_usage;
            totals.interval_count += b.interval_count;
        }
        totals
    }

    /// Average daily usage per day of week, over distinct dates.
    pub fn weekday_profile(&self) -> WeekdayProfile {
        let mut sums = [0.0_f64; 7];
        let mut counts = [0_usize; 7];
        for day in self.daily.values() {
            let dow = day.day_of_week() as usize;
            sums[dow] += day.total_usage;
            counts[dow] += 1;
        }

        let averages: [f64; 7] = std::array::from_fn(|i| {
            if counts[i] > 0 {
                sums[i] / counts[i] as f64
            } else {
                0.0
            }
        });
        let days: Vec<WeekdayAverage> = (0..7)
            .map(|i| WeekdayAverage {
                weekday: i as u32,
                name: DAY_NAMES[i],
                average_usage: round_hundredths(averages[i]),
                day_count: counts[i],
            })
            .collect();

        let weekday_average = averages[1..6].iter().sum::<f64>() / 5.0;
        let weekend_average = (averages[0] + averages[6]) / 2.0;
        let weekend_difference_pct = if weekday_average > 0.0 {
            (weekend_average - weekday_average) / weekday_average * 100.0
        } else {
            0.0
        };

        WeekdayProfile {
            days,
            weekday_average: round_hundredths(weekday_average),
            weekend_average: round_hundredths(weekend_average),
            weekend_difference_pct: round_hundredths(weekend_difference_pct),
        }
    }

    /// The `n` highest-usage days, largest first. Ties go to the earlier date.
    pub fn high_usage_days(&self, n: usize) -> Vec<HighUsageDay> {
        if self.daily.is_empty() {
            return Vec::new();
        }
        let mean =
            self.daily.values().map(|d| d.total_usage).sum::<f64>() / self.daily.len() as f64;

        let mut days: Vec<&DailyTotal> = self.daily.values().collect();
        days.sort_by(|a, b| b.total_usage.total_cmp(&a.total_usage));

        days.into_iter()
            .take(n)
            .map(|d| HighUsageDay {
                date: d.date,
                usage: round_hundredths(d.total_usage),
                peak_usage: round_hundredths(d.peak_usage),
                pct_above_average: if mean > 0.0 {
                    round_hundredths((d.total_usage - mean) / mean * 100.0)
                } else {
                    0.0
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn record(y: i32, m: u32, d: u32, hour: u32, usage: f64) -> UsageRecord {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let start = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(hour, 14, 0).unwrap();
        UsageRecord::new(date, start, end, usage)
    }

    #[test]
    fn empty_input_gives_empty_summary() {
        let tariff = Tariff::default();
        let summary = UsageAggregator::new(&tariff).aggregate(&[]);
        assert!(summary.is_empty());
        assert!(summary.monthly.is_empty());
        assert!(summary.hour_of_week.is_empty());
        assert_eq!(summary.totals(), UsageTotals::default());
        assert!(summary.high_usage_days(5).is_empty());
    }

    #[test]
    fn peak_plus_off_peak_equals_total() {
        let tariff = Tariff::default();
        let records: Vec<UsageRecord> = (0..24)
            .map(|h| record(2025, 1, 15, h, 0.1 + h as f64 * 0.01))
            .collect();
        let summary = UsageAggregator::new(&tariff).aggregate(&records);
        for b in summary.monthly.values() {
            assert!((b.peak_usage + b.off_peak_usage - b.total_usage).abs() < 0.01);
        }
        for d in summary.daily.values() {
            assert!((d.peak_usage + d.off_peak_usage - d.total_usage).abs() < 0.01);
        }
    }

    #[test]
    fn records_land_in_their_own_month() {
        let tariff = Tariff::default();
        let records = vec![
            record(2025, 2, 1, 12, 1.0),
            record(2025, 1, 31, 23, 2.0),
            record(2024, 12, 31, 12, 4.0),
        ];
        let summary = UsageAggregator::new(&tariff).aggregate(&records);
        let keys: Vec<String> = summary.monthly.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["2024-12", "2025-01", "2025-02"]);
        assert_eq!(summary.monthly[&MonthKey { year: 2025, month: 1 }].total_usage, 2.0);
    }

    #[test]
    fn tou_cost_uses_each_interval_rate() {
        let tariff = Tariff::default();
        // Wednesday in July: 08:00 is off-peak under TOU, peak under TOU+Super
        let records = vec![record(2025, 7, 16, 8, 1.0), record(2025, 7, 16, 18, 1.0)];
        let summary = UsageAggregator::new(&tariff).aggregate(&records);
        let b = &summary.monthly[&MonthKey { year: 2025, month: 7 }];
        assert!((b.tou_energy_cost - (0.13 + 0.36)).abs() < 1e-9);
        assert!((b.tou_super_energy_cost - (0.33 + 0.33)).abs() < 1e-9);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let tariff = Tariff::default();
        let mut records: Vec<UsageRecord> = (1..=10)
            .flat_map(|d| (0..24).map(move |h| record(2025, 3, d, h, (d * h) as f64 * 0.01)))
            .collect();
        let agg = UsageAggregator::new(&tariff);
        let forward = agg.aggregate(&records);
        records.reverse();
        let backward = agg.aggregate(&records);
        assert_eq!(forward.daily.keys().collect::<Vec<_>>(), backward.daily.keys().collect::<Vec<_>>());
        let calc = CostCalculator::new(&tariff);
        assert_eq!(forward.monthly_stats(&calc), backward.monthly_stats(&calc));
        assert_eq!(forward.hourly_averages(), backward.hourly_averages());
    }

    #[test]
    fn weekend_difference_uses_unrounded_averages() {
        let tariff = Tariff::default();
        // Mon 2025-01-20 through Fri at 1.004 kWh, Sat and Sun at 2 kWh
        let mut records: Vec<UsageRecord> = (20..=24).map(|d| record(2025, 1, d, 12, 1.004)).collect();
        records.push(record(2025, 1, 25, 12, 2.0));
        records.push(record(2025, 1, 26, 12, 2.0));
        let profile = UsageAggregator::new(&tariff).aggregate(&records).weekday_profile();

        assert_eq!(profile.days[1].average_usage, 1.0);
        assert_eq!(profile.weekday_average, 1.0);
        // (2 - 1.004) / 1.004, not (2 - 1) / 1
        assert_eq!(profile.weekend_difference_pct, 99.2);
    }

    #[test]
    fn hourly_averages_keep_thousandths() {
        let tariff = Tariff::default();
        let records = vec![record(2025, 1, 15, 3, 0.0236)];
        let hourly = UsageAggregator::new(&tariff).aggregate(&records).hourly_averages();
        assert_eq!(hourly.len(), 1);
        assert_eq!(hourly[0].average, 0.024);
    }

    #[test]
    fn weekday_profile_counts_distinct_dates() {
        let tariff = Tariff::default();
        // Sat 2025-01-18 and Sun 2025-01-19 at 10 kWh; Mon 2025-01-20 at 5 kWh
        let records = vec![
            record(2025, 1, 18, 12, 6.0),
            record(2025, 1, 18, 13, 4.0),
            record(2025, 1, 19, 12, 10.0),
            record(2025, 1, 20, 12, 5.0),
        ];
        let profile = UsageAggregator::new(&tariff).aggregate(&records).weekday_profile();
        assert_eq!(profile.days[6].average_usage, 10.0);
        assert_eq!(profile.days[6].day_count, 1);
        assert_eq!(profile.days[0].average_usage, 10.0);
        assert_eq!(profile.days[1].average_usage, 5.0);
        assert_eq!(profile.weekday_average, 1.0);
        assert_eq!(profile.weekend_average, 10.0);
        assert_eq!(profile.weekend_difference_pct, 900.0);
    }

    #[test]
    fn high_usage_days_ranked() {
        let tariff = Tariff::default();
        let records = vec![
            record(2025, 1, 1, 12, 1.0),
            record(2025, 1, 2, 12, 3.0),
            record(2025, 1, 3, 12, 2.0),
        ];
        let top = UsageAggregator::new(&tariff).aggregate(&records).high_usage_days(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(top[0].pct_above_average, 50.0);
        assert_eq!(top[1].usage, 2.0);
    }
}
