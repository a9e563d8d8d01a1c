//! Interval records, bucket keys and per-bucket accumulators.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

/// One 15-minute interval reading from the utility export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    usage_kwh: f64,
}

impl UsageRecord {
    /// Builds a record. Non-finite or negative usage is stored as zero.
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime, usage_kwh: f64) -> Self {
        let usage_kwh = if usage_kwh.is_finite() && usage_kwh > 0.0 {
            usage_kwh
        } else {
            0.0
        };
        Self {
            date,
            start_time,
            end_time,
            usage_kwh,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn usage_kwh(&self) -> f64 {
        self.usage_kwh
    }

    /// Hour of the interval start (0-23).
    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Day of week, 0 = Sunday.
    pub fn day_of_week(&self) -> u32 {
        self.date.weekday().num_days_from_sunday()
    }

    /// 0-indexed calendar month.
    pub fn month0(&self) -> u32 {
        self.date.month0()
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// Calendar month bucket key. Orders chronologically and displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 0-indexed month, as taken by the rate classifier.
    pub fn month0(&self) -> u32 {
        self.month.saturating_sub(1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Hour-of-week bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HourOfWeekKey {
    /// 0 = Sunday.
    pub weekday: u32,
    pub hour: u32,
}

/// Per-month accumulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyBucket {
    pub total_usage: f64,
    /// Usage inside the common weekday peak window.
    pub peak_usage: f64,
    pub off_peak_usage: f64,
    /// Usage inside the nightly super off-peak window.
    pub super_off_peak_usage: f64,
    pub interval_count: usize,
    /// Σ rate × usage under the two-period plan, excluding the basic charge.
    pub tou_energy_cost: f64,
    /// Σ rate × usage under the three-period plan, excluding the basic charge.
    pub tou_super_energy_cost: f64,
}

/// Per hour-of-week accumulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourOfWeekBucket {
    pub sum: f64,
    pub count: usize,
}

impl HourOfWeekBucket {
    /// Mean interval usage; zero when empty.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Usage summed over one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_usage: f64,
    pub peak_usage: f64,
    pub off_peak_usage: f64,
    /// kWh per hour of day.
    pub hourly_usage: [f64; 24],
    pub interval_count: usize,
}

impl DailyTotal {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total_usage: 0.0,
            peak_usage: 0.0,
            off_peak_usage: 0.0,
            hourly_usage: [0.0; 24],
            interval_count: 0,
        }
    }

    /// Day of week, 0 = Sunday.
    pub fn day_of_week(&self) -> u32 {
        self.date.weekday().num_days_from_sunday()
    }
}

/// Monthly usage and cost under each plan, rounded to hundredths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub month: MonthKey,
    pub total_usage: f64,
    pub flat_cost: f64,
    pub tou_cost: f64,
    pub tou_super_cost: f64,
    pub peak_usage: f64,
    pub off_peak_usage: f64,
}

/// Mean interval usage for one hour-of-week cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyAverage {
    pub hour: u32,
    pub weekday: u32,
    pub average: f64,
}

/// Totals across the whole input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageTotals {
    pub total_usage: f64,
    pub peak_usage: f64,
    pub off_peak_usage: f64,
    pub super_off_peak_usage: f64,
    pub interval_count: usize,
    pub day_count: usize,
    pub month_count: usize,
}

impl UsageTotals {
    /// Share of usage in the peak window (%); zero when there is no usage.
    pub fn peak_share_pct(&self) -> f64 {
        if self.total_usage > 0.0 {
            self.peak_usage / self.total_usage * 100.0
        } else {
            0.0
        }
    }
}

/// Average daily usage for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayAverage {
    /// 0 = Sunday.
    pub weekday: u32,
    pub name: &'static str,
    pub average_usage: f64,
    /// Distinct dates that fell on this weekday.
    pub day_count: usize,
}

/// Day-of-week usage profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayProfile {
    /// Sunday through Saturday.
    pub days: Vec<WeekdayAverage>,
    /// Mean of the Monday-Friday averages.
    pub weekday_average: f64,
    /// Mean of the Saturday and Sunday averages.
    pub weekend_average: f64,
    /// Weekend vs. weekday difference (%); zero when weekday usage is zero.
    pub weekend_difference_pct: f64,
}

/// A day ranked by total usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighUsageDay {
    pub date: NaiveDate,
    pub usage: f64,
    pub peak_usage: f64,
    /// Percent above the mean daily usage.
    pub pct_above_average: f64,
}

/// Short day names indexed by day of week (0 = Sunday).
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn record_sanitizes_bad_usage() {
        let d = date(2025, 1, 15);
        assert_eq!(UsageRecord::new(d, time(0, 0), time(0, 14), f64::NAN).usage_kwh(), 0.0);
        assert_eq!(UsageRecord::new(d, time(0, 0), time(0, 14), -1.0).usage_kwh(), 0.0);
        assert_eq!(UsageRecord::new(d, time(0, 0), time(0, 14), 0.25).usage_kwh(), 0.25);
    }

    #[test]
    fn record_calendar_fields() {
        // 2025-01-18 is a Saturday
        let r = UsageRecord::new(date(2025, 1, 18), time(17, 45), time(17, 59), 0.3);
        assert_eq!(r.hour(), 17);
        assert_eq!(r.day_of_week(), 6);
        assert_eq!(r.month0(), 0);
        assert_eq!(r.month_key(), MonthKey { year: 2025, month: 1 });
    }

    #[test]
    fn month_key_orders_and_displays() {
        let dec = MonthKey { year: 2024, month: 12 };
        let jan = MonthKey { year: 2025, month: 1 };
        assert!(dec < jan);
        assert_eq!(jan.to_string(), "2025-01");
        assert_eq!(serde_json::to_string(&dec).ok().as_deref(), Some("\"2024-12\""));
    }

    #[test]
    fn empty_hour_bucket_average_is_zero() {
        assert_eq!(HourOfWeekBucket::default().average(), 0.0);
    }

    #[test]
    fn peak_share_guards_zero_total() {
        assert_eq!(UsageTotals::default().peak_share_pct(), 0.0);
    }
}
