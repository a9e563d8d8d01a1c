//! Interval usage records and their aggregation.

pub mod aggregate;
pub mod types;

pub use aggregate::{UsageAggregator, UsageSummary};
pub use types::{
    DailyTotal, HighUsageDay, HourOfWeekBucket, HourOfWeekKey, HourlyAverage, MonthKey,
    MonthlyBucket, MonthlyStats, UsageRecord, UsageTotals, WeekdayAverage, WeekdayProfile,
};
