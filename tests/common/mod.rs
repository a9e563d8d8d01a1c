//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use tariff_insights::io::import::read_usage_csv;
use tariff_insights::usage::UsageRecord;

/// Absolute path of a file under `tests/fixtures/`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The 96 intervals of Wednesday 2025-01-15 (9.32 kWh, 5.4 kWh peak).
pub fn sample_day_records() -> Vec<UsageRecord> {
    let import = read_usage_csv(&fixture_path("sample_day.csv"));
    assert!(import.is_ok(), "sample fixture should parse: {:?}", import.err());
    import.unwrap().records
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One 15-minute interval starting at `hour:minute`.
pub fn record(date: NaiveDate, hour: u32, minute: u32, usage: f64) -> UsageRecord {
    UsageRecord::new(
        date,
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        NaiveTime::from_hms_opt(hour, minute + 14, 0).unwrap(),
        usage,
    )
}

/// Moves every record to `date`, keeping its time of day and usage.
pub fn replay_on(records: &[UsageRecord], date: NaiveDate) -> Vec<UsageRecord> {
    records
        .iter()
        .map(|r| UsageRecord::new(date, r.start_time(), r.end_time(), r.usage_kwh()))
        .collect()
}

/// One noon record per day for `days` days, usage given by `f(day_index)`.
pub fn daily_series(start: NaiveDate, days: u64, f: impl Fn(u64) -> f64) -> Vec<UsageRecord> {
    start
        .iter_days()
        .take(days as usize)
        .zip(0..)
        .map(|(d, i)| record(d, 12, 0, f(i)))
        .collect()
}
