//! Seeded synthetic usage and weather for trying the analysis without an export.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate, NaiveTime};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::DemoConfig;
use crate::rounding::round_hundredths;
use crate::usage::UsageRecord;
use crate::weather::DailyWeather;

/// Seed offset for the weather RNG so temperatures do not mirror usage noise.
const WEATHER_SEED_OFFSET: u64 = 101;

/// Base kWh per 15-minute interval by hour of day.
const HOURLY_PATTERN: [f64; 24] = [
    0.03, 0.02, 0.02, 0.02, 0.02, 0.03, // overnight
    0.08, 0.15, 0.12, 0.08, // morning
    0.04, 0.03, 0.03, 0.03, 0.03, 0.04, // daytime
    0.06, 0.10, 0.18, 0.15, // evening
    0.12, 0.10, 0.08, 0.05, // late evening
];

/// January through June multipliers; other months use 1.0.
const SEASONAL_MULTIPLIERS: [f64; 6] = [1.4, 1.3, 1.1, 0.9, 0.8, 0.85];

/// Smallest generated interval reading (kWh).
const MIN_USAGE_KWH: f64 = 0.01;

fn seasonal_multiplier(month0: u32) -> f64 {
    SEASONAL_MULTIPLIERS
        .get(month0 as usize)
        .copied()
        .unwrap_or(1.0)
}

/// Weekend mornings are lighter and middays heavier.
fn weekend_multiplier(day_of_week: u32, hour: u32) -> f64 {
    if day_of_week != 0 && day_of_week != 6 {
        return 1.0;
    }
    match hour {
        6..=9 => 0.6,
        10..=16 => 1.3,
        _ => 1.0,
    }
}

/// Deterministic generator of interval records and a matching weather series.
///
/// # Examples
///
/// ```
/// use tariff_insights::config::DemoConfig;
/// use tariff_insights::demo::DemoGenerator;
///
/// let cfg = DemoConfig::default();
/// let records = DemoGenerator::new(&cfg).records();
/// // 2025-01-01 through 2025-06-30, 96 intervals a day
/// assert_eq!(records.len(), 181 * 96);
/// ```
#[derive(Debug, Clone)]
pub struct DemoGenerator {
    start: NaiveDate,
    end: NaiveDate,
    seed: u64,
}

impl DemoGenerator {
    pub fn new(cfg: &DemoConfig) -> Self {
        Self {
            start: cfg.start_date,
            end: cfg.end_date,
            seed: cfg.seed,
        }
    }

    fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// 96 records per day: hourly pattern × season × weekend reshaping × ±30 % noise.
    pub fn records(&self) -> Vec<UsageRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records = Vec::new();

        for date in self.dates() {
            let season = seasonal_multiplier(date.month0());
            let dow = date.weekday().num_days_from_sunday();

            for (hour, base) in (0_u32..).zip(HOURLY_PATTERN) {
                let shape = base * season * weekend_multiplier(dow, hour);
                for quarter in 0..4_u32 {
                    let minute = quarter * 15;
                    let (Some(start), Some(end)) = (
                        NaiveTime::from_hms_opt(hour, minute, 0),
                        NaiveTime::from_hms_opt(hour, minute + 14, 0),
                    ) else {
                        continue;
                    };
                    let noise = 0.7 + rng.random::<f64>() * 0.6;
                    let usage = round_hundredths(shape * noise).max(MIN_USAGE_KWH);
                    records.push(UsageRecord::new(date, start, end, usage));
                }
            }
        }
        records
    }

    /// Daily temperatures (°F) following an annual cycle coldest in mid-January.
    pub fn weather(&self) -> Vec<DailyWeather> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(WEATHER_SEED_OFFSET));
        self.dates()
            .map(|date| {
                let phase = 2.0 * PI * (f64::from(date.ordinal0()) - 15.0) / 365.0;
                let mean = 52.0 - 12.0 * phase.cos() + rng.random_range(-4.0..4.0);
                let spread = rng.random_range(6.0..10.0);
                DailyWeather {
                    date,
                    temp_max: round_hundredths(mean + spread),
                    temp_min: round_hundredths(mean - spread),
                    temp_mean: round_hundredths(mean),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(seed: u64, start: (i32, u32, u32), end: (i32, u32, u32)) -> DemoConfig {
        DemoConfig {
            seed,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn one_day_has_96_intervals() {
        let records = DemoGenerator::new(&cfg(1, (2025, 1, 15), (2025, 1, 15))).records();
        assert_eq!(records.len(), 96);
        assert_eq!(records[0].start_time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(records[95].end_time(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
    }

    #[test]
    fn usage_is_rounded_and_floored() {
        let records = DemoGenerator::new(&cfg(3, (2025, 5, 1), (2025, 5, 31))).records();
        for r in &records {
            assert!(r.usage_kwh() >= MIN_USAGE_KWH);
            assert_eq!(round_hundredths(r.usage_kwh()), r.usage_kwh());
        }
    }

    #[test]
    fn same_seed_same_data() {
        let c = cfg(42, (2025, 1, 1), (2025, 1, 31));
        assert_eq!(DemoGenerator::new(&c).records(), DemoGenerator::new(&c).records());
        assert_eq!(DemoGenerator::new(&c).weather(), DemoGenerator::new(&c).weather());
    }

    #[test]
    fn different_seed_different_data() {
        let a = DemoGenerator::new(&cfg(1, (2025, 1, 1), (2025, 1, 7))).records();
        let b = DemoGenerator::new(&cfg(2, (2025, 1, 1), (2025, 1, 7))).records();
        assert_ne!(a, b);
    }

    #[test]
    fn weather_is_colder_in_january() {
        let w = DemoGenerator::new(&cfg(9, (2025, 1, 1), (2025, 7, 31))).weather();
        let jan: f64 = w.iter().filter(|d| d.date.month() == 1).map(|d| d.temp_mean).sum::<f64>() / 31.0;
        let jul: f64 = w.iter().filter(|d| d.date.month() == 7).map(|d| d.temp_mean).sum::<f64>() / 31.0;
        assert!(jan < jul);
        assert!(w.iter().all(|d| d.temp_min < d.temp_mean && d.temp_mean < d.temp_max));
    }

    #[test]
    fn inverted_range_is_empty() {
        let g = DemoGenerator::new(&cfg(1, (2025, 2, 1), (2025, 1, 1)));
        assert!(g.records().is_empty());
        assert!(g.weather().is_empty());
    }
}
