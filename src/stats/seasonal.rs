//! Winter vs. summer usage and cold vs. warm day splits.

use chrono::Datelike;
use serde::Serialize;

use super::descriptive::{mean, percentile_sorted, sorted};
use crate::config::{StatisticsConfig, WeatherConfig};
use crate::tariff::is_winter_month;
use crate::usage::DailyTotal;
use crate::weather::{DailyWeather, mean_temps_by_date};

/// Five-number summary plus mean of daily usage within a season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
    pub mean: f64,
}

impl BoxStats {
    /// Uses nearest-rank quartiles. Returns `None` below `min_len` values.
    pub fn from_values(values: &[f64], min_len: usize) -> Option<Self> {
        if values.is_empty() || values.len() < min_len {
            return None;
        }
        let v = sorted(values);
        Some(Self {
            min: v[0],
            p25: percentile_sorted(&v, 0.25),
            median: percentile_sorted(&v, 0.5),
            p75: percentile_sorted(&v, 0.75),
            max: v[v.len() - 1],
            mean: mean(&v),
        })
    }
}

/// Calendar-season comparison of mean daily usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalComparison {
    pub winter_days: usize,
    pub summer_days: usize,
    pub winter_average: f64,
    pub summer_average: f64,
    /// Larger seasonal average over the smaller one.
    pub ratio: f64,
    pub heating_dominant: bool,
    pub winter_box: Option<BoxStats>,
    pub summer_box: Option<BoxStats>,
}

fn is_winter_day(day: &DailyTotal) -> bool {
    is_winter_month(day.date.month0())
}

/// Compares October-March with April-September.
///
/// Returns `None` unless both seasons have more than
/// `cfg.seasonal_min_days` days.
pub fn seasonal_comparison(days: &[DailyTotal], cfg: &StatisticsConfig) -> Option<SeasonalComparison> {
    let (winter, summer): (Vec<&DailyTotal>, Vec<&DailyTotal>) =
        days.iter().partition(|d| is_winter_day(d));
    if winter.len() <= cfg.seasonal_min_days || summer.len() <= cfg.seasonal_min_days {
        return None;
    }

    let winter_usage: Vec<f64> = winter.iter().map(|d| d.total_usage).collect();
    let summer_usage: Vec<f64> = summer.iter().map(|d| d.total_usage).collect();
    let winter_average = mean(&winter_usage);
    let summer_average = mean(&summer_usage);
    let low = winter_average.min(summer_average);
    let ratio = if low > 0.0 {
        winter_average.max(summer_average) / low
    } else {
        0.0
    };

    Some(SeasonalComparison {
        winter_days: winter.len(),
        summer_days: summer.len(),
        winter_average,
        summer_average,
        ratio,
        heating_dominant: winter_average > summer_average,
        winter_box: BoxStats::from_values(&winter_usage, cfg.box_min_days),
        summer_box: BoxStats::from_values(&summer_usage, cfg.box_min_days),
    })
}

/// How days were assigned to the cold and warm bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandBasis {
    /// Observed mean temperature; mild days are excluded.
    Temperature,
    /// Calendar winter and summer.
    Calendar,
}

/// Usage summary for the days in one band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureBand {
    pub days: usize,
    pub average_daily_usage: f64,
    /// Share of the band's usage inside the peak window (%).
    pub peak_share_pct: f64,
    /// Only known when bands come from temperatures.
    pub average_temp: Option<f64>,
}

#[derive(Default)]
struct BandAccumulator {
    days: usize,
    usage: f64,
    peak: f64,
    temps: Vec<f64>,
}

impl BandAccumulator {
    fn add(&mut self, day: &DailyTotal, temp: Option<f64>) {
        self.days += 1;
        self.usage += day.total_usage;
        self.peak += day.peak_usage;
        self.temps.extend(temp);
    }

    fn finish(self) -> TemperatureBand {
        TemperatureBand {
            days: self.days,
            average_daily_usage: if self.days > 0 {
                self.usage / self.days as f64
            } else {
                0.0
            },
            peak_share_pct: if self.usage > 0.0 {
                self.peak / self.usage * 100.0
            } else {
                0.0
            },
            average_temp: (!self.temps.is_empty()).then(|| mean(&self.temps)),
        }
    }
}

/// Cold vs. warm day usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColdWarmSplit {
    pub basis: BandBasis,
    pub cold: TemperatureBand,
    pub warm: TemperatureBand,
}

/// Splits days by temperature when at least `min_paired_days` of weather are
/// supplied, otherwise by calendar season.
///
/// With temperatures, days at or below `cold_day_max_f` are cold, days at or
/// above `warm_day_min_f` are warm, and days without a reading are skipped.
/// Returns `None` unless both bands have at least `min_band_days` days.
pub fn cold_warm_split(
    days: &[DailyTotal],
    weather: &[DailyWeather],
    cfg: &WeatherConfig,
    min_band_days: usize,
) -> Option<ColdWarmSplit> {
    let temps = mean_temps_by_date(weather);
    let basis = if temps.len() >= cfg.min_paired_days {
        BandBasis::Temperature
    } else {
        BandBasis::Calendar
    };

    let mut cold = BandAccumulator::default();
    let mut warm = BandAccumulator::default();
    for day in days {
        match basis {
            BandBasis::Temperature => {
                let Some(&t) = temps.get(&day.date) else {
                    continue;
                };
                if t <= cfg.cold_day_max_f {
                    cold.add(day, Some(t));
                } else if t >= cfg.warm_day_min_f {
                    warm.add(day, Some(t));
                }
            }
            BandBasis::Calendar => {
                if is_winter_day(day) {
                    cold.add(day, None);
                } else {
                    warm.add(day, None);
                }
            }
        }
    }

    if cold.days < min_band_days || warm.days < min_band_days {
        return None;
    }
    Some(ColdWarmSplit {
        basis,
        cold: cold.finish(),
        warm: warm.finish(),
    })
}
