//! TOML-based analysis configuration: tariff tables, statistic thresholds, presets.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tariff::HourWindow;

/// Top-level analysis configuration parsed from TOML.
///
/// All fields have defaults matching the `standard` preset. Load from TOML
/// with [`AnalysisConfig::from_toml_file`] or use [`AnalysisConfig::standard`]
/// for the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Rate schedules and their hour windows.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Descriptive statistics and anomaly thresholds.
    #[serde(default)]
    pub statistics: StatisticsConfig,
    /// Change-point heuristics.
    #[serde(default)]
    pub change_point: ChangePointConfig,
    /// Weather correlation parameters.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Synthetic demo data parameters.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Published tariff parameters shared by all three rate plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Label shown next to cost estimates (e.g. `"2025-2026"`).
    pub effective_date: String,
    /// Fixed monthly basic charge ($), billed once per month under every plan.
    pub basic_charge: f64,
    /// Schedule 7 tiered flat rate.
    pub flat: FlatRateConfig,
    /// Schedule 307 two-period time-of-use rate.
    pub tou: TouRateConfig,
    /// Schedule 327 time-of-use rate with super off-peak.
    pub tou_super: TouSuperRateConfig,
    /// Hour windows used by the classifier.
    pub windows: WindowConfig,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            effective_date: "2025-2026".to_string(),
            basic_charge: 7.49,
            flat: FlatRateConfig::default(),
            tou: TouRateConfig::default(),
            tou_super: TouSuperRateConfig::default(),
            windows: WindowConfig::default(),
        }
    }
}

/// Tiered flat rate. Effective rates include riders and taxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlatRateConfig {
    /// Monthly usage billed at the tier-1 rate (kWh).
    pub tier1_limit_kwh: f64,
    /// $/kWh up to the tier limit.
    pub tier1_rate: f64,
    /// $/kWh above the tier limit.
    pub tier2_rate: f64,
}

impl Default for FlatRateConfig {
    fn default() -> Self {
        Self {
            tier1_limit_kwh: 600.0,
            tier1_rate: 0.172,
            tier2_rate: 0.198,
        }
    }
}

/// Two-period time-of-use rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TouRateConfig {
    /// Peak $/kWh, October through March.
    pub peak_winter: f64,
    /// Peak $/kWh, April through September.
    pub peak_summer: f64,
    /// Off-peak $/kWh, year-round.
    pub off_peak: f64,
}

impl Default for TouRateConfig {
    fn default() -> Self {
        Self {
            peak_winter: 0.53,
            peak_summer: 0.36,
            off_peak: 0.13,
        }
    }
}

/// Three-period time-of-use rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TouSuperRateConfig {
    /// Peak $/kWh, October through March.
    pub peak_winter: f64,
    /// Peak $/kWh, April through September.
    pub peak_summer: f64,
    /// Mid-peak $/kWh, October through March.
    pub mid_peak_winter: f64,
    /// Mid-peak $/kWh, April through September.
    pub mid_peak_summer: f64,
    /// Super off-peak $/kWh, every night.
    pub super_off_peak: f64,
}

impl Default for TouSuperRateConfig {
    fn default() -> Self {
        Self {
            peak_winter: 0.50,
            peak_summer: 0.33,
            mid_peak_winter: 0.125,
            mid_peak_summer: 0.115,
            super_off_peak: 0.08,
        }
    }
}

/// Hour windows, all half-open `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Weekday morning peak.
    pub morning_peak: HourWindow,
    /// Weekday evening peak.
    pub evening_peak: HourWindow,
    /// Nightly super off-peak, may wrap midnight.
    pub super_off_peak: HourWindow,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            morning_peak: HourWindow::new(7, 10),
            evening_peak: HourWindow::new(17, 20),
            super_off_peak: HourWindow::new(23, 7),
        }
    }
}

/// Descriptive statistics and anomaly thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatisticsConfig {
    /// Minimum number of days before any statistic is reported.
    pub min_days: usize,
    /// Absolute z-score above which a day is anomalous.
    pub anomaly_z_threshold: f64,
    /// Multiplier turning a per-day slope into a per-month trend.
    pub trend_days_per_month: f64,
    /// Floor applied to the 5th percentile in the peak-to-base ratio (kWh/day).
    pub peak_to_base_floor_kwh: f64,
    /// Days required in each season before the seasonal comparison is shown.
    pub seasonal_min_days: usize,
    /// Days required in a season before box statistics are computed.
    pub box_min_days: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            min_days: 14,
            anomaly_z_threshold: 2.5,
            trend_days_per_month: 30.0,
            peak_to_base_floor_kwh: 0.1,
            seasonal_min_days: 7,
            box_min_days: 5,
        }
    }
}

/// Month-over-month change-point heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChangePointConfig {
    /// Minimum daily points before scanning.
    pub min_daily_points: usize,
    /// Days a month needs to count.
    pub min_days_per_month: usize,
    /// Qualifying months needed before scanning.
    pub min_months: usize,
    /// Minimum month-over-month change (%).
    pub min_change_pct: f64,
    /// Minimum change (%) when usage was temperature-normalized.
    pub weather_adjusted_min_change_pct: f64,
    /// Maximum drift (%) between the changed month and the following one.
    pub persistence_pct: f64,
    /// Fraction of the threshold the change must keep against two months back.
    pub oscillation_factor: f64,
    /// Maximum change points reported.
    pub max_reported: usize,
}

impl Default for ChangePointConfig {
    fn default() -> Self {
        Self {
            min_daily_points: 90,
            min_days_per_month: 14,
            min_months: 4,
            min_change_pct: 25.0,
            weather_adjusted_min_change_pct: 20.0,
            persistence_pct: 15.0,
            oscillation_factor: 0.5,
            max_reported: 2,
        }
    }
}

/// Weather correlation parameters. Temperatures in °F.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// Paired days required before correlation is reported.
    pub min_paired_days: usize,
    /// |r| above which change-point scanning uses normalized usage.
    pub adjustment_min_abs_r: f64,
    /// Reference temperature for degree days.
    pub degree_day_base_f: f64,
    /// Share of lowest-usage days whose mean temperature is the base temperature.
    pub base_temp_fraction: f64,
    /// Distance from the base temperature that makes a day heating or cooling.
    pub band_offset_f: f64,
    /// Heating/cooling slopes need strictly more days than this.
    pub min_band_days: usize,
    /// |kWh/°F| above which heating or cooling sensitivity is flagged.
    pub sensitivity_kwh_per_f: f64,
    /// Days at or below this mean temperature are cold.
    pub cold_day_max_f: f64,
    /// Days at or above this mean temperature are warm.
    pub warm_day_min_f: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            min_paired_days: 30,
            adjustment_min_abs_r: 0.3,
            degree_day_base_f: 65.0,
            base_temp_fraction: 0.10,
            band_offset_f: 5.0,
            min_band_days: 10,
            sensitivity_kwh_per_f: 0.1,
            cold_day_max_f: 50.0,
            warm_day_min_f: 65.0,
        }
    }
}

/// Synthetic demo data parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Random seed.
    pub seed: u64,
    /// First generated day (inclusive).
    pub start_date: NaiveDate,
    /// Last generated day (inclusive).
    pub end_date: NaiveDate,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariff.flat.tier1_rate"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl AnalysisConfig {
    /// Returns the standard preset: published rates and default thresholds.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Returns the sensitive preset: same rates, looser anomaly and shift thresholds.
    pub fn sensitive() -> Self {
        Self {
            statistics: StatisticsConfig {
                anomaly_z_threshold: 2.0,
                ..StatisticsConfig::default()
            },
            change_point: ChangePointConfig {
                min_change_pct: 20.0,
                weather_adjusted_min_change_pct: 15.0,
                persistence_pct: 20.0,
                ..ChangePointConfig::default()
            },
            weather: WeatherConfig {
                adjustment_min_abs_r: 0.2,
                ..WeatherConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["standard", "sensitive"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "standard" => Ok(Self::standard()),
            "sensitive" => Ok(Self::sensitive()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let t = &self.tariff;

        if !(t.basic_charge >= 0.0) {
            errors.push(ConfigError::new("tariff.basic_charge", "must be >= 0"));
        }

        let flat = &t.flat;
        if !(flat.tier1_limit_kwh > 0.0) {
            errors.push(ConfigError::new("tariff.flat.tier1_limit_kwh", "must be > 0"));
        }
        if !(flat.tier1_rate > 0.0) {
            errors.push(ConfigError::new("tariff.flat.tier1_rate", "must be > 0"));
        }
        if !(flat.tier2_rate > 0.0) {
            errors.push(ConfigError::new("tariff.flat.tier2_rate", "must be > 0"));
        }

        let tou = &t.tou;
        for (field, rate) in [
            ("tariff.tou.peak_winter", tou.peak_winter),
            ("tariff.tou.peak_summer", tou.peak_summer),
            ("tariff.tou.off_peak", tou.off_peak),
        ] {
            if !(rate > 0.0) {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        }
        if tou.off_peak >= tou.peak_summer.min(tou.peak_winter) {
            errors.push(ConfigError::new(
                "tariff.tou.off_peak",
                "must be below both seasonal peak rates",
            ));
        }

        let sup = &t.tou_super;
        if !(sup.super_off_peak > 0.0) {
            errors.push(ConfigError::new("tariff.tou_super.super_off_peak", "must be > 0"));
        }
        if sup.super_off_peak >= sup.mid_peak_summer.min(sup.mid_peak_winter) {
            errors.push(ConfigError::new(
                "tariff.tou_super.super_off_peak",
                "must be the lowest rate of the schedule",
            ));
        }
        if sup.mid_peak_winter >= sup.peak_winter || sup.mid_peak_summer >= sup.peak_summer {
            errors.push(ConfigError::new(
                "tariff.tou_super.mid_peak_winter",
                "mid-peak rates must be below the peak rate of the same season",
            ));
        }

        let w = &t.windows;
        for (field, window) in [
            ("tariff.windows.morning_peak", w.morning_peak),
            ("tariff.windows.evening_peak", w.evening_peak),
        ] {
            if window.start >= window.end || window.end > 24 {
                errors.push(ConfigError::new(
                    field,
                    "must satisfy start < end <= 24 (peak windows cannot wrap midnight)",
                ));
            }
        }
        if w.super_off_peak.start > 23 || w.super_off_peak.end > 24 {
            errors.push(ConfigError::new(
                "tariff.windows.super_off_peak",
                "hours must be within a day",
            ));
        }
        if w.super_off_peak.len_hours() == 0 {
            errors.push(ConfigError::new("tariff.windows.super_off_peak", "must not be empty"));
        }

        let s = &self.statistics;
        if s.min_days < 2 {
            errors.push(ConfigError::new("statistics.min_days", "must be >= 2"));
        }
        if !(s.anomaly_z_threshold > 0.0) {
            errors.push(ConfigError::new("statistics.anomaly_z_threshold", "must be > 0"));
        }
        if !(s.peak_to_base_floor_kwh > 0.0) {
            errors.push(ConfigError::new("statistics.peak_to_base_floor_kwh", "must be > 0"));
        }

        let cp = &self.change_point;
        if cp.min_months < 4 {
            errors.push(ConfigError::new(
                "change_point.min_months",
                "must be >= 4 (scan needs two months back and one ahead)",
            ));
        }
        if !(cp.min_change_pct > 0.0) || !(cp.weather_adjusted_min_change_pct > 0.0) {
            errors.push(ConfigError::new("change_point.min_change_pct", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&cp.oscillation_factor) {
            errors.push(ConfigError::new(
                "change_point.oscillation_factor",
                "must be in [0.0, 1.0]",
            ));
        }

        let wc = &self.weather;
        if wc.min_paired_days < 3 {
            errors.push(ConfigError::new("weather.min_paired_days", "must be >= 3"));
        }
        if !(wc.base_temp_fraction > 0.0 && wc.base_temp_fraction <= 1.0) {
            errors.push(ConfigError::new(
                "weather.base_temp_fraction",
                "must be in (0.0, 1.0]",
            ));
        }
        if wc.cold_day_max_f >= wc.warm_day_min_f {
            errors.push(ConfigError::new(
                "weather.cold_day_max_f",
                "must be < weather.warm_day_min_f",
            ));
        }

        let d = &self.demo;
        if d.start_date > d.end_date {
            errors.push(ConfigError::new("demo.start_date", "must be <= demo.end_date"));
        }

        errors
    }
}
