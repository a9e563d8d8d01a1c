//! Household electricity tariff comparison and usage statistics.
//!
//! Interval records from a utility export are bucketed by month, hour of week
//! and day, priced under the flat, time-of-use and time-of-use with super
//! off-peak schedules, and summarized with descriptive statistics, change
//! points and optional weather correlation.

pub mod analysis;
pub mod config;
pub mod demo;
pub mod io;
pub mod rounding;
pub mod stats;
/// Rate plans, period classification and plan pricing.
pub mod tariff;
pub mod usage;
pub mod weather;
