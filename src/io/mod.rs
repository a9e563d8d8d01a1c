//! Utility export import and report CSV export.

pub mod export;
pub mod import;
