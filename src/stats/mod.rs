//! Statistical analysis of daily usage totals.

pub mod anomaly;
pub mod change_point;
pub mod descriptive;
pub mod patterns;
pub mod regression;
pub mod report;
pub mod seasonal;
pub mod trend;

pub use anomaly::Anomaly;
pub use change_point::{ChangeDirection, ChangePoint, ChangePointScan};
pub use patterns::{BaseloadEstimate, SkewDirection};
pub use report::{UsageStatistics, Variability};
pub use seasonal::{BandBasis, BoxStats, ColdWarmSplit, SeasonalComparison, TemperatureBand};
pub use trend::{Trend, TrendDirection};
