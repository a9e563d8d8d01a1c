use serde::{Deserialize, Serialize};

/// A half-open range of wall-clock hours `[start, end)`.
///
/// When `start > end` the window wraps midnight, so `23..7` covers
/// 23:00 through 06:59.
///
/// # Examples
///
/// ```
/// use tariff_insights::tariff::HourWindow;
///
/// let morning = HourWindow::new(7, 10);
/// assert!(morning.contains(9));
/// assert!(!morning.contains(10));
///
/// let overnight = HourWindow::new(23, 7);
/// assert!(overnight.contains(23));
/// assert!(overnight.contains(0));
/// assert!(!overnight.contains(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HourWindow {
    /// First hour inside the window (0-23).
    pub start: u32,
    /// First hour after the window (0-24).
    pub end: u32,
}

impl HourWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns `true` when `hour` falls inside the window.
    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }

    /// Number of hours covered per day.
    pub fn len_hours(&self) -> u32 {
        if self.start <= self.end {
            self.end - self.start
        } else {
            24 - self.start + self.end
        }
    }
}
