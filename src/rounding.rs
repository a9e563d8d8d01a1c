//! Output-boundary rounding.

/// Rounds a value to two decimal places (cents for dollars, hundredths for kWh).
///
/// Only apply this when building values that leave the crate. Accumulators
/// keep full precision so error does not compound across months.
///
/// # Examples
///
/// ```
/// use tariff_insights::rounding::round_hundredths;
///
/// assert_eq!(round_hundredths(9.3199999), 9.32);
/// assert_eq!(round_hundredths(0.0), 0.0);
/// ```
pub fn round_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Rounds a value to three decimal places, for per-interval kWh averages
/// that hundredths would flatten.
///
/// ```
/// use tariff_insights::rounding::round_thousandths;
///
/// assert_eq!(round_thousandths(0.023_4), 0.023);
/// ```
pub fn round_thousandths(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 1000.0).round() / 1000.0
}
