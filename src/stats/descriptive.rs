//! Population summary statistics over plain `f64` slices.
//!
//! Every function returns 0 for empty input or a zero denominator.

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation as a percentage of the mean.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    std_dev(values) / m * 100.0
}

/// Returns a sorted copy of `values`.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Median of an already sorted slice; mean of the middle pair for even lengths.
pub fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Nearest-rank percentile `sorted[floor(n * p)]`, clamped to the last element.
///
/// # Examples
///
/// ```
/// use tariff_insights::stats::descriptive::percentile_sorted;
///
/// let v: Vec<f64> = (1..=20).map(f64::from).collect();
/// assert_eq!(percentile_sorted(&v, 0.05), 2.0);
/// assert_eq!(percentile_sorted(&v, 0.95), 20.0);
/// assert_eq!(percentile_sorted(&v, 1.0), 20.0);
/// ```
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (sorted.len() as f64 * p.clamp(0.0, 1.0)).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
