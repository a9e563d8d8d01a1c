//! Pearson correlation and ordinary least squares for paired samples.

use serde::Serialize;

/// Fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

struct Sums {
    n: f64,
    x: f64,
    y: f64,
    xy: f64,
    x2: f64,
    y2: f64,
}

impl Sums {
    fn over(xs: &[f64], ys: &[f64]) -> Self {
        let mut s = Sums {
            n: 0.0,
            x: 0.0,
            y: 0.0,
            xy: 0.0,
            x2: 0.0,
            y2: 0.0,
        };
        for (x, y) in xs.iter().zip(ys) {
            s.n += 1.0;
            s.x += x;
            s.y += y;
            s.xy += x * y;
            s.x2 += x * x;
            s.y2 += y * y;
        }
        s
    }

    fn sxx(&self) -> f64 {
        self.n * self.x2 - self.x * self.x
    }

    fn syy(&self) -> f64 {
        self.n * self.y2 - self.y * self.y
    }

    fn sxy(&self) -> f64 {
        self.n * self.xy - self.x * self.y
    }
}

/// Pearson correlation over the pairs of `xs` and `ys` (extra elements of the
/// longer slice are ignored).
///
/// Returns 0 with fewer than two pairs or when either series is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let s = Sums::over(xs, ys);
    if s.n < 2.0 {
        return 0.0;
    }
    let denom = (s.sxx() * s.syy()).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (s.sxy() / denom).clamp(-1.0, 1.0)
}

/// Least-squares fit of `ys` on `xs`.
///
/// Returns `None` with fewer than two pairs or when every `x` is equal.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let s = Sums::over(xs, ys);
    if s.n < 2.0 {
        return None;
    }
    let sxx = s.sxx();
    if sxx == 0.0 {
        return None;
    }
    let slope = s.sxy() / sxx;
    let intercept = (s.y - slope * s.x) / s.n;
    Some(LinearFit { slope, intercept })
}

/// Pearson correlation of each value with its successor.
pub fn lag1_autocorrelation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    pearson(&values[..values.len() - 1], &values[1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_positive_and_negative() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&xs, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_is_zero() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(pearson(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn fit_recovers_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 - 0.5 * x).collect();
        let fit = linear_fit(&xs, &ys);
        assert!(fit.is_some());
        let fit = fit.unwrap();
        assert!((fit.slope + 0.5).abs() < 1e-12);
        assert!((fit.intercept - 3.0).abs() < 1e-12);
        assert!((fit.predict(4.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fit_degenerate_x() {
        assert!(linear_fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(linear_fit(&[], &[]).is_none());
    }

    #[test]
    fn autocorrelation_of_alternating_series_is_negative() {
        let v = [1.0, 3.0, 1.0, 3.0, 1.0, 3.0];
        assert!((lag1_autocorrelation(&v) + 1.0).abs() < 1e-12);
        assert_eq!(lag1_autocorrelation(&[4.0]), 0.0);
    }
}
