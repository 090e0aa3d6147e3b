//! Shared statistics helpers: moments and least-squares fitting

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Arithmetic mean; `None` on an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); `None` when n < 2.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0);
    Some(variance.sqrt())
}

/// Median; `None` on an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Result of an ordinary least-squares fit of y on x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, in [0, 1]
    pub r_squared: f64,
    /// Two-sided p-value of the slope coefficient (Student's t, n - 2 df)
    pub p_value: f64,
}

impl LinearFit {
    /// Predicted y at x.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit y = a + b*x by ordinary least squares.
///
/// Requires at least 3 points, non-constant x, and non-constant y; returns
/// `None` otherwise (a flat series carries no fit worth reporting).
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = x.len();
    if n < 3 || n != y.len() {
        return None;
    }
    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let sxx: f64 = x.iter().map(|v| (v - mean_x).powi(2)).sum();
    let syy: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let sxy: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_res: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| (yi - (intercept + slope * xi)).powi(2))
        .sum();
    let r_squared = (1.0 - ss_res / syy).clamp(0.0, 1.0);

    let df = nf - 2.0;
    let se = (ss_res / df / sxx).sqrt();
    let p_value = if se > 0.0 && se.is_finite() {
        let t = (slope / se).abs();
        slope_p_value(t, df)
    } else {
        // Perfect fit: the slope is exact, zero residual variance
        0.0
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
        p_value,
    })
}

/// Two-sided p-value for a t statistic with the given degrees of freedom.
fn slope_p_value(t_abs: f64, df: f64) -> f64 {
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t_abs))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}
