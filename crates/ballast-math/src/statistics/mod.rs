//! Descriptive statistics on aligned return series.

use crate::error::{MathError, MathResult};
use nalgebra::DMatrix;

/// Arithmetic mean. Returns an error for an empty slice.
pub fn mean(values: &[f64]) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Simple period returns `p_t / p_{t-1} - 1` of a price series.
///
/// # Errors
///
/// - `InsufficientData` for fewer than two prices
/// - `InvalidInput` for non-finite or non-positive prices
pub fn simple_returns(prices: &[f64]) -> MathResult<Vec<f64>> {
    if prices.len() < 2 {
        return Err(MathError::insufficient_data(2, prices.len()));
    }
    if let Some(p) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(MathError::invalid_input(format!(
            "Prices must be positive and finite, got {}",
            p
        )));
    }

    Ok(prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
}

/// Sample covariance matrix (`n - 1` divisor) of equally long series.
///
/// Entry `(i, j)` is the covariance of `series[i]` and `series[j]`.
///
/// # Errors
///
/// - `InsufficientData` if there are no series or fewer than two observations
/// - `DimensionMismatch` if the series differ in length
pub fn sample_covariance(series: &[Vec<f64>]) -> MathResult<DMatrix<f64>> {
    let k = series.len();
    if k == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }

    let n = series[0].len();
    if let Some(other) = series.iter().find(|s| s.len() != n) {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: 1,
            rows2: other.len(),
            cols2: 1,
        });
    }
    if n < 2 {
        return Err(MathError::insufficient_data(2, n));
    }

    let means = series
        .iter()
        .map(|s| mean(s))
        .collect::<MathResult<Vec<f64>>>()?;

    let mut cov = DMatrix::zeros(k, k);
    for i in 0..k {
        for j in i..k {
            let sum: f64 = (0..n)
                .map(|t| (series[i][t] - means[i]) * (series[j][t] - means[j]))
                .sum();
            let value = sum / (n - 1) as f64;
            cov[(i, j)] = value;
            cov[(j, i)] = value;
        }
    }

    Ok(cov)
}
