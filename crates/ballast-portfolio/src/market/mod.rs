//! Market estimates and where they come from.
//!
//! The optimizer only ever sees a [`MarketEstimates`]: expected annual returns
//! and a covariance matrix for a fixed asset ordering. Producing one is the
//! job of a [`MarketDataSource`]:
//!
//! - [`MarketEstimates`] itself, for figures supplied by configuration
//! - [`HistoricalEstimator`], from aligned price histories
//! - [`MacroAdjustedReturns`], baseline returns tilted by macro indicators and
//!   sentiment scores

mod historical;
mod macro_adjusted;

pub use historical::{HistoricalEstimator, PriceHistory, TRADING_DAYS_PER_YEAR};
pub use macro_adjusted::{
    MacroAdjustedReturns, MacroIndicators, NEUTRAL_SENTIMENT, STANDARD_SENTIMENT,
};

use ballast_math::linear_algebra::check_positive_semidefinite;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, AllocationResult};

/// Default tolerance for covariance checks.
pub const DEFAULT_COVARIANCE_TOLERANCE: f64 = 1e-10;

/// Produces market estimates for the optimizer.
pub trait MarketDataSource {
    /// Returns expected returns and covariance for a fixed asset ordering.
    fn estimates(&self) -> AllocationResult<MarketEstimates>;
}

/// Expected annual returns and their covariance, indexed by asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEstimates {
    /// Asset names; fixes the ordering of the other fields.
    pub assets: Vec<String>,

    /// Expected annualized return per asset.
    pub expected_returns: Vec<f64>,

    /// Covariance matrix, row-major, `assets.len()` square.
    pub covariance: Vec<Vec<f64>>,
}

impl MarketEstimates {
    /// Creates validated estimates.
    pub fn new(
        assets: Vec<String>,
        expected_returns: Vec<f64>,
        covariance: Vec<Vec<f64>>,
    ) -> AllocationResult<Self> {
        let estimates = Self {
            assets,
            expected_returns,
            covariance,
        };
        estimates.validate(DEFAULT_COVARIANCE_TOLERANCE)?;
        Ok(estimates)
    }

    /// Creates estimates from a covariance matrix.
    pub fn from_matrix(
        assets: Vec<String>,
        expected_returns: Vec<f64>,
        covariance: &DMatrix<f64>,
    ) -> AllocationResult<Self> {
        let rows = covariance
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        Self::new(assets, expected_returns, rows)
    }

    /// Baseline figures for the standard five-class universe.
    ///
    /// Returns are long-run assumptions (stocks 10%, bonds 5%, commodities 7%,
    /// cash 2%, crypto 40%); the covariance matrix is positive definite.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            assets: ["stocks", "bonds", "commodities", "cash", "crypto"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            expected_returns: vec![0.10, 0.05, 0.07, 0.02, 0.40],
            covariance: vec![
                vec![0.04, 0.02, 0.01, 0.0, 0.03],
                vec![0.02, 0.02, 0.01, 0.0, 0.0],
                vec![0.01, 0.01, 0.03, 0.0, 0.01],
                vec![0.0, 0.0, 0.0, 0.001, 0.0],
                vec![0.03, 0.0, 0.01, 0.0, 0.36],
            ],
        }
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True if there are no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Position of an asset in the ordering.
    pub fn index_of(&self, asset: &str) -> Option<usize> {
        self.assets.iter().position(|a| a == asset)
    }

    /// Expected return of an asset.
    pub fn expected_return(&self, asset: &str) -> Option<f64> {
        self.index_of(asset).map(|i| self.expected_returns[i])
    }

    /// Expected returns as a vector.
    pub fn returns_vector(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.expected_returns)
    }

    /// Covariance as a matrix. Call [`validate`](Self::validate) first; ragged
    /// rows are padded with zeros.
    pub fn covariance_matrix(&self) -> DMatrix<f64> {
        let n = self.covariance.len();
        DMatrix::from_fn(n, n, |i, j| {
            self.covariance[i].get(j).copied().unwrap_or(0.0)
        })
    }

    /// Checks shape, finiteness, unique names and that the covariance is
    /// symmetric positive semidefinite.
    pub fn validate(&self, tolerance: f64) -> AllocationResult<()> {
        let n = self.expected_returns.len();
        if n == 0 {
            return Err(AllocationError::invalid_input(
                "At least one asset is required",
            ));
        }

        let rows = self.covariance.len();
        if let Some(row) = self.covariance.iter().find(|row| row.len() != n) {
            return Err(AllocationError::DimensionMismatch {
                returns: n,
                rows,
                cols: row.len(),
            });
        }
        if rows != n {
            return Err(AllocationError::DimensionMismatch {
                returns: n,
                rows,
                cols: n,
            });
        }
        if self.assets.len() != n {
            return Err(AllocationError::invalid_input(format!(
                "{} asset names for {} expected returns",
                self.assets.len(),
                n
            )));
        }
        for (i, name) in self.assets.iter().enumerate() {
            if self.assets[..i].contains(name) {
                return Err(AllocationError::invalid_input(format!(
                    "Duplicate asset '{}'",
                    name
                )));
            }
        }

        if let Some(i) = self.expected_returns.iter().position(|r| !r.is_finite()) {
            return Err(AllocationError::invalid_input(format!(
                "Expected return of '{}' is not finite",
                self.assets[i]
            )));
        }
        if self.covariance.iter().flatten().any(|v| !v.is_finite()) {
            return Err(AllocationError::invalid_covariance(
                "entries must be finite",
            ));
        }
        if let Some(i) = (0..n).find(|&i| self.covariance[i][i] < 0.0) {
            return Err(AllocationError::invalid_covariance(format!(
                "negative variance for '{}'",
                self.assets[i]
            )));
        }

        check_positive_semidefinite(&self.covariance_matrix(), tolerance)?;
        Ok(())
    }
}

impl MarketDataSource for MarketEstimates {
    fn estimates(&self) -> AllocationResult<MarketEstimates> {
        self.validate(DEFAULT_COVARIANCE_TOLERANCE)?;
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_is_valid() {
        let estimates = MarketEstimates::standard();
        assert!(estimates.validate(DEFAULT_COVARIANCE_TOLERANCE).is_ok());
        assert_eq!(estimates.len(), 5);
        assert_eq!(estimates.expected_return("crypto"), Some(0.40));
        assert_eq!(estimates.index_of("cash"), Some(3));
        assert!(estimates.expected_return("gold").is_none());
    }

    #[test]
    fn test_dimension_mismatch() {
        let estimates = MarketEstimates {
            assets: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            expected_returns: vec![0.1, 0.05, 0.07, 0.02],
            covariance: vec![
                vec![0.04, 0.0, 0.0],
                vec![0.0, 0.02, 0.0],
                vec![0.0, 0.0, 0.03],
            ],
        };

        let err = estimates.validate(DEFAULT_COVARIANCE_TOLERANCE).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::DimensionMismatch {
                returns: 4,
                rows: 3,
                cols: 3
            }
        ));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_rejects_asymmetric_covariance() {
        let err = MarketEstimates::new(
            vec!["a".into(), "b".into()],
            vec![0.1, 0.05],
            vec![vec![0.04, 0.01], vec![0.02, 0.02]],
        )
        .unwrap_err();
        assert!(matches!(err, AllocationError::InvalidCovariance { .. }));
    }

    #[test]
    fn test_rejects_indefinite_covariance() {
        let err = MarketEstimates::new(
            vec!["a".into(), "b".into()],
            vec![0.1, 0.05],
            vec![vec![0.01, 0.05], vec![0.05, 0.01]],
        )
        .unwrap_err();
        assert!(matches!(err, AllocationError::InvalidCovariance { .. }));
    }

    #[test]
    fn test_rejects_non_finite_returns() {
        let err = MarketEstimates::new(
            vec!["a".into()],
            vec![f64::INFINITY],
            vec![vec![0.01]],
        )
        .unwrap_err();
        assert!(matches!(err, AllocationError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_name_count_mismatch() {
        let err = MarketEstimates::new(vec!["a".into()], vec![0.1, 0.2], vec![vec![0.01, 0.0], vec![0.0, 0.01]])
            .unwrap_err();
        assert!(err.to_string().contains("asset names"));
    }

    #[test]
    fn test_from_matrix() {
        let m = DMatrix::from_row_slice(2, 2, &[0.04, 0.01, 0.01, 0.02]);
        let estimates =
            MarketEstimates::from_matrix(vec!["a".into(), "b".into()], vec![0.1, 0.05], &m).unwrap();
        assert_eq!(estimates.covariance, vec![vec![0.04, 0.01], vec![0.01, 0.02]]);
        assert_eq!(estimates.covariance_matrix(), m);
    }

    #[test]
    fn test_serde() {
        let estimates = MarketEstimates::standard();
        let json = serde_json::to_string(&estimates).unwrap();
        let parsed: MarketEstimates = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, estimates);
    }

    #[test]
    fn test_static_source() {
        let source = MarketEstimates::standard();
        assert_eq!(source.estimates().unwrap(), source);
    }
}
