//! Market estimates from historical prices.

use ballast_math::statistics::{mean, sample_covariance, simple_returns};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{MarketDataSource, MarketEstimates};
use crate::error::{AllocationError, AllocationResult};

/// Trading days used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Minimum prices per series: two returns are needed for a sample covariance.
const MIN_PRICES: usize = 3;

/// Aligned price series, one per asset, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    assets: Vec<String>,
    prices: Vec<Vec<f64>>,
}

impl PriceHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a series. All series must end up the same length; that is checked
    /// when estimating.
    pub fn push(&mut self, asset: impl Into<String>, prices: Vec<f64>) -> AllocationResult<()> {
        let asset = asset.into();
        if self.assets.contains(&asset) {
            return Err(AllocationError::invalid_input(format!(
                "Duplicate price series for '{}'",
                asset
            )));
        }
        self.assets.push(asset);
        self.prices.push(prices);
        Ok(())
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_series(mut self, asset: impl Into<String>, prices: Vec<f64>) -> AllocationResult<Self> {
        self.push(asset, prices)?;
        Ok(self)
    }

    /// Asset names in insertion order.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Price series of an asset.
    pub fn series(&self, asset: &str) -> Option<&[f64]> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .map(|i| self.prices[i].as_slice())
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True if no series were added.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Estimates annualized mean returns and covariance from price history.
///
/// Period returns are simple returns. Both the mean and the sample covariance
/// (`n - 1` divisor) are scaled by `periods_per_year`.
#[derive(Debug, Clone)]
pub struct HistoricalEstimator {
    history: PriceHistory,
    periods_per_year: f64,
}

impl HistoricalEstimator {
    /// Creates an estimator for daily prices.
    #[must_use]
    pub fn new(history: PriceHistory) -> Self {
        Self {
            history,
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }

    /// Sets the number of price periods per year (252 daily, 52 weekly, 12 monthly).
    #[must_use]
    pub fn with_periods_per_year(mut self, periods_per_year: f64) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    /// The underlying history.
    pub fn history(&self) -> &PriceHistory {
        &self.history
    }
}

impl MarketDataSource for HistoricalEstimator {
    fn estimates(&self) -> AllocationResult<MarketEstimates> {
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(AllocationError::invalid_input(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }
        if self.history.is_empty() {
            return Err(AllocationError::invalid_input("Price history is empty"));
        }

        let shortest = self.history.prices.iter().map(Vec::len).min().unwrap_or(0);
        if shortest < MIN_PRICES {
            return Err(AllocationError::InsufficientHistory {
                required: MIN_PRICES,
                actual: shortest,
            });
        }

        let returns = self
            .history
            .assets
            .iter()
            .zip(&self.history.prices)
            .map(|(asset, prices)| {
                simple_returns(prices).map_err(|e| {
                    AllocationError::invalid_input(format!("Price series '{}': {}", asset, e))
                })
            })
            .collect::<AllocationResult<Vec<Vec<f64>>>>()?;

        let expected_returns = returns
            .iter()
            .map(|r| mean(r).map(|m| m * self.periods_per_year))
            .collect::<Result<Vec<f64>, _>>()?;
        let covariance = sample_covariance(&returns)? * self.periods_per_year;

        debug!(
            "estimated {} assets from {} periods",
            self.history.len(),
            returns[0].len()
        );

        MarketEstimates::from_matrix(self.history.assets.clone(), expected_returns, &covariance)
    }
}
