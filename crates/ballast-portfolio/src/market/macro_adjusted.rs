//! Baseline returns tilted by macro indicators and sentiment.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{MarketDataSource, MarketEstimates};
use crate::error::{AllocationError, AllocationResult};

/// Sentiment assumed for assets without a score.
pub const NEUTRAL_SENTIMENT: f64 = 0.5;

/// Fixed per-class scores for the standard universe, used in place of a live
/// sentiment feed by [`MacroAdjustedReturns::with_standard_sentiment`].
pub const STANDARD_SENTIMENT: [(&str, f64); 5] = [
    ("stocks", 0.6),
    ("bonds", 0.5),
    ("commodities", 0.4),
    ("cash", 0.3),
    ("crypto", 0.2),
];

const VIX_WEIGHT: f64 = 0.4;
const SPREAD_WEIGHT: f64 = 0.3;
const SENTIMENT_WEIGHT: f64 = 0.3;

/// VIX level at which the volatility factor is zero.
const VIX_PIVOT: f64 = 30.0;

/// Macro indicators supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroIndicators {
    /// CBOE volatility index level.
    pub vix: f64,
    /// 10y minus 2y treasury yield, in percentage points.
    pub yield_spread: f64,
}

impl Default for MacroIndicators {
    /// Calm-market values used when no live indicators are available.
    fn default() -> Self {
        Self {
            vix: 20.0,
            yield_spread: 0.5,
        }
    }
}

impl MacroIndicators {
    /// Creates indicators.
    #[must_use]
    pub fn new(vix: f64, yield_spread: f64) -> Self {
        Self { vix, yield_spread }
    }

    /// `(30 - vix) / 30`: positive in calm markets, negative in stressed ones.
    #[must_use]
    pub fn vix_factor(&self) -> f64 {
        (VIX_PIVOT - self.vix) / VIX_PIVOT
    }

    /// Half the yield spread.
    #[must_use]
    pub fn spread_factor(&self) -> f64 {
        self.yield_spread / 2.0
    }
}

/// Scales each baseline return by `1 + adjustment`, where
///
/// ```text
/// adjustment = 0.4 * vix_factor + 0.3 * spread_factor + 0.3 * sentiment(asset)
/// ```
///
/// The covariance passes through unchanged. Assets without a score get
/// [`NEUTRAL_SENTIMENT`]; call
/// [`with_standard_sentiment`](Self::with_standard_sentiment) to start from the
/// fixed [`STANDARD_SENTIMENT`] table instead.
#[derive(Debug, Clone)]
pub struct MacroAdjustedReturns {
    baseline: MarketEstimates,
    indicators: MacroIndicators,
    sentiment: BTreeMap<String, f64>,
}

impl MacroAdjustedReturns {
    /// Creates a source over baseline estimates with default indicators and
    /// neutral sentiment.
    #[must_use]
    pub fn new(baseline: MarketEstimates) -> Self {
        Self {
            baseline,
            indicators: MacroIndicators::default(),
            sentiment: BTreeMap::new(),
        }
    }

    /// Sets the macro indicators.
    #[must_use]
    pub fn with_indicators(mut self, indicators: MacroIndicators) -> Self {
        self.indicators = indicators;
        self
    }

    /// Sets the sentiment score of one asset.
    #[must_use]
    pub fn with_sentiment(mut self, asset: impl Into<String>, score: f64) -> Self {
        self.sentiment.insert(asset.into(), score);
        self
    }

    /// Applies [`STANDARD_SENTIMENT`] to the baseline assets it names.
    /// Scores set before this call are overwritten, later ones take precedence.
    #[must_use]
    pub fn with_standard_sentiment(mut self) -> Self {
        for (asset, score) in STANDARD_SENTIMENT {
            if self.baseline.index_of(asset).is_some() {
                self.sentiment.insert(asset.to_string(), score);
            }
        }
        self
    }

    /// Sentiment score of an asset, neutral if unset.
    pub fn sentiment(&self, asset: &str) -> f64 {
        self.sentiment
            .get(asset)
            .copied()
            .unwrap_or(NEUTRAL_SENTIMENT)
    }

    /// Multiplicative adjustment for an asset.
    pub fn adjustment(&self, asset: &str) -> f64 {
        VIX_WEIGHT * self.indicators.vix_factor()
            + SPREAD_WEIGHT * self.indicators.spread_factor()
            + SENTIMENT_WEIGHT * self.sentiment(asset)
    }
}

impl MarketDataSource for MacroAdjustedReturns {
    fn estimates(&self) -> AllocationResult<MarketEstimates> {
        if !(self.indicators.vix.is_finite() && self.indicators.yield_spread.is_finite()) {
            return Err(AllocationError::invalid_input(
                "Macro indicators must be finite",
            ));
        }
        if let Some((asset, score)) = self.sentiment.iter().find(|(_, s)| !s.is_finite()) {
            return Err(AllocationError::invalid_input(format!(
                "Sentiment for '{}' is not finite: {}",
                asset, score
            )));
        }
        if let Some(asset) = self
            .sentiment
            .keys()
            .find(|a| self.baseline.index_of(a).is_none())
        {
            return Err(AllocationError::unknown_asset(asset.as_str()));
        }

        let mut estimates = self.baseline.estimates()?;
        for (asset, expected) in estimates
            .assets
            .iter()
            .zip(estimates.expected_returns.iter_mut())
        {
            let adjustment = self.adjustment(asset);
            debug!("{}: baseline {:.4}, adjustment {:+.4}", asset, expected, adjustment);
            *expected *= 1.0 + adjustment;
        }
        Ok(estimates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_indicators() {
        let indicators = MacroIndicators::default();
        assert_relative_eq!(indicators.vix_factor(), 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(indicators.spread_factor(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_adjusted_returns_follow_formula() {
        let source = MacroAdjustedReturns::new(MarketEstimates::standard())
            .with_indicators(MacroIndicators::new(15.0, 1.0))
            .with_sentiment("stocks", 0.6)
            .with_sentiment("crypto", 0.2);

        let estimates = source.estimates().unwrap();

        // vix_factor 0.5, spread_factor 0.5
        let stocks = 0.10 * (1.0 + 0.4 * 0.5 + 0.3 * 0.5 + 0.3 * 0.6);
        let crypto = 0.40 * (1.0 + 0.4 * 0.5 + 0.3 * 0.5 + 0.3 * 0.2);
        let bonds = 0.05 * (1.0 + 0.4 * 0.5 + 0.3 * 0.5 + 0.3 * NEUTRAL_SENTIMENT);

        assert_relative_eq!(estimates.expected_return("stocks").unwrap(), stocks, epsilon = 1e-12);
        assert_relative_eq!(estimates.expected_return("crypto").unwrap(), crypto, epsilon = 1e-12);
        assert_relative_eq!(estimates.expected_return("bonds").unwrap(), bonds, epsilon = 1e-12);
        assert_eq!(estimates.covariance, MarketEstimates::standard().covariance);
    }

    #[test]
    fn test_stressed_market_lowers_returns() {
        let calm = MacroAdjustedReturns::new(MarketEstimates::standard())
            .estimates()
            .unwrap();
        let stressed = MacroAdjustedReturns::new(MarketEstimates::standard())
            .with_indicators(MacroIndicators::new(45.0, -0.5))
            .estimates()
            .unwrap();

        for i in 0..calm.len() {
            assert!(stressed.expected_returns[i] < calm.expected_returns[i]);
        }
    }

    #[test]
    fn test_unknown_sentiment_asset() {
        let err = MacroAdjustedReturns::new(MarketEstimates::standard())
            .with_sentiment("gold", 0.7)
            .estimates()
            .unwrap_err();
        assert!(matches!(err, AllocationError::UnknownAsset { .. }));
    }

    #[test]
    fn test_non_finite_indicator() {
        let err = MacroAdjustedReturns::new(MarketEstimates::standard())
            .with_indicators(MacroIndicators::new(f64::NAN, 0.5))
            .estimates()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_standard_sentiment_table() {
        let source = MacroAdjustedReturns::new(MarketEstimates::standard())
            .with_standard_sentiment()
            .with_sentiment("crypto", 0.9);

        assert_relative_eq!(source.sentiment("stocks"), 0.6);
        assert_relative_eq!(source.sentiment("commodities"), 0.4);
        assert_relative_eq!(source.sentiment("cash"), 0.3);
        assert_relative_eq!(source.sentiment("crypto"), 0.9);

        let estimates = source.estimates().unwrap();
        let cash = 0.02 * (1.0 + 0.4 / 3.0 + 0.3 * 0.25 + 0.3 * 0.3);
        assert_relative_eq!(estimates.expected_return("cash").unwrap(), cash, epsilon = 1e-12);
    }

    #[test]
    fn test_standard_sentiment_skips_missing_assets() {
        let baseline = MarketEstimates::new(
            vec!["stocks".into(), "gold".into()],
            vec![0.10, 0.06],
            vec![vec![0.04, 0.0], vec![0.0, 0.03]],
        )
        .unwrap();
        let source = MacroAdjustedReturns::new(baseline).with_standard_sentiment();

        assert_relative_eq!(source.sentiment("stocks"), 0.6);
        assert_relative_eq!(source.sentiment("gold"), NEUTRAL_SENTIMENT);
        assert!(source.estimates().is_ok());
    }
}
