//! Per-regime weight bounds.
//!
//! Bounds are data, not branches: a [`BoundPolicy`] maps each [`Regime`] to a
//! [`BoundRule`], and each side of a rule names where its number comes from.

use serde::{Deserialize, Serialize};

use super::{AssetClass, Regime, RiskTolerance};
use crate::error::{AllocationError, AllocationResult};

/// Source of one side of a weight bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundSource {
    /// The same number for every asset.
    Fixed(f64),
    /// The asset's `min_conservative` attribute.
    MinConservative,
    /// The asset's `max_aggressive` attribute.
    MaxAggressive,
}

impl BoundSource {
    /// Resolves the bound for an asset.
    #[must_use]
    pub fn resolve(&self, asset: &AssetClass) -> f64 {
        match self {
            Self::Fixed(value) => *value,
            Self::MinConservative => asset.min_conservative,
            Self::MaxAggressive => asset.max_aggressive,
        }
    }
}

/// Lower and upper bound sources for one regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundRule {
    /// Lower bound source.
    pub lower: BoundSource,
    /// Upper bound source.
    pub upper: BoundSource,
}

impl BoundRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(lower: BoundSource, upper: BoundSource) -> Self {
        Self { lower, upper }
    }

    /// Resolves `(lower, upper)` for an asset.
    #[must_use]
    pub fn resolve(&self, asset: &AssetClass) -> (f64, f64) {
        (self.lower.resolve(asset), self.upper.resolve(asset))
    }
}

/// Regime thresholds and the bound rule of each regime.
///
/// Tolerances up to `conservative_max` are conservative, tolerances from
/// `aggressive_min` are aggressive, everything between is moderate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundPolicy {
    /// Highest tolerance of the conservative regime.
    pub conservative_max: u8,

    /// Lowest tolerance of the aggressive regime.
    pub aggressive_min: u8,

    /// Conservative bounds.
    pub conservative: BoundRule,

    /// Moderate bounds.
    pub moderate: BoundRule,

    /// Aggressive bounds.
    pub aggressive: BoundRule,
}

impl Default for BoundPolicy {
    fn default() -> Self {
        Self {
            conservative_max: 3,
            aggressive_min: 8,
            conservative: BoundRule::new(BoundSource::MinConservative, BoundSource::Fixed(0.8)),
            moderate: BoundRule::new(BoundSource::Fixed(0.1), BoundSource::Fixed(0.6)),
            aggressive: BoundRule::new(BoundSource::Fixed(0.0), BoundSource::MaxAggressive),
        }
    }
}

impl BoundPolicy {
    /// Regime for a risk tolerance.
    #[must_use]
    pub fn regime_for(&self, tolerance: RiskTolerance) -> Regime {
        let t = tolerance.value();
        if t <= self.conservative_max {
            Regime::Conservative
        } else if t >= self.aggressive_min {
            Regime::Aggressive
        } else {
            Regime::Moderate
        }
    }

    /// Bound rule of a regime.
    #[must_use]
    pub fn rule(&self, regime: Regime) -> &BoundRule {
        match regime {
            Regime::Conservative => &self.conservative,
            Regime::Moderate => &self.moderate,
            Regime::Aggressive => &self.aggressive,
        }
    }

    /// `(lower, upper)` weight bounds of each asset, in the given order.
    pub fn bounds<'a, I>(&self, regime: Regime, assets: I) -> (Vec<f64>, Vec<f64>)
    where
        I: IntoIterator<Item = &'a AssetClass>,
    {
        let rule = self.rule(regime);
        assets.into_iter().map(|asset| rule.resolve(asset)).unzip()
    }

    /// Checks thresholds and fixed bounds.
    pub fn validate(&self) -> AllocationResult<()> {
        let in_range = |t: u8| (RiskTolerance::MIN..=RiskTolerance::MAX).contains(&t);
        if !in_range(self.conservative_max) || !in_range(self.aggressive_min) {
            return Err(AllocationError::invalid_input(format!(
                "Regime thresholds must lie in {}..={}",
                RiskTolerance::MIN,
                RiskTolerance::MAX
            )));
        }
        if self.conservative_max >= self.aggressive_min {
            return Err(AllocationError::invalid_input(format!(
                "conservative_max ({}) must be below aggressive_min ({})",
                self.conservative_max, self.aggressive_min
            )));
        }

        for (regime, rule) in [
            (Regime::Conservative, &self.conservative),
            (Regime::Moderate, &self.moderate),
            (Regime::Aggressive, &self.aggressive),
        ] {
            for source in [rule.lower, rule.upper] {
                if let BoundSource::Fixed(value) = source {
                    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                        return Err(AllocationError::invalid_input(format!(
                            "{} bound {} must be in [0, 1]",
                            regime, value
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
