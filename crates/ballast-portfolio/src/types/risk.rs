//! Risk tolerance and risk regimes.

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, AllocationResult};

/// Caller preference for aggressiveness: 1 (most conservative) to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RiskTolerance(u8);

impl RiskTolerance {
    /// Lowest accepted tolerance.
    pub const MIN: u8 = 1;

    /// Highest accepted tolerance.
    pub const MAX: u8 = 10;

    /// Creates a risk tolerance, rejecting values outside 1..=10.
    pub fn new(value: i64) -> AllocationResult<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            // Range-checked above
            Ok(Self(value as u8))
        } else {
            Err(AllocationError::InvalidRiskTolerance { value })
        }
    }

    /// The raw value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Risk-aversion coefficient `1 - t/10` applied to portfolio volatility.
    ///
    /// Ranges from 0.9 at t = 1 down to 0.0 at t = 10.
    #[must_use]
    pub fn risk_aversion(self) -> f64 {
        1.0 - f64::from(self.0) / 10.0
    }

    /// All valid tolerances in increasing order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<i64> for RiskTolerance {
    type Error = AllocationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RiskTolerance> for u8 {
    fn from(tolerance: RiskTolerance) -> Self {
        tolerance.0
    }
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

/// Bound regime selected by risk tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Low tolerance: per-asset minimum weights.
    Conservative,
    /// Middle tolerance: uniform weight band.
    Moderate,
    /// High tolerance: per-asset maximum weights.
    Aggressive,
}

impl Regime {
    /// Returns a human-readable name for the regime.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
