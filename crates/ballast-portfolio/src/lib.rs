//! # Ballast Portfolio
//!
//! Constrained allocation of a budget across broad asset classes.
//!
//! Given expected returns, a covariance matrix and a risk tolerance from 1 to
//! 10, the optimizer maximizes the risk-adjusted return
//! `w·r - (1 - t/10) * sqrt(wᵀΣw)` over fully invested weights whose bounds
//! depend on the risk regime, then splits the budget into exact dollar
//! amounts.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: All calculations are stateless with explicit inputs
//! - **Bounds as data**: Regime thresholds and weight bounds live in a [`BoundPolicy`] table
//! - **Explicit failure**: Configuration and convergence errors are reported, never
//!   replaced by a default allocation
//! - **Exact money**: Dollar amounts are `Decimal` and sum exactly to the budget
//!
//! ## Quick Start
//!
//! ```rust
//! use ballast_portfolio::prelude::*;
//!
//! let optimizer = PortfolioOptimizer::standard();
//! let tolerance = RiskTolerance::new(2)?;
//!
//! let portfolio = optimizer.optimize(&MarketEstimates::standard(), tolerance, dec!(10000))?;
//!
//! assert_eq!(portfolio.regime, Some(Regime::Conservative));
//! assert_eq!(portfolio.allocation.total(), dec!(10000));
//! # Ok::<(), AllocationError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`optimizer`] - Risk-adjusted and minimum-volatility optimization
//! - [`allocation`] - Budget split with exact rounding
//! - [`market`] - Market estimates and their sources
//! - [`types`] - Asset universe, risk tolerance, bound policy, configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod allocation;
pub mod error;
pub mod market;
pub mod optimizer;
pub mod types;

// Re-export error types at crate root
pub use error::{AllocationError, AllocationResult, ErrorKind};

// Re-export main types
pub use types::{
    AssetClass, AssetUniverse, BoundPolicy, BoundRule, BoundSource, OptimizerConfig, Regime,
    RiskTolerance,
};

pub use allocation::{Allocation, AssetAmount};

pub use market::{
    HistoricalEstimator, MacroAdjustedReturns, MacroIndicators, MarketDataSource,
    MarketEstimates, PriceHistory, DEFAULT_COVARIANCE_TOLERANCE, NEUTRAL_SENTIMENT,
    STANDARD_SENTIMENT, TRADING_DAYS_PER_YEAR,
};

pub use optimizer::{
    portfolio_volatility, AssetWeight, OptimizedPortfolio, PortfolioOptimizer, ResolvedBounds,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use ballast_portfolio::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{AllocationError, AllocationResult, ErrorKind};

    pub use crate::types::{
        AssetClass, AssetUniverse, BoundPolicy, OptimizerConfig, Regime, RiskTolerance,
    };

    pub use crate::allocation::Allocation;

    pub use crate::market::{
        HistoricalEstimator, MacroAdjustedReturns, MacroIndicators, MarketDataSource,
        MarketEstimates, PriceHistory,
    };

    pub use crate::optimizer::{OptimizedPortfolio, PortfolioOptimizer};

    pub use rust_decimal::Decimal;
    pub use rust_decimal_macros::dec;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_compiles() {
        let err = AllocationError::unknown_asset("gold");
        assert!(err.to_string().contains("gold"));
    }
}
