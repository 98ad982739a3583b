//! Constrained mean-variance optimization.
//!
//! [`PortfolioOptimizer`] finds the weight vector `w` that maximizes the
//! risk-adjusted return
//!
//! ```text
//! w·r - (1 - t/10) * sqrt(wᵀΣw)
//! ```
//!
//! subject to `sum(w) = 1` and the bounds of the regime selected by the risk
//! tolerance `t`. The budget is then split by the optimal weights.

mod objective;

pub use objective::portfolio_volatility;

use ballast_math::optimization::{projected_gradient, CappedSimplex, Objective};
use log::{debug, info, warn};
use nalgebra::DVector;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use self::objective::{MinimumVolatility, RiskAdjustedReturn};
use crate::allocation::Allocation;
use crate::error::{AllocationError, AllocationResult};
use crate::market::{MarketDataSource, MarketEstimates};
use crate::types::{AssetUniverse, OptimizerConfig, Regime, RiskTolerance};

/// Weight assigned to one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetWeight {
    /// Asset name.
    pub asset: String,
    /// Fraction of the budget in [0, 1].
    pub weight: f64,
}

/// Result of an optimization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedPortfolio {
    /// Optimal weights in market-estimate order; they sum to 1.
    pub weights: Vec<AssetWeight>,

    /// Budget split by the weights.
    pub allocation: Allocation,

    /// Expected annual portfolio return `w·r`.
    pub expected_return: f64,

    /// Annual portfolio volatility `sqrt(wᵀΣw)`.
    pub volatility: f64,

    /// Objective value at the optimum.
    pub objective_value: f64,

    /// Solver iterations used.
    pub iterations: u32,

    /// Bound regime, absent for the minimum-volatility portfolio.
    pub regime: Option<Regime>,

    /// Risk tolerance, absent for the minimum-volatility portfolio.
    pub risk_tolerance: Option<RiskTolerance>,
}

impl OptimizedPortfolio {
    /// Weight of an asset.
    pub fn weight(&self, asset: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|w| w.asset == asset)
            .map(|w| w.weight)
    }

    /// Weights as a plain vector.
    pub fn weight_vector(&self) -> Vec<f64> {
        self.weights.iter().map(|w| w.weight).collect()
    }

    /// Expected return per unit of volatility, `None` for a riskless portfolio.
    pub fn return_to_risk(&self) -> Option<f64> {
        if self.volatility > 0.0 {
            Some(self.expected_return / self.volatility)
        } else {
            None
        }
    }
}

/// Regime bounds resolved for a concrete asset list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBounds {
    /// Regime selected by the risk tolerance.
    pub regime: Regime,
    /// Lower weight bound per asset.
    pub lower: Vec<f64>,
    /// Upper weight bound per asset.
    pub upper: Vec<f64>,
}

/// Mean-variance optimizer over an asset universe.
#[derive(Debug, Clone)]
pub struct PortfolioOptimizer {
    universe: AssetUniverse,
    config: OptimizerConfig,
}

impl Default for PortfolioOptimizer {
    fn default() -> Self {
        Self::standard()
    }
}

impl PortfolioOptimizer {
    /// Creates an optimizer, validating the configuration.
    pub fn new(universe: AssetUniverse, config: OptimizerConfig) -> AllocationResult<Self> {
        config.validate()?;
        Ok(Self { universe, config })
    }

    /// Standard five-class universe with default configuration.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            universe: AssetUniverse::standard(),
            config: OptimizerConfig::default(),
        }
    }

    /// The asset universe.
    pub fn universe(&self) -> &AssetUniverse {
        &self.universe
    }

    /// The configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Resolves the regime and per-asset bounds for `assets` at `tolerance`.
    ///
    /// Fails if an asset is not in the universe or if some lower bound exceeds
    /// its upper bound.
    pub fn bounds<S: AsRef<str>>(
        &self,
        assets: &[S],
        tolerance: RiskTolerance,
    ) -> AllocationResult<ResolvedBounds> {
        let classes = assets
            .iter()
            .map(|name| self.universe.require(name.as_ref()))
            .collect::<AllocationResult<Vec<_>>>()?;

        let regime = self.config.bounds.regime_for(tolerance);
        let (lower, upper) = self.config.bounds.bounds(regime, classes.iter().copied());

        if let Some(i) = (0..lower.len()).find(|&i| lower[i] > upper[i]) {
            return Err(AllocationError::invalid_input(format!(
                "Asset '{}': {} lower bound {} exceeds upper bound {}",
                classes[i].name, regime, lower[i], upper[i]
            )));
        }

        Ok(ResolvedBounds {
            regime,
            lower,
            upper,
        })
    }

    /// Optimizes weights for `estimates` at `tolerance` and splits `budget`.
    ///
    /// # Errors
    ///
    /// Configuration errors (bad budget, invalid estimates, unknown assets,
    /// infeasible bounds) are reported before the solver runs. A solver that
    /// hits the iteration limit or stalls yields a convergence error.
    pub fn optimize(
        &self,
        estimates: &MarketEstimates,
        tolerance: RiskTolerance,
        budget: Decimal,
    ) -> AllocationResult<OptimizedPortfolio> {
        check_budget(budget)?;
        estimates.validate(self.config.covariance_tolerance)?;

        let bounds = self.bounds(&estimates.assets, tolerance)?;
        debug!(
            "optimizing {} assets at risk tolerance {} ({} regime)",
            estimates.len(),
            tolerance,
            bounds.regime
        );
        let region = CappedSimplex::new(bounds.lower, bounds.upper, 1.0)?;

        let objective = RiskAdjustedReturn {
            returns: estimates.returns_vector(),
            covariance: estimates.covariance_matrix(),
            risk_aversion: tolerance.risk_aversion(),
        };

        let portfolio = self.solve(
            &objective,
            &region,
            estimates,
            budget,
            Some((bounds.regime, tolerance)),
        )?;
        info!(
            "risk tolerance {}: expected return {:.4}, volatility {:.4} after {} iterations",
            tolerance, portfolio.expected_return, portfolio.volatility, portfolio.iterations
        );
        Ok(portfolio)
    }

    /// Like [`optimize`](Self::optimize), pulling estimates from a source.
    pub fn optimize_from<S: MarketDataSource + ?Sized>(
        &self,
        source: &S,
        tolerance: RiskTolerance,
        budget: Decimal,
    ) -> AllocationResult<OptimizedPortfolio> {
        check_budget(budget)?;
        let estimates = source.estimates()?;
        self.optimize(&estimates, tolerance, budget)
    }

    /// Finds the fully invested long-only portfolio with the lowest volatility
    /// and splits `budget` by it. Regime bounds do not apply.
    pub fn optimize_minimum_volatility(
        &self,
        estimates: &MarketEstimates,
        budget: Decimal,
    ) -> AllocationResult<OptimizedPortfolio> {
        check_budget(budget)?;
        estimates.validate(self.config.covariance_tolerance)?;
        for asset in &estimates.assets {
            self.universe.require(asset)?;
        }

        let n = estimates.len();
        let region = CappedSimplex::new(vec![0.0; n], vec![1.0; n], 1.0)?;
        let objective = MinimumVolatility {
            covariance: estimates.covariance_matrix(),
        };

        let portfolio = self.solve(&objective, &region, estimates, budget, None)?;
        info!(
            "minimum volatility {:.4} (expected return {:.4}) after {} iterations",
            portfolio.volatility, portfolio.expected_return, portfolio.iterations
        );
        Ok(portfolio)
    }

    fn solve<O: Objective>(
        &self,
        objective: &O,
        region: &CappedSimplex,
        estimates: &MarketEstimates,
        budget: Decimal,
        regime: Option<(Regime, RiskTolerance)>,
    ) -> AllocationResult<OptimizedPortfolio> {
        let n = estimates.len();
        let initial = vec![1.0 / n as f64; n];

        let result = projected_gradient(objective, region, &initial, &self.config.solver())
            .map_err(|e| {
                warn!("optimization failed: {}", e);
                AllocationError::from(e)
            })?;

        // Iterates are projections; clamping only removes rounding noise.
        let weights: Vec<f64> = result
            .parameters
            .iter()
            .zip(region.lower().iter().zip(region.upper().iter()))
            .map(|(w, (lo, hi))| w.clamp(*lo, *hi))
            .collect();

        let w = DVector::from_column_slice(&weights);
        let expected_return = w.dot(&estimates.returns_vector());
        let volatility = portfolio_volatility(&estimates.covariance_matrix(), &w);
        let allocation = Allocation::from_weights(budget, &estimates.assets, &weights)?;

        Ok(OptimizedPortfolio {
            weights: estimates
                .assets
                .iter()
                .zip(&weights)
                .map(|(asset, weight)| AssetWeight {
                    asset: asset.clone(),
                    weight: *weight,
                })
                .collect(),
            allocation,
            expected_return,
            volatility,
            objective_value: result.objective_value,
            iterations: result.iterations,
            regime: regime.map(|(r, _)| r),
            risk_tolerance: regime.map(|(_, t)| t),
        })
    }
}

fn check_budget(budget: Decimal) -> AllocationResult<()> {
    if budget > Decimal::ZERO {
        Ok(())
    } else {
        Err(AllocationError::InvalidBudget {
            budget: budget.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetClass, BoundPolicy, BoundRule, BoundSource};
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn t(value: i64) -> RiskTolerance {
        RiskTolerance::new(value).unwrap()
    }

    #[test]
    fn test_standard_conservative() {
        let optimizer = PortfolioOptimizer::standard();
        let portfolio = optimizer
            .optimize(&MarketEstimates::standard(), t(2), dec!(10000))
            .unwrap();

        assert_eq!(portfolio.regime, Some(Regime::Conservative));
        assert_relative_eq!(portfolio.weight_vector().iter().sum::<f64>(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(portfolio.weight("stocks").unwrap(), 0.2, epsilon = 1e-4);
        assert_relative_eq!(portfolio.weight("bonds").unwrap(), 0.3, epsilon = 1e-4);
        assert_relative_eq!(portfolio.weight("commodities").unwrap(), 0.1, epsilon = 1e-4);
        assert_relative_eq!(portfolio.weight("cash").unwrap(), 0.2367, epsilon = 1e-3);
        assert_relative_eq!(portfolio.weight("crypto").unwrap(), 0.1633, epsilon = 1e-3);
        assert_eq!(portfolio.allocation.total(), dec!(10000));
    }

    #[test]
    fn test_result_metrics_are_consistent() {
        let estimates = MarketEstimates::standard();
        let portfolio = PortfolioOptimizer::standard()
            .optimize(&estimates, t(5), dec!(1000))
            .unwrap();

        let w = DVector::from_vec(portfolio.weight_vector());
        assert_relative_eq!(
            portfolio.expected_return,
            w.dot(&estimates.returns_vector()),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            portfolio.objective_value,
            -(portfolio.expected_return - 0.5 * portfolio.volatility),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            portfolio.return_to_risk().unwrap(),
            portfolio.expected_return / portfolio.volatility
        );
    }

    #[test]
    fn test_lower_above_upper_rejected() {
        let policy = BoundPolicy {
            moderate: BoundRule::new(BoundSource::MinConservative, BoundSource::Fixed(0.25)),
            ..BoundPolicy::default()
        };
        let optimizer = PortfolioOptimizer::new(
            AssetUniverse::standard(),
            OptimizerConfig::new().with_bounds(policy),
        )
        .unwrap();

        let err = optimizer
            .optimize(&MarketEstimates::standard(), t(5), dec!(100))
            .unwrap_err();
        assert!(err.to_string().contains("bonds"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unknown_asset() {
        let universe = AssetUniverse::new(vec![AssetClass::new("stocks", 0.8, 0.2, 0.8)]).unwrap();
        let optimizer = PortfolioOptimizer::new(universe, OptimizerConfig::default()).unwrap();

        let err = optimizer
            .optimize(&MarketEstimates::standard(), t(5), dec!(100))
            .unwrap_err();
        assert!(matches!(err, AllocationError::UnknownAsset { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = PortfolioOptimizer::new(
            AssetUniverse::standard(),
            OptimizerConfig::new().with_max_iterations(0),
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_minimum_volatility_diagonal() {
        let universe = AssetUniverse::new(vec![
            AssetClass::new("a", 0.1, 0.0, 1.0),
            AssetClass::new("b", 0.5, 0.0, 1.0),
            AssetClass::new("c", 0.9, 0.0, 1.0),
        ])
        .unwrap();
        let estimates = MarketEstimates::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![0.02, 0.08, 0.15],
            vec![
                vec![0.001, 0.0, 0.0],
                vec![0.0, 0.01, 0.0],
                vec![0.0, 0.0, 0.05],
            ],
        )
        .unwrap();

        let portfolio = PortfolioOptimizer::new(universe, OptimizerConfig::default())
            .unwrap()
            .optimize_minimum_volatility(&estimates, dec!(1000))
            .unwrap();

        // Inverse-variance weights: 1000 : 100 : 20
        assert_relative_eq!(portfolio.weight("a").unwrap(), 1000.0 / 1120.0, epsilon = 1e-6);
        assert_relative_eq!(portfolio.weight("b").unwrap(), 100.0 / 1120.0, epsilon = 1e-6);
        assert_relative_eq!(portfolio.weight("c").unwrap(), 20.0 / 1120.0, epsilon = 1e-6);
        assert!(portfolio.regime.is_none());
        assert!(portfolio.risk_tolerance.is_none());
    }

    #[test]
    fn test_optimize_from_source() {
        let optimizer = PortfolioOptimizer::standard();
        let direct = optimizer
            .optimize(&MarketEstimates::standard(), t(6), dec!(500))
            .unwrap();
        let sourced = optimizer
            .optimize_from(&MarketEstimates::standard(), t(6), dec!(500))
            .unwrap();
        assert_eq!(direct.weight_vector(), sourced.weight_vector());
    }

    #[test]
    fn test_uphill_objective_reports_stall() {
        // Gradient of the minimum-volatility objective with the sign flipped
        struct Uphill(MinimumVolatility);
        impl Objective for Uphill {
            fn value(&self, w: &DVector<f64>) -> f64 {
                self.0.value(w)
            }
            fn gradient(&self, w: &DVector<f64>) -> DVector<f64> {
                -self.0.gradient(w)
            }
        }

        let optimizer = PortfolioOptimizer::standard();
        let estimates = MarketEstimates::standard();
        let n = estimates.len();
        let region = CappedSimplex::new(vec![0.0; n], vec![1.0; n], 1.0).unwrap();
        let objective = Uphill(MinimumVolatility {
            covariance: estimates.covariance_matrix(),
        });

        let err = optimizer
            .solve(&objective, &region, &estimates, dec!(1000), None)
            .unwrap_err();

        assert!(matches!(err, AllocationError::Stalled { iteration: 0, .. }));
        assert!(err.is_convergence());
    }
}
