//! Configuration for the portfolio optimizer.

use ballast_math::optimization::{OptimizationConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};

use super::BoundPolicy;
use crate::error::{AllocationError, AllocationResult};

/// Configuration for the portfolio optimizer.
///
/// Controls the solver budget, input checks and the regime bound table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Maximum solver iterations before failing with a convergence error.
    pub max_iterations: u32,

    /// Stationarity tolerance of the solver.
    pub tolerance: f64,

    /// Relative tolerance for covariance symmetry and semidefiniteness checks.
    pub covariance_tolerance: f64,

    /// Regime thresholds and per-regime bound rules.
    pub bounds: BoundPolicy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            covariance_tolerance: 1e-10,
            bounds: BoundPolicy::default(),
        }
    }
}

impl OptimizerConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the covariance check tolerance.
    #[must_use]
    pub fn with_covariance_tolerance(mut self, tolerance: f64) -> Self {
        self.covariance_tolerance = tolerance;
        self
    }

    /// Sets the bound policy.
    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    /// Checks every field.
    pub fn validate(&self) -> AllocationResult<()> {
        if self.max_iterations == 0 {
            return Err(AllocationError::invalid_input(
                "max_iterations must be at least 1",
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AllocationError::invalid_input(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.covariance_tolerance.is_finite() && self.covariance_tolerance >= 0.0) {
            return Err(AllocationError::invalid_input(format!(
                "covariance_tolerance must be non-negative, got {}",
                self.covariance_tolerance
            )));
        }
        self.bounds.validate()
    }

    /// Solver settings for the numerical kernel.
    #[must_use]
    pub fn solver(&self) -> OptimizationConfig {
        OptimizationConfig::new(self.tolerance, self.max_iterations)
    }
}
