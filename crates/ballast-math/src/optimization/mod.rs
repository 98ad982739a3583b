//! Optimization algorithms.
//!
//! This module provides constrained minimization over a capped simplex,
//! the feasible set of a fully-invested, box-bounded weight vector:
//!
//! ```text
//! { x : x_1 + ... + x_n = total,  lower_i <= x_i <= upper_i }
//! ```
//!
//! - [`CappedSimplex`]: the feasible set and its exact Euclidean projection
//! - [`projected_gradient`]: spectral projected-gradient minimizer
//!
//! # Example
//!
//! ```rust
//! use ballast_math::optimization::{projected_gradient, CappedSimplex, Objective, OptimizationConfig};
//! use nalgebra::DVector;
//!
//! // Minimize (x0 - 0.9)^2 + (x1 - 0.9)^2 with x0 + x1 = 1, 0 <= x <= 1
//! struct Target;
//!
//! impl Objective for Target {
//!     fn value(&self, x: &DVector<f64>) -> f64 {
//!         x.iter().map(|v| (v - 0.9).powi(2)).sum()
//!     }
//!     fn gradient(&self, x: &DVector<f64>) -> DVector<f64> {
//!         x.map(|v| 2.0 * (v - 0.9))
//!     }
//! }
//!
//! let region = CappedSimplex::new(vec![0.0, 0.0], vec![1.0, 1.0], 1.0).unwrap();
//! let result = projected_gradient(&Target, &region, &[0.5, 0.5], &OptimizationConfig::default()).unwrap();
//! assert!((result.parameters[0] - 0.5).abs() < 1e-8);
//! ```

mod projected_gradient;
mod projection;

pub use projected_gradient::projected_gradient;
pub use projection::CappedSimplex;

use nalgebra::DVector;

/// Default stationarity tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Default maximum iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 200;

/// Configuration for optimization algorithms.
#[derive(Debug, Clone, Copy)]
pub struct OptimizationConfig {
    /// Tolerance on the projected-gradient residual `‖P(x - ∇f) - x‖∞`.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl OptimizationConfig {
    /// Creates a new optimization configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final objective function value.
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Projected-gradient residual at the returned point.
    pub residual: f64,
}

/// A differentiable objective function.
pub trait Objective {
    /// Evaluates the objective at `x`.
    fn value(&self, x: &DVector<f64>) -> f64;

    /// Evaluates the gradient at `x`.
    fn gradient(&self, x: &DVector<f64>) -> DVector<f64>;
}

impl<T: Objective + ?Sized> Objective for &T {
    fn value(&self, x: &DVector<f64>) -> f64 {
        (**self).value(x)
    }

    fn gradient(&self, x: &DVector<f64>) -> DVector<f64> {
        (**self).gradient(x)
    }
}
