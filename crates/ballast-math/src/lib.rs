//! # Ballast Math
//!
//! Numerical kernels for the Ballast portfolio allocation library.
//!
//! This crate provides:
//!
//! - **Optimization**: Spectral projected-gradient minimization over a capped simplex
//!   (`sum(x) = total`, `lower <= x <= upper`)
//! - **Linear Algebra**: Symmetry and positive-semidefiniteness checks, quadratic forms
//! - **Statistics**: Period returns, means and sample covariance of aligned series
//!
//! ## Design Philosophy
//!
//! - **Explicit failure**: A solver that does not converge returns an error, never its
//!   starting point
//! - **Numerical Stability**: Exact projections, finite-value checks at every boundary
//! - **Small surface**: `f64` and `nalgebra` dynamic matrices only

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod linear_algebra;
pub mod optimization;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{
        check_positive_semidefinite, check_symmetric, min_eigenvalue, quadratic_form,
    };
    pub use crate::optimization::{
        projected_gradient, CappedSimplex, Objective, OptimizationConfig, OptimizationResult,
    };
    pub use crate::statistics::{mean, sample_covariance, simple_returns};
}

pub use error::{MathError, MathResult};
