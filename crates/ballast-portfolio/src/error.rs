//! Error types for portfolio allocation.
//!
//! Every error is either a configuration problem (the inputs can never produce
//! a valid allocation) or a convergence problem (the inputs are valid but the
//! solver did not finish). [`AllocationError::kind`] tells them apart.

use ballast_math::MathError;
use thiserror::Error;

/// Result type for allocation operations.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Broad classification of an [`AllocationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Inputs are inconsistent or out of range; fix the inputs.
    Configuration,
    /// Inputs are valid but the solver did not reach an optimum.
    Convergence,
}

/// Errors that can occur while computing an allocation.
#[derive(Error, Debug, Clone)]
pub enum AllocationError {
    /// Returns vector and covariance matrix disagree in size.
    #[error(
        "Dimension mismatch: {returns} expected returns but covariance is {rows}x{cols}"
    )]
    DimensionMismatch {
        /// Number of expected returns.
        returns: usize,
        /// Covariance rows.
        rows: usize,
        /// Covariance columns.
        cols: usize,
    },

    /// Budget is zero or negative.
    #[error("Invalid budget: {budget} (must be positive)")]
    InvalidBudget {
        /// The rejected budget.
        budget: String,
    },

    /// Risk tolerance outside 1..=10.
    #[error("Invalid risk tolerance: {value} (must be between 1 and 10)")]
    InvalidRiskTolerance {
        /// The rejected value.
        value: i64,
    },

    /// No weight vector satisfies both the bounds and `sum(w) = 1`.
    #[error(
        "Infeasible bounds: lower bounds sum to {lower_sum:.4}, upper bounds sum to {upper_sum:.4}; weights must sum to 1"
    )]
    InfeasibleBounds {
        /// Sum of lower bounds.
        lower_sum: f64,
        /// Sum of upper bounds.
        upper_sum: f64,
    },

    /// Covariance matrix is not a valid covariance matrix.
    #[error("Invalid covariance matrix: {reason}")]
    InvalidCovariance {
        /// Why the matrix was rejected.
        reason: String,
    },

    /// Asset is not part of the configured universe.
    #[error("Unknown asset class: '{asset}'")]
    UnknownAsset {
        /// The asset name.
        asset: String,
    },

    /// Not enough observations to estimate market statistics.
    #[error("Insufficient history: need at least {required} observations, got {actual}")]
    InsufficientHistory {
        /// Minimum observations.
        required: usize,
        /// Observations supplied.
        actual: usize,
    },

    /// Any other invalid input.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the problem.
        reason: String,
    },

    /// Solver hit its iteration limit.
    #[error("Optimizer did not converge within {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Iterations attempted.
        iterations: u32,
        /// Final optimality residual.
        residual: f64,
    },

    /// Solver could not make progress.
    #[error("Optimizer stalled at iteration {iteration} (residual: {residual:.2e})")]
    Stalled {
        /// Iteration at which progress stopped.
        iteration: u32,
        /// Optimality residual at that point.
        residual: f64,
    },
}

impl AllocationError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an invalid covariance error.
    #[must_use]
    pub fn invalid_covariance(reason: impl Into<String>) -> Self {
        Self::InvalidCovariance {
            reason: reason.into(),
        }
    }

    /// Create an unknown asset error.
    #[must_use]
    pub fn unknown_asset(asset: impl Into<String>) -> Self {
        Self::UnknownAsset {
            asset: asset.into(),
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConvergenceFailed { .. } | Self::Stalled { .. } => ErrorKind::Convergence,
            _ => ErrorKind::Configuration,
        }
    }

    /// Returns true for configuration errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Returns true for convergence errors.
    #[must_use]
    pub fn is_convergence(&self) -> bool {
        self.kind() == ErrorKind::Convergence
    }
}

impl From<MathError> for AllocationError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::ConvergenceFailed {
                iterations,
                residual,
            } => Self::ConvergenceFailed {
                iterations,
                residual,
            },
            MathError::LineSearchFailed {
                iteration,
                residual,
            } => Self::Stalled {
                iteration,
                residual,
            },
            MathError::InfeasibleConstraints {
                lower_sum,
                upper_sum,
                ..
            } => Self::InfeasibleBounds {
                lower_sum,
                upper_sum,
            },
            MathError::NotSymmetric { .. } | MathError::NotPositiveSemidefinite { .. } => {
                Self::invalid_covariance(err.to_string())
            }
            MathError::InsufficientData { required, actual } => {
                Self::InsufficientHistory { required, actual }
            }
            other => Self::invalid_input(other.to_string()),
        }
    }
}
