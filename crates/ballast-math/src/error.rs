//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone)]
pub enum MathError {
    /// Optimizer exhausted its iteration budget before reaching stationarity.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final projected-gradient residual.
        residual: f64,
    },

    /// Backtracking could not find a step that decreases the objective.
    #[error("Line search stalled at iteration {iteration} (residual: {residual:.2e})")]
    LineSearchFailed {
        /// Iteration at which the line search gave up.
        iteration: u32,
        /// Projected-gradient residual at that point.
        residual: f64,
    },

    /// The constraint set `sum(x) = total, lower <= x <= upper` is empty.
    #[error(
        "Infeasible constraints: bounds admit sums in [{lower_sum:.6}, {upper_sum:.6}], need {total}"
    )]
    InfeasibleConstraints {
        /// Sum of the lower bounds.
        lower_sum: f64,
        /// Sum of the upper bounds.
        upper_sum: f64,
        /// Required total.
        total: f64,
    },

    /// Matrix dimensions are incompatible.
    #[error("Incompatible matrix dimensions: ({rows1}x{cols1}) and ({rows2}x{cols2})")]
    DimensionMismatch {
        /// Rows in first operand.
        rows1: usize,
        /// Columns in first operand.
        cols1: usize,
        /// Rows in second operand.
        rows2: usize,
        /// Columns in second operand.
        cols2: usize,
    },

    /// Matrix is not symmetric.
    #[error("Matrix is not symmetric: entries ({row},{col}) differ by {deviation:.2e}")]
    NotSymmetric {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// Absolute difference between (row,col) and (col,row).
        deviation: f64,
    },

    /// Matrix has a negative eigenvalue beyond tolerance.
    #[error("Matrix is not positive semidefinite (minimum eigenvalue: {min_eigenvalue:.2e})")]
    NotPositiveSemidefinite {
        /// The most negative eigenvalue.
        min_eigenvalue: f64,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Returns true if the error comes from an iterative method failing to finish,
    /// as opposed to bad input.
    #[must_use]
    pub fn is_convergence(&self) -> bool {
        matches!(
            self,
            Self::ConvergenceFailed { .. } | Self::LineSearchFailed { .. }
        )
    }
}
