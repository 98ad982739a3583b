//! Spectral projected-gradient minimization.

use log::{debug, trace, warn};
use nalgebra::DVector;

use super::{CappedSimplex, Objective, OptimizationConfig, OptimizationResult};
use crate::error::{MathError, MathResult};

/// Armijo sufficient-decrease parameter.
const SUFFICIENT_DECREASE: f64 = 1e-4;

/// Backtracking gives up below this step fraction.
const MIN_STEP: f64 = 1e-20;

/// Safeguards for the Barzilai-Borwein step length. The upper cap keeps
/// `x - alpha * g` small enough that the projection shift stays accurate.
const MIN_SPECTRAL_STEP: f64 = 1e-10;
const MAX_SPECTRAL_STEP: f64 = 1e4;

/// Minimizes `objective` over a capped simplex.
///
/// Each iteration projects a Barzilai-Borwein gradient step back onto the
/// feasible set and backtracks along the resulting direction until the Armijo
/// condition holds. Iterates stay feasible throughout. The run stops when the
/// projected-gradient residual `‖P(x - ∇f(x)) - x‖∞` falls below
/// `config.tolerance`, which is the first-order optimality (KKT) condition for
/// this constraint set.
///
/// # Arguments
///
/// * `objective` - Function and gradient to minimize
/// * `region` - Feasible set
/// * `initial` - Starting point; projected onto `region` before the first step
/// * `config` - Tolerance and iteration limit
///
/// # Errors
///
/// - `DimensionMismatch` if `initial` does not match the region
/// - `InvalidInput` if the objective or gradient becomes non-finite
/// - `LineSearchFailed` if backtracking shrinks the step below the rounding
///   level of `x` without meeting the Armijo condition
/// - `ConvergenceFailed` if the iteration limit is reached first
pub fn projected_gradient<O>(
    objective: O,
    region: &CappedSimplex,
    initial: &[f64],
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    O: Objective,
{
    let n = region.dimension();
    if initial.len() != n {
        return Err(MathError::DimensionMismatch {
            rows1: initial.len(),
            cols1: 1,
            rows2: n,
            cols2: 1,
        });
    }

    let mut x = region.project(&DVector::from_column_slice(initial));
    let mut fx = objective.value(&x);
    let mut gx = objective.gradient(&x);
    ensure_finite(fx, &gx)?;

    let mut alpha = 1.0;

    for iteration in 0..config.max_iterations {
        let residual = stationarity(region, &x, &gx);
        trace!(
            "projected gradient iteration {}: f = {:.10e}, residual = {:.3e}, alpha = {:.3e}",
            iteration,
            fx,
            residual,
            alpha
        );

        if residual < config.tolerance {
            debug!(
                "projected gradient converged in {} iterations (f = {:.10e})",
                iteration, fx
            );
            return Ok(OptimizationResult {
                parameters: x.iter().copied().collect(),
                objective_value: fx,
                iterations: iteration,
                residual,
            });
        }

        let direction = region.project(&(&x - &gx * alpha)) - &x;
        let slope = gx.dot(&direction);

        // Displacements this small are lost to rounding in `x`.
        let resolution = f64::EPSILON * x.amax().max(1.0);

        let mut step = 1.0;
        let (x_next, f_next) = loop {
            let candidate = &x + &direction * step;
            let moved = (&candidate - &x).amax() > resolution;
            let value = objective.value(&candidate);
            if moved && value.is_finite() && value <= fx + SUFFICIENT_DECREASE * step * slope {
                break (candidate, value);
            }
            step *= 0.5;
            if !moved || step < MIN_STEP {
                warn!(
                    "projected gradient line search stalled at iteration {} (residual = {:.3e})",
                    iteration, residual
                );
                return Err(MathError::LineSearchFailed {
                    iteration,
                    residual,
                });
            }
        };

        let g_next = objective.gradient(&x_next);
        ensure_finite(f_next, &g_next)?;

        let s = &x_next - &x;
        let y = &g_next - &gx;
        let curvature = s.dot(&y);
        alpha = if curvature > 0.0 {
            (s.norm_squared() / curvature).clamp(MIN_SPECTRAL_STEP, MAX_SPECTRAL_STEP)
        } else {
            MAX_SPECTRAL_STEP
        };

        x = x_next;
        fx = f_next;
        gx = g_next;
    }

    let residual = stationarity(region, &x, &gx);
    if residual < config.tolerance {
        return Ok(OptimizationResult {
            parameters: x.iter().copied().collect(),
            objective_value: fx,
            iterations: config.max_iterations,
            residual,
        });
    }

    warn!(
        "projected gradient did not converge in {} iterations (residual = {:.3e})",
        config.max_iterations, residual
    );
    Err(MathError::convergence_failed(config.max_iterations, residual))
}

/// `‖P(x - g) - x‖∞`; zero exactly at KKT points.
fn stationarity(region: &CappedSimplex, x: &DVector<f64>, g: &DVector<f64>) -> f64 {
    (region.project(&(x - g)) - x).amax()
}

fn ensure_finite(value: f64, gradient: &DVector<f64>) -> MathResult<()> {
    if !value.is_finite() || gradient.iter().any(|g| !g.is_finite()) {
        return Err(MathError::invalid_input(
            "Objective or gradient is not finite",
        ));
    }
    Ok(())
}
