//! Portfolio objectives.

use ballast_math::linear_algebra::quadratic_form;
use ballast_math::optimization::Objective;
use nalgebra::{DMatrix, DVector};

/// Below this volatility the risk term is treated as flat.
const VOLATILITY_FLOOR: f64 = 1e-12;

/// Portfolio volatility `sqrt(wᵀΣw)`.
pub fn portfolio_volatility(covariance: &DMatrix<f64>, weights: &DVector<f64>) -> f64 {
    quadratic_form(covariance, weights).max(0.0).sqrt()
}

/// Gradient of `sqrt(wᵀΣw)`: `Σw / sqrt(wᵀΣw)`, zero at zero volatility.
fn volatility_gradient(covariance: &DMatrix<f64>, weights: &DVector<f64>) -> DVector<f64> {
    let sigma_w = covariance * weights;
    let volatility = weights.dot(&sigma_w).max(0.0).sqrt();
    if volatility < VOLATILITY_FLOOR {
        DVector::zeros(weights.len())
    } else {
        sigma_w / volatility
    }
}

/// `-(w·r - λ·sqrt(wᵀΣw))`: negative risk-adjusted return.
#[derive(Debug, Clone)]
pub(crate) struct RiskAdjustedReturn {
    pub returns: DVector<f64>,
    pub covariance: DMatrix<f64>,
    pub risk_aversion: f64,
}

impl Objective for RiskAdjustedReturn {
    fn value(&self, w: &DVector<f64>) -> f64 {
        -(w.dot(&self.returns) - self.risk_aversion * portfolio_volatility(&self.covariance, w))
    }

    fn gradient(&self, w: &DVector<f64>) -> DVector<f64> {
        volatility_gradient(&self.covariance, w) * self.risk_aversion - &self.returns
    }
}

/// `sqrt(wᵀΣw)`.
#[derive(Debug, Clone)]
pub(crate) struct MinimumVolatility {
    pub covariance: DMatrix<f64>,
}

impl Objective for MinimumVolatility {
    fn value(&self, w: &DVector<f64>) -> f64 {
        portfolio_volatility(&self.covariance, w)
    }

    fn gradient(&self, w: &DVector<f64>) -> DVector<f64> {
        volatility_gradient(&self.covariance, w)
    }
}
