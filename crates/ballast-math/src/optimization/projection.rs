//! Euclidean projection onto a capped simplex.

use crate::error::{MathError, MathResult};
use nalgebra::DVector;

/// Slack allowed when checking that the bounds can reach the required total.
const FEASIBILITY_SLACK: f64 = 1e-12;

/// The set `{ x : sum(x) = total, lower <= x <= upper }`.
#[derive(Debug, Clone)]
pub struct CappedSimplex {
    lower: DVector<f64>,
    upper: DVector<f64>,
    total: f64,
}

impl CappedSimplex {
    /// Creates a capped simplex, rejecting empty sets.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the bound vectors differ in length, are empty, contain
    ///   non-finite values, or some `lower_i > upper_i`
    /// - `InfeasibleConstraints` if no point of the box sums to `total`
    pub fn new(lower: Vec<f64>, upper: Vec<f64>, total: f64) -> MathResult<Self> {
        if lower.len() != upper.len() {
            return Err(MathError::DimensionMismatch {
                rows1: lower.len(),
                cols1: 1,
                rows2: upper.len(),
                cols2: 1,
            });
        }
        if lower.is_empty() {
            return Err(MathError::invalid_input("Capped simplex needs at least one coordinate"));
        }
        if !total.is_finite() || lower.iter().chain(upper.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("Bounds and total must be finite"));
        }
        if let Some(i) = (0..lower.len()).find(|&i| lower[i] > upper[i]) {
            return Err(MathError::invalid_input(format!(
                "Lower bound {} exceeds upper bound {} at coordinate {}",
                lower[i], upper[i], i
            )));
        }

        let lower_sum: f64 = lower.iter().sum();
        let upper_sum: f64 = upper.iter().sum();
        if lower_sum > total + FEASIBILITY_SLACK || upper_sum < total - FEASIBILITY_SLACK {
            return Err(MathError::InfeasibleConstraints {
                lower_sum,
                upper_sum,
                total,
            });
        }

        Ok(Self {
            lower: DVector::from_vec(lower),
            upper: DVector::from_vec(upper),
            total,
        })
    }

    /// Number of coordinates.
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    /// Lower bounds.
    pub fn lower(&self) -> &DVector<f64> {
        &self.lower
    }

    /// Upper bounds.
    pub fn upper(&self) -> &DVector<f64> {
        &self.upper
    }

    /// Required coordinate sum.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Returns true if `x` lies in the set within `tolerance`.
    pub fn contains(&self, x: &DVector<f64>, tolerance: f64) -> bool {
        x.len() == self.dimension()
            && (x.sum() - self.total).abs() <= tolerance
            && x.iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(v, (lo, hi))| *v >= lo - tolerance && *v <= hi + tolerance)
    }

    /// Projects `y` onto the set.
    ///
    /// The projection is `clamp(y_i - tau, lower_i, upper_i)` for the shift `tau`
    /// at which the clamped coordinates sum to `total`. The clamped sum is
    /// piecewise linear and non-increasing in `tau` with kinks at
    /// `y_i - upper_i` and `y_i - lower_i`, so `tau` is found exactly by
    /// interpolating between the two kinks that bracket `total`.
    ///
    /// # Panics
    ///
    /// Panics if `y.len()` differs from [`dimension`](Self::dimension).
    pub fn project(&self, y: &DVector<f64>) -> DVector<f64> {
        let n = self.dimension();
        assert_eq!(
            y.len(),
            n,
            "cannot project a {}-vector onto a {}-dimensional capped simplex",
            y.len(),
            n
        );

        let mass = |tau: f64| -> f64 {
            (0..n)
                .map(|i| (y[i] - tau).clamp(self.lower[i], self.upper[i]))
                .sum()
        };

        let mut kinks: Vec<f64> = (0..n)
            .flat_map(|i| [y[i] - self.upper[i], y[i] - self.lower[i]])
            .collect();
        kinks.sort_by(f64::total_cmp);
        kinks.dedup();

        // Left of the first kink every coordinate sits at its upper bound,
        // right of the last one at its lower bound.
        let mut tau = kinks[kinks.len() - 1];
        if mass(kinks[0]) <= self.total {
            tau = kinks[0];
        } else {
            for window in kinks.windows(2) {
                let (a, b) = (window[0], window[1]);
                let (mass_a, mass_b) = (mass(a), mass(b));
                if mass_b <= self.total {
                    tau = if mass_a > mass_b {
                        a + (mass_a - self.total) * (b - a) / (mass_a - mass_b)
                    } else {
                        a
                    };
                    break;
                }
            }
        }

        DVector::from_fn(n, |i, _| (y[i] - tau).clamp(self.lower[i], self.upper[i]))
    }
}
