//! Dollar allocation of a budget across assets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, AllocationResult};

/// Minimum number of decimal places kept in amounts (cents).
const MIN_SCALE: u32 = 2;

/// Dollar amount assigned to one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    /// Asset name.
    pub asset: String,
    /// Amount in budget currency.
    pub amount: Decimal,
}

/// A budget split across assets.
///
/// Amounts are rounded to the budget's precision (at least cents) and always
/// sum exactly to the budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    budget: Decimal,
    amounts: Vec<AssetAmount>,
}

impl Allocation {
    /// Splits `budget` according to `weights`.
    ///
    /// Weights are normalized by their sum, then allocated by cumulative
    /// rounding: the running total after asset `k` is
    /// `round(budget * (w_0 + ... + w_k) / Σw)`, the last running total is the
    /// budget itself, and each amount is the difference of consecutive totals.
    /// Rounding error therefore never accumulates and no amount is negative.
    pub fn from_weights(
        budget: Decimal,
        assets: &[String],
        weights: &[f64],
    ) -> AllocationResult<Self> {
        if budget <= Decimal::ZERO {
            return Err(AllocationError::InvalidBudget {
                budget: budget.to_string(),
            });
        }
        if assets.len() != weights.len() {
            return Err(AllocationError::invalid_input(format!(
                "{} assets for {} weights",
                assets.len(),
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(AllocationError::invalid_input(format!(
                "Weights must be finite and non-negative, got {}",
                w
            )));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(AllocationError::invalid_input("Weights sum to zero"));
        }
        if !total.is_finite() {
            return Err(AllocationError::invalid_input("Weights sum overflows"));
        }

        let scale = budget.scale().max(MIN_SCALE);
        let last = weights.len() - 1;
        let mut cumulative_weight = 0.0;
        let mut allocated = Decimal::ZERO;
        let mut amounts = Vec::with_capacity(weights.len());

        for (i, (asset, weight)) in assets.iter().zip(weights).enumerate() {
            cumulative_weight += weight;
            let running_total = if i == last {
                budget
            } else {
                let fraction = cumulative_weight / total;
                let share = Decimal::from_f64_retain(fraction.min(1.0)).ok_or_else(|| {
                    AllocationError::invalid_input(format!(
                        "Cumulative weight fraction {} is not representable",
                        fraction
                    ))
                })?;
                budget
                    .checked_mul(share)
                    .ok_or_else(|| {
                        AllocationError::invalid_input(format!("Budget {} is too large", budget))
                    })?
                    .round_dp(scale)
                    .min(budget)
            };

            let mut amount = (running_total - allocated).max(Decimal::ZERO);
            amount.rescale(scale);
            allocated += amount;
            amounts.push(AssetAmount {
                asset: asset.clone(),
                amount,
            });
        }

        Ok(Self { budget, amounts })
    }

    /// The allocated budget.
    pub fn budget(&self) -> Decimal {
        self.budget
    }

    /// Amount for an asset.
    pub fn amount(&self, asset: &str) -> Option<Decimal> {
        self.amounts
            .iter()
            .find(|a| a.asset == asset)
            .map(|a| a.amount)
    }

    /// Sum of all amounts; equal to the budget.
    pub fn total(&self) -> Decimal {
        self.amounts.iter().map(|a| a.amount).sum()
    }

    /// Iterates the amounts in asset order.
    pub fn iter(&self) -> std::slice::Iter<'_, AssetAmount> {
        self.amounts.iter()
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// True if nothing was allocated.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

impl<'a> IntoIterator for &'a Allocation {
    type Item = &'a AssetAmount;
    type IntoIter = std::slice::Iter<'a, AssetAmount>;

    fn into_iter(self) -> Self::IntoIter {
        self.amounts.iter()
    }
}
