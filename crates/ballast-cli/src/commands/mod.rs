//! CLI command implementations.

pub mod assets;
pub mod estimate;
pub mod min_volatility;
pub mod optimize;
pub mod predict;

// Re-export submodules for convenience
pub use assets::AssetsArgs;
pub use estimate::EstimateArgs;
pub use min_volatility::MinVolatilityArgs;
pub use optimize::OptimizeArgs;
pub use predict::PredictArgs;

use std::path::Path;

use ballast_portfolio::{MarketEstimates, OptimizedPortfolio};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::config::BallastConfig;
use crate::error::{CliError, CliResult};
use crate::output::{format_percent, print_header, print_json, print_rows, KeyValue};

/// Market estimates from a JSON file, or the configured market.
pub fn load_market(path: Option<&Path>, config: &BallastConfig) -> CliResult<MarketEstimates> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::input_file(path, e))?;
            let market: MarketEstimates =
                serde_json::from_str(&content).map_err(|e| CliError::input_file(path, e))?;
            debug!("loaded {} assets from {}", market.len(), path.display());
            Ok(market)
        }
        None => Ok(config.market.clone()),
    }
}

/// Parses a budget, rejecting anything that is not a positive decimal.
pub fn parse_budget(s: &str) -> Result<Decimal, String> {
    let budget: Decimal = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a decimal amount", s))?;
    if budget <= Decimal::ZERO {
        return Err(format!("budget must be positive, got {}", budget));
    }
    Ok(budget)
}

/// One asset of an optimized portfolio.
#[derive(Debug, Serialize, Tabled)]
pub struct AllocationRow {
    #[tabled(rename = "Asset")]
    pub asset: String,
    #[tabled(rename = "Weight")]
    pub weight: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
}

/// Prints an optimized portfolio in the requested format.
pub fn print_portfolio(portfolio: &OptimizedPortfolio, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(portfolio);
    }

    let rows: Vec<AllocationRow> = portfolio
        .weights
        .iter()
        .zip(portfolio.allocation.iter())
        .map(|(w, a)| AllocationRow {
            asset: w.asset.clone(),
            weight: format_percent(w.weight),
            amount: a.amount.to_string(),
        })
        .collect();

    if format == OutputFormat::Csv {
        return print_rows(&rows, format);
    }

    print_header("Allocation");
    print_rows(&rows, format)?;

    let mut summary = Vec::new();
    if let (Some(regime), Some(tolerance)) = (portfolio.regime, portfolio.risk_tolerance) {
        summary.push(KeyValue::new("Risk Tolerance", tolerance.to_string()));
        summary.push(KeyValue::new("Regime", regime.to_string()));
    }
    summary.push(KeyValue::new("Budget", portfolio.allocation.budget().to_string()));
    summary.push(KeyValue::from_percent("Expected Return", portfolio.expected_return));
    summary.push(KeyValue::from_percent("Volatility", portfolio.volatility));
    if let Some(ratio) = portfolio.return_to_risk() {
        summary.push(KeyValue::new("Return / Risk", format!("{:.4}", ratio)));
    }
    summary.push(KeyValue::new("Iterations", portfolio.iterations.to_string()));

    print_header("Summary");
    print_rows(&summary, format)
}
