//! Assets command implementation.
//!
//! Lists the asset universe and, for a given risk tolerance, the weight
//! bounds each asset gets under the selected regime.

use anyhow::Result;
use ballast_portfolio::{PortfolioOptimizer, RiskTolerance};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::config::BallastConfig;
use crate::output::{format_percent, print_header, print_rows};

/// Arguments for the assets command.
#[derive(Args, Debug)]
pub struct AssetsArgs {
    /// Show the regime bounds for this risk tolerance
    #[arg(short = 't', long, allow_negative_numbers = true)]
    pub risk_tolerance: Option<i64>,
}

/// One asset class with its optional bounds.
#[derive(Debug, Serialize, Tabled)]
pub struct AssetRow {
    #[tabled(rename = "Asset")]
    pub name: String,
    #[tabled(rename = "Risk")]
    pub risk: f64,
    #[tabled(rename = "Min (conservative)")]
    pub min_conservative: String,
    #[tabled(rename = "Max (aggressive)")]
    pub max_aggressive: String,
    #[tabled(rename = "Lower", display_with = "display_bound")]
    pub lower: Option<f64>,
    #[tabled(rename = "Upper", display_with = "display_bound")]
    pub upper: Option<f64>,
}

fn display_bound(bound: &Option<f64>) -> String {
    bound.map(format_percent).unwrap_or_else(|| "-".to_string())
}

/// Execute the assets command.
pub fn execute(args: AssetsArgs, config: &BallastConfig, format: OutputFormat) -> Result<()> {
    let universe = &config.assets;
    let names = universe.names();

    let bounds = match args.risk_tolerance {
        Some(value) => {
            let tolerance = RiskTolerance::new(value)?;
            let optimizer =
                PortfolioOptimizer::new(universe.clone(), config.optimizer.clone())?;
            Some((tolerance, optimizer.bounds(&names, tolerance)?))
        }
        None => None,
    };

    let rows: Vec<AssetRow> = universe
        .iter()
        .enumerate()
        .map(|(i, asset)| AssetRow {
            name: asset.name.clone(),
            risk: asset.risk,
            min_conservative: format_percent(asset.min_conservative),
            max_aggressive: format_percent(asset.max_aggressive),
            lower: bounds.as_ref().map(|(_, b)| b.lower[i]),
            upper: bounds.as_ref().map(|(_, b)| b.upper[i]),
        })
        .collect();

    if format == OutputFormat::Table {
        match &bounds {
            Some((tolerance, b)) => {
                print_header(&format!("Asset Universe ({} regime at {})", b.regime, tolerance))
            }
            None => print_header("Asset Universe"),
        }
    }
    print_rows(&rows, format)
}
