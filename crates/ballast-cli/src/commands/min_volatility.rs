//! Minimum-volatility command implementation.

use std::path::PathBuf;

use anyhow::Result;
use ballast_portfolio::PortfolioOptimizer;
use clap::Args;
use rust_decimal::Decimal;

use crate::cli::OutputFormat;
use crate::commands::{load_market, parse_budget, print_portfolio};
use crate::config::BallastConfig;

/// Arguments for the min-volatility command.
#[derive(Args, Debug)]
pub struct MinVolatilityArgs {
    /// Amount to allocate
    #[arg(short, long, value_parser = parse_budget)]
    pub budget: Decimal,

    /// Market estimates JSON (defaults to the configured market)
    #[arg(short, long)]
    pub market: Option<PathBuf>,
}

/// Execute the min-volatility command.
pub fn execute(args: MinVolatilityArgs, config: &BallastConfig, format: OutputFormat) -> Result<()> {
    let market = load_market(args.market.as_deref(), config)?;
    let optimizer = PortfolioOptimizer::new(config.assets.clone(), config.optimizer.clone())?;
    let portfolio = optimizer.optimize_minimum_volatility(&market, args.budget)?;

    print_portfolio(&portfolio, format)
}
