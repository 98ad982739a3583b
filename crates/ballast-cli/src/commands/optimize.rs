//! Optimize command implementation.
//!
//! Runs the risk-adjusted optimizer for one risk tolerance and prints the
//! weights, dollar amounts and portfolio statistics.

use std::path::PathBuf;

use anyhow::Result;
use ballast_portfolio::{PortfolioOptimizer, RiskTolerance};
use clap::Args;
use rust_decimal::Decimal;

use crate::cli::OutputFormat;
use crate::commands::{load_market, parse_budget, print_portfolio};
use crate::config::BallastConfig;

/// Arguments for the optimize command.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Amount to allocate, e.g. 10000 or 2500.50
    #[arg(short, long, value_parser = parse_budget)]
    pub budget: Decimal,

    /// Risk tolerance from 1 (most conservative) to 10 (most aggressive)
    #[arg(short = 't', long, allow_negative_numbers = true)]
    pub risk_tolerance: i64,

    /// Market estimates JSON (defaults to the configured market)
    #[arg(short, long)]
    pub market: Option<PathBuf>,

    /// Override the solver iteration limit
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Override the solver tolerance
    #[arg(long)]
    pub tolerance: Option<f64>,
}

/// Execute the optimize command.
pub fn execute(args: OptimizeArgs, config: &BallastConfig, format: OutputFormat) -> Result<()> {
    let tolerance = RiskTolerance::new(args.risk_tolerance)?;
    let market = load_market(args.market.as_deref(), config)?;

    let mut optimizer_config = config.optimizer.clone();
    if let Some(max_iterations) = args.max_iterations {
        optimizer_config = optimizer_config.with_max_iterations(max_iterations);
    }
    if let Some(solver_tolerance) = args.tolerance {
        optimizer_config = optimizer_config.with_tolerance(solver_tolerance);
    }

    let optimizer = PortfolioOptimizer::new(config.assets.clone(), optimizer_config)?;
    let portfolio = optimizer.optimize(&market, tolerance, args.budget)?;

    print_portfolio(&portfolio, format)
}
