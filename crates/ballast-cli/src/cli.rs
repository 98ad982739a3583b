//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{AssetsArgs, EstimateArgs, MinVolatilityArgs, OptimizeArgs, PredictArgs};

/// Ballast - Constrained portfolio allocation across asset classes
#[derive(Parser)]
#[command(name = "ballast")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Configuration file (defaults to ./ballast.toml when present)
    #[arg(short, long, global = true, env = "BALLAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Optimize weights for a risk tolerance and split a budget
    Optimize(OptimizeArgs),

    /// Find the lowest-volatility fully invested portfolio
    MinVolatility(MinVolatilityArgs),

    /// Estimate expected returns and covariance from a price history CSV
    Estimate(EstimateArgs),

    /// Adjust expected returns for macro indicators and sentiment
    Predict(PredictArgs),

    /// Show the asset universe and its regime bounds
    Assets(AssetsArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}
