//! Ballast CLI - Command-line interface for portfolio allocation.
//!
//! # Usage
//!
//! ```bash
//! # Optimize a $10,000 portfolio at risk tolerance 2
//! ballast optimize --budget 10000 --risk-tolerance 2
//!
//! # Lowest-volatility portfolio for a market file
//! ballast min-volatility --budget 10000 --market market.json
//!
//! # Estimate returns and covariance from a price history
//! ballast estimate --prices prices.csv --output market.json
//!
//! # Macro-adjusted expected returns
//! ballast predict --vix 28 --yield-spread -0.3 --sentiment crypto=0.2
//!
//! # Show the asset universe and its bounds at tolerance 8
//! ballast assets --risk-tolerance 8
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands};
use config::BallastConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = BallastConfig::load(cli.config.as_deref())?;
    let format = cli.format;

    match cli.command {
        Commands::Optimize(args) => commands::optimize::execute(args, &config, format)?,
        Commands::MinVolatility(args) => commands::min_volatility::execute(args, &config, format)?,
        Commands::Estimate(args) => commands::estimate::execute(args, format)?,
        Commands::Predict(args) => commands::predict::execute(args, &config, format)?,
        Commands::Assets(args) => commands::assets::execute(args, &config, format)?,
    }

    Ok(())
}

/// Installs the log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "warn,ballast=debug,ballast_portfolio=debug,ballast_math=debug",
        _ => "warn,ballast=trace,ballast_portfolio=trace,ballast_math=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
