//! Estimate command implementation.
//!
//! Reads a price history CSV and produces market estimates:
//!
//! ```text
//! date,stocks,bonds,cash
//! 2024-01-02,100.0,50.0,10.00
//! 2024-01-03,101.2,50.1,10.01
//! ```
//!
//! The first column is a label and is ignored; every other column is one
//! asset's price series, named by its header.

use std::path::{Path, PathBuf};

use anyhow::Result;
use ballast_portfolio::{
    HistoricalEstimator, MarketDataSource, MarketEstimates, PriceHistory, TRADING_DAYS_PER_YEAR,
};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};
use crate::output::{format_percent, print_json, print_rows, print_success};

/// Arguments for the estimate command.
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Price history CSV: a date column followed by one column per asset
    #[arg(short, long)]
    pub prices: PathBuf,

    /// Price observations per year (252 daily, 52 weekly, 12 monthly)
    #[arg(long, default_value_t = TRADING_DAYS_PER_YEAR)]
    pub periods_per_year: f64,

    /// Write the estimates as JSON to this file instead of printing them
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Estimated statistics of one asset.
#[derive(Debug, Serialize, Tabled)]
pub struct EstimateRow {
    #[tabled(rename = "Asset")]
    pub asset: String,
    #[tabled(rename = "Expected Return")]
    pub expected_return: String,
    #[tabled(rename = "Volatility")]
    pub volatility: String,
}

/// Execute the estimate command.
pub fn execute(args: EstimateArgs, format: OutputFormat) -> Result<()> {
    let history = read_prices(&args.prices)?;
    let estimates = HistoricalEstimator::new(history)
        .with_periods_per_year(args.periods_per_year)
        .estimates()?;

    if let Some(output) = &args.output {
        std::fs::write(output, serde_json::to_string_pretty(&estimates)?)?;
        print_success(&format!(
            "Wrote estimates for {} assets to {}",
            estimates.len(),
            output.display()
        ));
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_json(&estimates),
        _ => print_rows(&rows(&estimates), format),
    }
}

fn rows(estimates: &MarketEstimates) -> Vec<EstimateRow> {
    estimates
        .assets
        .iter()
        .enumerate()
        .map(|(i, asset)| EstimateRow {
            asset: asset.clone(),
            expected_return: format_percent(estimates.expected_returns[i]),
            volatility: format_percent(estimates.covariance[i][i].max(0.0).sqrt()),
        })
        .collect()
}

/// Reads a price history CSV.
pub fn read_prices(path: &Path) -> CliResult<PriceHistory> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| CliError::input_file(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| CliError::input_file(path, e))?
        .clone();
    if headers.len() < 2 {
        return Err(CliError::input_file(
            path,
            "expected a date column followed by at least one asset column",
        ));
    }
    let assets: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut series: Vec<Vec<f64>> = vec![Vec::new(); assets.len()];
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CliError::input_file(path, e))?;
        for (column, field) in record.iter().skip(1).enumerate() {
            let price: f64 = field.trim().parse().map_err(|_| {
                CliError::input_file(
                    path,
                    format!(
                        "row {}: '{}' is not a price for '{}'",
                        line + 2,
                        field,
                        assets[column]
                    ),
                )
            })?;
            series[column].push(price);
        }
    }
    debug!(
        "read {} rows for {} assets from {}",
        series.first().map_or(0, Vec::len),
        assets.len(),
        path.display()
    );

    let mut history = PriceHistory::new();
    for (asset, prices) in assets.into_iter().zip(series) {
        history
            .push(asset, prices)
            .map_err(|e| CliError::input_file(path, e))?;
    }
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_prices() {
        let file = write_csv("date,stocks,bonds\n2024-01-01,100,50\n2024-01-02,110,50.5\n");
        let history = read_prices(file.path()).unwrap();

        assert_eq!(history.assets(), ["stocks".to_string(), "bonds".to_string()]);
        assert_eq!(history.series("stocks"), Some(&[100.0, 110.0][..]));
        assert_eq!(history.series("bonds"), Some(&[50.0, 50.5][..]));
    }

    #[test]
    fn test_bad_price_names_row_and_asset() {
        let file = write_csv("date,stocks\n2024-01-01,100\n2024-01-02,n/a\n");
        let err = read_prices(file.path()).unwrap_err().to_string();
        assert!(err.contains("row 3"));
        assert!(err.contains("stocks"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let file = write_csv("date,stocks,bonds\n2024-01-01,100\n");
        assert!(read_prices(file.path()).is_err());
    }

    #[test]
    fn test_missing_asset_columns() {
        let file = write_csv("date\n2024-01-01\n");
        assert!(read_prices(file.path()).is_err());
    }
}
