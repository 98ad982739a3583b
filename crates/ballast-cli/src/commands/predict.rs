//! Predict command implementation.
//!
//! Applies macro indicators and per-asset sentiment to the configured
//! baseline returns.

use anyhow::Result;
use ballast_portfolio::{MacroAdjustedReturns, MacroIndicators, MarketDataSource};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::config::BallastConfig;
use crate::output::{format_percent, print_header, print_json, print_rows, KeyValue};

/// Arguments for the predict command.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// CBOE volatility index level
    #[arg(long, default_value_t = MacroIndicators::default().vix)]
    pub vix: f64,

    /// 10y minus 2y treasury yield spread, in percentage points
    #[arg(long, default_value_t = MacroIndicators::default().yield_spread, allow_negative_numbers = true)]
    pub yield_spread: f64,

    /// Sentiment score per asset as ASSET=SCORE (repeatable)
    #[arg(short, long, value_parser = parse_sentiment)]
    pub sentiment: Vec<(String, f64)>,

    /// Start from the fixed per-class sentiment table instead of neutral scores
    #[arg(long)]
    pub standard_sentiment: bool,
}

/// Adjusted return of one asset.
#[derive(Debug, Serialize, Tabled)]
pub struct PredictionRow {
    #[tabled(rename = "Asset")]
    pub asset: String,
    #[tabled(rename = "Baseline")]
    pub baseline: f64,
    #[tabled(rename = "Sentiment")]
    pub sentiment: f64,
    #[tabled(rename = "Adjustment")]
    pub adjustment: f64,
    #[tabled(rename = "Predicted")]
    pub predicted: f64,
}

/// Execute the predict command.
pub fn execute(args: PredictArgs, config: &BallastConfig, format: OutputFormat) -> Result<()> {
    let indicators = MacroIndicators::new(args.vix, args.yield_spread);
    let mut source = MacroAdjustedReturns::new(config.market.clone()).with_indicators(indicators);
    if args.standard_sentiment {
        source = source.with_standard_sentiment();
    }
    let source = args
        .sentiment
        .into_iter()
        .fold(source, |source, (asset, score)| source.with_sentiment(asset, score));

    let predicted = source.estimates()?;
    let rows: Vec<PredictionRow> = predicted
        .assets
        .iter()
        .zip(&predicted.expected_returns)
        .zip(&config.market.expected_returns)
        .map(|((asset, predicted), baseline)| PredictionRow {
            asset: asset.clone(),
            baseline: *baseline,
            sentiment: source.sentiment(asset),
            adjustment: source.adjustment(asset),
            predicted: *predicted,
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => print_rows(&rows, format),
        OutputFormat::Table => {
            print_header("Macro Indicators");
            let summary = vec![
                KeyValue::new("VIX", format!("{:.2}", indicators.vix)),
                KeyValue::new("Yield Spread", format!("{:.2}", indicators.yield_spread)),
                KeyValue::new("VIX Factor", format!("{:+.4}", indicators.vix_factor())),
                KeyValue::new("Spread Factor", format!("{:+.4}", indicators.spread_factor())),
            ];
            print_rows(&summary, format)?;

            print_header("Predicted Returns");
            let display: Vec<DisplayRow> = rows.iter().map(DisplayRow::from).collect();
            print_rows(&display, format)
        }
    }
}

#[derive(Serialize, Tabled)]
struct DisplayRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Baseline")]
    baseline: String,
    #[tabled(rename = "Sentiment")]
    sentiment: String,
    #[tabled(rename = "Adjustment")]
    adjustment: String,
    #[tabled(rename = "Predicted")]
    predicted: String,
}

impl From<&PredictionRow> for DisplayRow {
    fn from(row: &PredictionRow) -> Self {
        Self {
            asset: row.asset.clone(),
            baseline: format_percent(row.baseline),
            sentiment: format!("{:.2}", row.sentiment),
            adjustment: format!("{:+.4}", row.adjustment),
            predicted: format_percent(row.predicted),
        }
    }
}

/// Parses `ASSET=SCORE`.
fn parse_sentiment(s: &str) -> Result<(String, f64), String> {
    let (asset, score) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ASSET=SCORE, got '{}'", s))?;
    let asset = asset.trim();
    if asset.is_empty() {
        return Err(format!("missing asset name in '{}'", s));
    }
    let score: f64 = score
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", score.trim()))?;
    Ok((asset.to_string(), score))
}
