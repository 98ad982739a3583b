//! End-to-end tests for the `ballast` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ballast() -> Command {
    let mut cmd = Command::cargo_bin("ballast").unwrap();
    cmd.env_remove("BALLAST_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_optimize_table() {
    ballast()
        .args(["optimize", "--budget", "10000", "--risk-tolerance", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stocks"))
        .stdout(predicate::str::contains("crypto"))
        .stdout(predicate::str::contains("Conservative"))
        .stdout(predicate::str::contains("10000"));
}

#[test]
fn test_optimize_json() {
    let output = ballast()
        .args(["--format", "json", "optimize", "-b", "10000", "-t", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["regime"], "conservative");
    let weights = json["weights"].as_array().unwrap();
    assert_eq!(weights.len(), 5);
    let sum: f64 = weights.iter().map(|w| w["weight"].as_f64().unwrap()).sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[test]
fn test_optimize_csv() {
    ballast()
        .args(["-f", "csv", "optimize", "-b", "500", "-t", "9"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("asset,weight,amount"));
}

#[test]
fn test_invalid_risk_tolerance_fails() {
    ballast()
        .args(["optimize", "--budget", "1000", "--risk-tolerance", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("risk tolerance"));
}

#[test]
fn test_zero_budget_fails() {
    ballast()
        .args(["optimize", "--budget", "0", "--risk-tolerance", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("budget"));
}

#[test]
fn test_iteration_limit_fails() {
    ballast()
        .args(["optimize", "-b", "1000", "-t", "2", "--max-iterations", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not converge"));
}

#[test]
fn test_min_volatility() {
    ballast()
        .args(["min-volatility", "--budget", "10000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cash"))
        .stdout(predicate::str::contains("Volatility"));
}

#[test]
fn test_market_file() {
    let dir = TempDir::new().unwrap();
    let market = dir.path().join("market.json");
    fs::write(
        &market,
        r#"{
            "assets": ["stocks", "bonds"],
            "expected_returns": [0.10, 0.05],
            "covariance": [[0.04, 0.01], [0.01, 0.02]]
        }"#,
    )
    .unwrap();

    let output = ballast()
        .args(["-f", "json", "optimize", "-b", "100", "-t", "5", "--market"])
        .arg(&market)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["weights"].as_array().unwrap().len(), 2);
}

#[test]
fn test_market_dimension_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    let market = dir.path().join("market.json");
    fs::write(
        &market,
        r#"{
            "assets": ["stocks", "bonds", "cash", "crypto"],
            "expected_returns": [0.10, 0.05, 0.02, 0.40],
            "covariance": [[0.04, 0, 0], [0, 0.02, 0], [0, 0, 0.001]]
        }"#,
    )
    .unwrap();

    ballast()
        .args(["optimize", "-b", "100", "-t", "5", "--market"])
        .arg(&market)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dimension mismatch"));
}

#[test]
fn test_estimate_writes_market_file() {
    let dir = TempDir::new().unwrap();
    let prices = dir.path().join("prices.csv");
    let market = dir.path().join("market.json");
    fs::write(
        &prices,
        "date,stocks,bonds,cash\n\
         2024-01-02,100.0,50.0,10.000\n\
         2024-01-03,101.5,50.1,10.001\n\
         2024-01-04,100.8,50.3,10.002\n\
         2024-01-05,102.2,50.2,10.003\n\
         2024-01-08,103.0,50.4,10.004\n",
    )
    .unwrap();

    ballast()
        .args(["estimate", "--prices"])
        .arg(&prices)
        .arg("--output")
        .arg(&market)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&market).unwrap()).unwrap();
    assert_eq!(json["assets"], serde_json::json!(["stocks", "bonds", "cash"]));
    assert_eq!(json["covariance"].as_array().unwrap().len(), 3);

    // The estimated file feeds straight back into the optimizer
    ballast()
        .args(["optimize", "-b", "1000", "-t", "6", "--market"])
        .arg(&market)
        .assert()
        .success();
}

#[test]
fn test_estimate_short_history_fails() {
    let dir = TempDir::new().unwrap();
    let prices = dir.path().join("prices.csv");
    fs::write(&prices, "date,stocks\n2024-01-02,100\n2024-01-03,101\n").unwrap();

    ballast()
        .args(["estimate", "--prices"])
        .arg(&prices)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient history"));
}

#[test]
fn test_predict() {
    let output = ballast()
        .args([
            "-f",
            "json",
            "predict",
            "--vix",
            "15",
            "--yield-spread",
            "1.0",
            "--sentiment",
            "stocks=0.6",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let stocks = &rows[0];
    assert_eq!(stocks["asset"], "stocks");
    let expected = 0.10 * (1.0 + 0.4 * 0.5 + 0.3 * 0.5 + 0.3 * 0.6);
    assert!((stocks["predicted"].as_f64().unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_predict_standard_sentiment() {
    let output = ballast()
        .args(["-f", "json", "predict", "--standard-sentiment", "--sentiment", "cash=0.5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let score = |i: usize| rows[i]["sentiment"].as_f64().unwrap();
    assert_eq!(rows[4]["asset"], "crypto");
    assert!((score(0) - 0.6).abs() < 1e-12);
    assert!((score(3) - 0.5).abs() < 1e-12);
    assert!((score(4) - 0.2).abs() < 1e-12);
}

#[test]
fn test_predict_unknown_asset_fails() {
    ballast()
        .args(["predict", "--sentiment", "gold=0.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gold"));
}

#[test]
fn test_assets_with_bounds() {
    ballast()
        .args(["assets", "--risk-tolerance", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Aggressive"))
        .stdout(predicate::str::contains("commodities"));
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ballast.toml");
    fs::write(
        &config,
        r#"
        [optimizer.bounds.moderate]
        lower = { fixed = 0.0 }
        upper = { fixed = 0.25 }
        "#,
    )
    .unwrap();

    let output = ballast()
        .arg("--config")
        .arg(&config)
        .args(["-f", "json", "optimize", "-b", "1000", "-t", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for w in json["weights"].as_array().unwrap() {
        assert!(w["weight"].as_f64().unwrap() <= 0.25 + 1e-9);
    }
}

#[test]
fn test_missing_config_fails() {
    ballast()
        .args(["--config", "/nonexistent/ballast.toml", "assets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_invalid_market_config_fails_before_command() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ballast.toml");
    fs::write(
        &config,
        r#"
        [market]
        assets = ["stocks", "bonds"]
        expected_returns = [0.10, 0.05]
        covariance = [[0.04, -0.5], [-0.5, 0.02]]
        "#,
    )
    .unwrap();

    // `assets` never reads the market section; the file is still rejected
    ballast()
        .arg("--config")
        .arg(&config)
        .arg("assets")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("[market]"));
}
