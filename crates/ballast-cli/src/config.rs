//! `ballast.toml` configuration.
//!
//! ```toml
//! [optimizer]
//! max_iterations = 300
//! tolerance = 1e-8
//!
//! [optimizer.bounds.moderate]
//! lower = { fixed = 0.05 }
//! upper = { fixed = 0.5 }
//!
//! [[assets]]
//! name = "stocks"
//! risk = 0.8
//! min_conservative = 0.2
//! max_aggressive = 0.8
//!
//! [market]
//! assets = ["stocks", "bonds"]
//! expected_returns = [0.10, 0.05]
//! covariance = [[0.04, 0.02], [0.02, 0.02]]
//! ```
//!
//! Every section is optional; missing sections fall back to the standard
//! five-class universe, its baseline market figures and default solver
//! settings.

use std::path::{Path, PathBuf};

use ballast_portfolio::{AssetUniverse, MarketEstimates, OptimizerConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "ballast.toml";

/// Top-level CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallastConfig {
    /// Solver and bound settings.
    pub optimizer: OptimizerConfig,

    /// Asset classes and their bound attributes.
    pub assets: AssetUniverse,

    /// Baseline expected returns and covariance.
    pub market: MarketEstimates,
}

impl Default for BallastConfig {
    fn default() -> Self {
        Self {
            optimizer: OptimizerConfig::default(),
            assets: AssetUniverse::standard(),
            market: MarketEstimates::standard(),
        }
    }
}

impl BallastConfig {
    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, `./ballast.toml` is used if
    /// present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads configuration from a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml(&content).map_err(|reason| CliError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| e.message().to_string())?;
        config.optimizer.validate().map_err(|e| e.to_string())?;
        config
            .market
            .validate(config.optimizer.covariance_tolerance)
            .map_err(|e| format!("[market] {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballast_portfolio::BoundSource;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = BallastConfig::from_toml("").unwrap();
        assert_eq!(config.optimizer, OptimizerConfig::default());
        assert_eq!(config.assets, AssetUniverse::standard());
        assert_eq!(config.market, MarketEstimates::standard());
    }

    #[test]
    fn test_partial_sections() {
        let config = BallastConfig::from_toml(
            r#"
            [optimizer]
            max_iterations = 300

            [optimizer.bounds.moderate]
            lower = { fixed = 0.05 }
            upper = { fixed = 0.5 }

            [[assets]]
            name = "stocks"
            risk = 0.8
            min_conservative = 0.4
            max_aggressive = 1.0

            [[assets]]
            name = "bonds"
            risk = 0.3
            min_conservative = 0.6
            max_aggressive = 0.5

            [market]
            assets = ["stocks", "bonds"]
            expected_returns = [0.10, 0.05]
            covariance = [[0.04, 0.02], [0.02, 0.02]]
            "#,
        )
        .unwrap();

        assert_eq!(config.optimizer.max_iterations, 300);
        assert!((config.optimizer.tolerance - 1e-8).abs() < f64::EPSILON);
        assert_eq!(config.optimizer.bounds.moderate.lower, BoundSource::Fixed(0.05));
        assert_eq!(config.optimizer.bounds.conservative_max, 3);
        assert_eq!(config.assets.names(), vec!["stocks", "bonds"]);
        assert_eq!(config.market.len(), 2);
    }

    #[test]
    fn test_invalid_universe_rejected() {
        let err = BallastConfig::from_toml(
            r#"
            [[assets]]
            name = "stocks"
            risk = 1.5
            min_conservative = 0.2
            max_aggressive = 0.8
            "#,
        )
        .unwrap_err();
        assert!(err.contains("risk"));
    }

    #[test]
    fn test_invalid_optimizer_rejected() {
        let err = BallastConfig::from_toml("[optimizer]\nmax_iterations = 0\n").unwrap_err();
        assert!(err.contains("max_iterations"));
    }

    #[test]
    fn test_invalid_market_rejected_at_load() {
        let err = BallastConfig::from_toml(
            r#"
            [market]
            assets = ["stocks", "bonds"]
            expected_returns = [0.10, 0.05]
            covariance = [[0.04, 0.03], [0.01, 0.02]]
            "#,
        )
        .unwrap_err();
        assert!(err.starts_with("[market]"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = BallastConfig::load(Some(Path::new("/nonexistent/ballast.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }
}
