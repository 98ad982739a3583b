//! Core types for portfolio allocation.

mod asset;
mod config;
mod policy;
mod risk;

pub use asset::{AssetClass, AssetUniverse};
pub use config::OptimizerConfig;
pub use policy::{BoundPolicy, BoundRule, BoundSource};
pub use risk::{Regime, RiskTolerance};
