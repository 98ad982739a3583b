//! Asset classes and the asset universe.

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, AllocationResult};

/// A broad asset class with its static allocation attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClass {
    /// Identifier, e.g. `"stocks"`.
    pub name: String,

    /// Baseline risk score in [0, 1].
    pub risk: f64,

    /// Minimum weight under the conservative regime.
    pub min_conservative: f64,

    /// Maximum weight under the aggressive regime.
    pub max_aggressive: f64,
}

impl AssetClass {
    /// Creates an asset class.
    #[must_use]
    pub fn new(name: impl Into<String>, risk: f64, min_conservative: f64, max_aggressive: f64) -> Self {
        Self {
            name: name.into(),
            risk,
            min_conservative,
            max_aggressive,
        }
    }

    fn validate(&self) -> AllocationResult<()> {
        if self.name.trim().is_empty() {
            return Err(AllocationError::invalid_input("Asset class name is empty"));
        }
        for (field, value) in [
            ("risk", self.risk),
            ("min_conservative", self.min_conservative),
            ("max_aggressive", self.max_aggressive),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(AllocationError::invalid_input(format!(
                    "Asset '{}': {} must be in [0, 1], got {}",
                    self.name, field, value
                )));
            }
        }
        Ok(())
    }
}

/// An ordered, uniquely named set of asset classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AssetClass>", into = "Vec<AssetClass>")]
pub struct AssetUniverse {
    assets: Vec<AssetClass>,
}

impl AssetUniverse {
    /// Creates a universe, rejecting empty lists, duplicate names and
    /// attributes outside [0, 1].
    pub fn new(assets: Vec<AssetClass>) -> AllocationResult<Self> {
        if assets.is_empty() {
            return Err(AllocationError::invalid_input("Asset universe is empty"));
        }
        for (i, asset) in assets.iter().enumerate() {
            asset.validate()?;
            if assets[..i].iter().any(|a| a.name == asset.name) {
                return Err(AllocationError::invalid_input(format!(
                    "Duplicate asset class '{}'",
                    asset.name
                )));
            }
        }
        Ok(Self { assets })
    }

    /// The five-class table: stocks, bonds, commodities, cash, crypto.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            assets: vec![
                AssetClass::new("stocks", 0.8, 0.2, 0.8),
                AssetClass::new("bonds", 0.4, 0.3, 0.2),
                AssetClass::new("commodities", 0.7, 0.1, 0.2),
                AssetClass::new("cash", 0.1, 0.2, 0.0),
                AssetClass::new("crypto", 0.9, 0.0, 0.6),
            ],
        }
    }

    /// Looks up an asset class by name.
    pub fn get(&self, name: &str) -> Option<&AssetClass> {
        self.assets.iter().find(|a| a.name == name)
    }

    /// Looks up an asset class by name, failing for unknown names.
    pub fn require(&self, name: &str) -> AllocationResult<&AssetClass> {
        self.get(name)
            .ok_or_else(|| AllocationError::unknown_asset(name))
    }

    /// Asset names in universe order.
    pub fn names(&self) -> Vec<&str> {
        self.assets.iter().map(|a| a.name.as_str()).collect()
    }

    /// Iterates the asset classes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, AssetClass> {
        self.assets.iter()
    }

    /// Number of asset classes.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Always false for a constructed universe.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for AssetUniverse {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<AssetClass>> for AssetUniverse {
    type Error = AllocationError;

    fn try_from(assets: Vec<AssetClass>) -> Result<Self, Self::Error> {
        Self::new(assets)
    }
}

impl From<AssetUniverse> for Vec<AssetClass> {
    fn from(universe: AssetUniverse) -> Self {
        universe.assets
    }
}

impl<'a> IntoIterator for &'a AssetUniverse {
    type Item = &'a AssetClass;
    type IntoIter = std::slice::Iter<'a, AssetClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}
