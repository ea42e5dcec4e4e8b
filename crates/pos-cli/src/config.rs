use std::fs;
use std::path::{Path, PathBuf};

use pos_store::StoreConfig;
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, Result};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "pos.toml";
pub(crate) const DATABASE_ENV: &str = "POS_DATABASE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ShopConfig {
    pub name: String,
    pub currency: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: String::from("Point of Sale"),
            currency: String::from("LKR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LoyaltyConfig {
    /// Points earned per whole currency unit of an order total.
    pub points_per_unit: u32,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self { points_per_unit: 1 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    pub database: StoreConfig,
    pub shop: ShopConfig,
    pub loyalty: LoyaltyConfig,
}

impl AppConfig {
    /// Loads `explicit`, or `pos.toml` in `dir` when no path is given.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub(crate) fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (dir.join(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(CliError::ConfigMissing(path));
            }
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| CliError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&content, &path)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| CliError::ConfigParse {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Replaces the database path when an override is present.
    #[must_use]
    pub(crate) fn with_database_override(mut self, path: Option<String>) -> Self {
        if let Some(path) = path.filter(|p| !p.trim().is_empty()) {
            self.database.path = path;
        }
        self
    }
}
