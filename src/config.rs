//! Upgrade configuration
//!
//! ```toml
//! db_path = "/var/lib/node/state.sled"
//! tree = "gov"
//! module = "gov"
//! from_version = 1
//! to_version = 2
//! dry_run = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MigrationError;
use crate::legacy::LEGACY_VERSION;

/// Schema version written by this crate
pub const CURRENT_VERSION: u64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpgradeConfig {
    /// Path of the sled database holding module state
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// sled tree holding the module's keys
    #[serde(default = "default_tree")]
    pub tree: String,

    /// Module name, also the parameter namespace name
    #[serde(default = "default_module")]
    pub module: String,

    /// Version the store must be at before the upgrade
    #[serde(default = "default_from_version")]
    pub from_version: u64,

    /// Version recorded after the upgrade
    #[serde(default = "default_to_version")]
    pub to_version: u64,

    /// Compute the upgrade but do not commit it
    #[serde(default)]
    pub dry_run: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/state.sled")
}

fn default_tree() -> String {
    "gov".to_string()
}

fn default_module() -> String {
    "gov".to_string()
}

fn default_from_version() -> u64 {
    LEGACY_VERSION
}

fn default_to_version() -> u64 {
    CURRENT_VERSION
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            tree: default_tree(),
            module: default_module(),
            from_version: default_from_version(),
            to_version: default_to_version(),
            dry_run: false,
        }
    }
}

impl UpgradeConfig {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MigrationError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| MigrationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MigrationError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| MigrationError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), MigrationError> {
        if self.module.is_empty() {
            return Err(MigrationError::Config("module name must not be empty".to_string()));
        }
        check_versions(self.from_version, self.to_version)
    }
}

/// Only the legacy-to-current transform exists; any other pair is refused
pub fn check_versions(from_version: u64, to_version: u64) -> Result<(), MigrationError> {
    if from_version != LEGACY_VERSION || to_version != CURRENT_VERSION {
        return Err(MigrationError::Config(format!(
            "unsupported upgrade {} -> {}, only {} -> {} is available",
            from_version, to_version, LEGACY_VERSION, CURRENT_VERSION
        )));
    }
    Ok(())
}
