//! Configuration file support for nightsplit.
//!
//! Loads `nightsplit.toml` from the input folder, falling back to the user
//! config directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings loaded from `nightsplit.toml`. Command-line flags take priority.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Output folder for the night CSV files
    pub output: Option<PathBuf>,
    /// Input file glob
    pub filter: Option<String>,
    /// Output file name prefix
    pub prefix: Option<String>,
    /// Time shift in seconds
    pub shift: Option<i64>,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "nightsplit.toml";

impl ProjectConfig {
    /// Load configuration from a directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Config from the input folder, else from `<config dir>/nightsplit/`.
    pub fn discover(input_dir: &Path) -> Result<Self> {
        if let Some(config) = Self::load(input_dir)? {
            return Ok(config);
        }

        match dirs::config_dir() {
            Some(dir) => Ok(Self::load(&dir.join("nightsplit"))?.unwrap_or_default()),
            None => Ok(Self::default()),
        }
    }
}
