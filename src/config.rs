//! Configuration Module
//!
//! This module defines the configuration of the offline verifier.
//! Configuration is loaded from TOML files and parsed using serde.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [logging]
/// filter = "towerledger=info"
/// ansi = true
///
/// [verifier]
/// inbox = "transactions"
/// stop_on_first_rejection = false
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub verifier: VerifierConfig,
}

/// Logging configuration
///
/// - `filter`: default tracing directive, overridden by `RUST_LOG`
/// - `ansi`: colourise log output
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            ansi: false,
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

/// Verifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VerifierConfig {
    /// Directory scanned for `*.json` transactions when none are named on the command line
    pub inbox: PathBuf,
    #[serde(default)]
    pub stop_on_first_rejection: bool,
}

impl VerifierConfig {
    /// Transaction files in the inbox, sorted by name
    pub fn inbox_transactions(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.inbox)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
