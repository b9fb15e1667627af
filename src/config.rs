//! Configuration file handling.
//!
//! This module provides loading and saving of pkgident configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/pkgident/config.toml`
//! - macOS: `~/Library/Application Support/pkgident/config.toml`
//! - Windows: `%APPDATA%\pkgident\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! enabled_parsers = ["conan", "hex", "rpm"]
//! default_format = "table"
//! parallel = true
//! rpm_command = "rpm"
//! vendor_suffixes = [", Inc.", ", Inc", ", LLC", ", Ltd."]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::identity::DEFAULT_VENDOR_SUFFIXES;
use crate::model::Ecosystem;

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use pkgident::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Parallel scanning: {}", config.parallel);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which parsers run when no `--parser` flag is provided.
    ///
    /// Default: all parsers
    pub enabled_parsers: Vec<Ecosystem>,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json", "cyclonedx"
    /// Default: "table"
    pub default_format: String,

    /// Whether scanners run concurrently.
    ///
    /// Default: true
    pub parallel: bool,

    /// Program used to query RPM databases.
    ///
    /// Default: "rpm"
    pub rpm_command: String,

    /// Corporate suffixes stripped from vendor names before building CPEs.
    ///
    /// Suffixes without any punctuation or whitespace are ignored.
    pub vendor_suffixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled_parsers: Ecosystem::ALL.to_vec(),
            default_format: "table".to_string(),
            parallel: true,
            rpm_command: "rpm".to_string(),
            vendor_suffixes: DEFAULT_VENDOR_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pkgident")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    pub fn is_enabled(&self, ecosystem: Ecosystem) -> bool {
        self.enabled_parsers.contains(&ecosystem)
    }
}
