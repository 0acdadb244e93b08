//! Configuration file handling.
//!
//! This module provides loading and saving of vulnmap configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/vulnmap/config.toml`
//! - macOS: `~/Library/Application Support/vulnmap/config.toml`
//! - Windows: `%APPDATA%\vulnmap\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! default_format = "table"
//!
//! [discovery]
//! extension = "go"
//! exclude_dirs = ["vendor", "testdata"]
//! follow_symlinks = false
//!
//! [advisories]
//! dir = "/srv/vulndb"
//! suffixes = ["*.yaml", "*.yml"]
//! ignore = ["GO-2021-0001", "CVE-2020-*"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::advisory::{DirectorySource, DEFAULT_SUFFIXES};
use crate::discovery::{compile_exclusions, TreeDiscoverer};

/// Application configuration.
///
/// Every field has a default, so a partial file (or no file at all) is
/// valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: String,

    /// Source tree discovery settings.
    pub discovery: DiscoveryConfig,

    /// Advisory database settings.
    pub advisories: AdvisoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Extension of the source files to collect.
    ///
    /// Default: "go"
    pub extension: String,

    /// Directory names (or multi-segment fragments like `internal/gen`)
    /// skipped during discovery.
    pub exclude_dirs: Vec<String>,

    /// Whether symbolic links are followed while walking.
    ///
    /// Default: false
    pub follow_symlinks: bool,

    /// Maximum walk depth below the root. Unlimited when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extension: "go".to_string(),
            exclude_dirs: vec!["vendor".to_string(), "testdata".to_string()],
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

impl DiscoveryConfig {
    /// Builds a discoverer carrying these settings.
    pub fn discoverer(&self) -> TreeDiscoverer {
        let mut discoverer = TreeDiscoverer::new(&self.extension)
            .with_exclusions(compile_exclusions(&self.exclude_dirs))
            .with_follow_symlinks(self.follow_symlinks);

        if let Some(depth) = self.max_depth {
            discoverer = discoverer.with_max_depth(depth);
        }

        discoverer
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Directory holding one advisory file per vulnerability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// File name globs identifying advisory files.
    pub suffixes: Vec<String>,

    /// Advisory identifiers left out of reports.
    ///
    /// Supports `*` wildcards (e.g., "CVE-2020-*").
    pub ignore: Vec<String>,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            dir: None,
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            ignore: Vec::new(),
        }
    }
}

impl AdvisoryConfig {
    /// Check if an advisory should be left out of reports.
    pub fn should_ignore(&self, identifier: &str) -> bool {
        self.ignore.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, identifier)
            } else {
                pattern == identifier
            }
        })
    }

    /// Returns the advisory source for `dir`, using the configured suffixes.
    pub fn source(&self, dir: &Path) -> DirectorySource {
        DirectorySource::new(dir).with_suffixes(self.suffixes.clone())
    }
}

/// Simple glob matching (supports * as wildcard).
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    // Check prefix (before first *)
    if !parts[0].is_empty() {
        if !remaining.starts_with(parts[0]) {
            return false;
        }
        remaining = &remaining[parts[0].len()..];
    }

    // Check suffix (after last *)
    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        if !remaining.ends_with(last_part) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last_part.len()];
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: "table".to_string(),
            discovery: DiscoveryConfig::default(),
            advisories: AdvisoryConfig::default(),
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

        Self::load_from(&path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use vulnmap::Config;
    ///
    /// let path = Config::config_path();
    /// assert!(path.ends_with("vulnmap/config.toml"));
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vulnmap")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
