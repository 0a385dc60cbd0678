//! Snapshot configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/snapfile/config.toml)
//! 3. Environment variables (SNAPFILE_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::fs::{CachedFs, OsFs, SharedFs};

/// Environment variable prefix
const ENV_PREFIX: &str = "SNAPFILE";

/// Snapshot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory that relative snapshot names resolve against
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,

    /// Extension for single-file snapshots
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Extension for suite documents
    #[serde(default = "default_suite_extension")]
    pub suite_extension: String,

    /// Seconds a file read stays cached (0 disables the cache)
    #[serde(default = "default_read_cache_ttl_secs")]
    pub read_cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            extension: default_extension(),
            suite_extension: default_suite_extension(),
            read_cache_ttl_secs: default_read_cache_ttl_secs(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SNAPFILE_DIR, SNAPFILE_READ_CACHE_TTL)
    /// 2. Config file (~/.config/snapfile/config.toml or SNAPFILE_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, using `path` instead of the default config file if given
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // SNAPFILE_DIR
        if let Ok(val) = std::env::var(format!("{}_DIR", ENV_PREFIX)) {
            if !val.is_empty() {
                self.snapshot_dir = PathBuf::from(val);
            }
        }

        // SNAPFILE_READ_CACHE_TTL
        if let Ok(val) = std::env::var(format!("{}_READ_CACHE_TTL", ENV_PREFIX)) {
            self.read_cache_ttl_secs = val
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}_READ_CACHE_TTL: {:?}", ENV_PREFIX, val))?;
        }

        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SNAPFILE_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("snapfile")
            .join("config.toml")
    }

    /// Path of the single-file snapshot `name`
    pub fn single_path(&self, name: &str) -> PathBuf {
        self.snapshot_dir
            .join(format!("{}.{}", name, self.extension))
    }

    /// Path of the suite document `suite`
    pub fn suite_path(&self, suite: &str) -> PathBuf {
        self.snapshot_dir
            .join(format!("{}.{}", suite, self.suite_extension))
    }

    /// Read cache lifetime, `None` when caching is disabled
    pub fn read_cache_ttl(&self) -> Option<Duration> {
        match self.read_cache_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Build the filesystem stores should share for the life of the process
    pub fn filesystem(&self) -> SharedFs {
        match self.read_cache_ttl() {
            Some(ttl) => Arc::new(CachedFs::new(OsFs, ttl)),
            None => Arc::new(OsFs),
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("testdata").join("snapshots")
}

fn default_extension() -> String {
    "snap".to_string()
}

fn default_suite_extension() -> String {
    "toml".to_string()
}

fn default_read_cache_ttl_secs() -> u64 {
    60
}
