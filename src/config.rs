//! Configuration file handling for ~/.config/graze/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`. Unlike most settings files it is also written back:
//! `register` and `login` persist the active user. Writes go through a temp
//! file and an atomic rename so a crash mid-write never leaves a truncated
//! config behind.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("HOME environment variable not set")]
    NoHome,
}

// ============================================================================
// Configuration
// ============================================================================

/// Application configuration.
///
/// Both fields use `#[serde(default)]` so any subset of keys can be present;
/// unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file location. Defaults to `graze.db` in the config dir.
    pub db_path: Option<PathBuf>,

    /// The user that commands act on behalf of. Set by `register`/`login`.
    pub current_user: Option<String>,
}

/// The config directory path (~/.config/graze/).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(home).join(".config").join("graze"))
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "config file is empty, using defaults");
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Persist the configuration, atomically: write a temp file next to the
    /// destination, sync it, then rename over the old file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = std::fs::File::create(&temp_path)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.sync_all()?;
        drop(temp_file);

        std::fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Record `name` as the active user and persist the change.
    pub fn set_user(&mut self, name: &str, path: &Path) -> Result<(), ConfigError> {
        self.current_user = Some(name.to_string());
        self.save(path)
    }

    /// Resolve the database file location relative to the config directory.
    pub fn database_path(&self, dir: &Path) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| dir.join("graze.db"))
    }
}

// ============================================================================
// Tests
// ============================================================================
