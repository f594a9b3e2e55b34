use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub journal: JournalConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    #[serde(default = "default_journal_enabled")]
    pub enabled: bool,
    /// Events kept before the oldest are dropped
    #[serde(default = "default_journal_capacity")]
    pub capacity: usize,
}

fn default_journal_enabled() -> bool {
    true
}

fn default_journal_capacity() -> usize {
    4096
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: default_journal_enabled(),
            capacity: default_journal_capacity(),
        }
    }
}

impl LedgerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Read `path`, or write the defaults there when it does not exist.
    /// A file that fails to parse falls back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match Self::load(path) {
                Ok(c) => {
                    tracing::info!("Config loaded from {}", path.display());
                    c
                }
                Err(e) => {
                    tracing::warn!("Error loading config: {}. Using defaults.", e);
                    Self::default()
                }
            }
        } else {
            tracing::info!(
                "Config file not found at '{}'. Creating default.",
                path.display()
            );
            let config = Self::default();
            match config.to_toml_string() {
                Ok(s) => {
                    if let Err(e) = std::fs::write(path, s) {
                        tracing::warn!("Could not write default config: {}", e);
                    }
                }
                Err(e) => tracing::warn!("Could not render default config: {}", e),
            }
            config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = LedgerConfig::from_toml_str("[journal]\ncapacity = 8\n").unwrap();
        assert_eq!(config.journal.capacity, 8);
        assert!(config.journal.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(matches!(
            LedgerConfig::from_toml_str("[journal]\ncapacity = \"many\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_default_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");

        let config = LedgerConfig::load_or_default(&path);
        assert_eq!(config, LedgerConfig::default());
        assert!(path.exists());

        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
        let reloaded = LedgerConfig::load_or_default(&path);
        assert_eq!(reloaded.logging.level, "debug");
    }

    #[test]
    fn test_load_or_default_survives_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(LedgerConfig::load_or_default(&path), LedgerConfig::default());
    }
}
