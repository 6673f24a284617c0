//! Gate configuration
//!
//! Loaded from a TOML or JSON file (chosen by extension), then overridden by
//! `SOTERIA_*` environment variables, then validated.

use serde::{Deserialize, Serialize};
use soteria_core::{Address, IdentifierError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Longest time the lock may be held open for one grant.
pub const MAX_GRANT_DURATION_SECS: u64 = 3600;

const ENV_APP_ID: &str = "SOTERIA_APP_ID";
const ENV_OWNER: &str = "SOTERIA_OWNER";
const ENV_STORAGE_PATH: &str = "SOTERIA_STORAGE_PATH";
const ENV_JOURNAL_PATH: &str = "SOTERIA_JOURNAL_PATH";
const ENV_GRANT_DURATION: &str = "SOTERIA_ACCESS_GRANT_DURATION_SECS";
const ENV_GPIO_PIN: &str = "SOTERIA_LOCK_GPIO_PIN";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {}: {message}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        message: String,
    },

    /// The extension is neither `toml` nor `json`
    #[error("Unsupported config format: {}", path.display())]
    UnsupportedFormat {
        /// Offending file
        path: PathBuf,
    },

    /// The document did not parse
    #[error("Invalid config: {message}")]
    Parse {
        /// Parser message
        message: String,
    },

    /// An environment override could not be parsed
    #[error("Invalid value in {var}: {reason}")]
    Env {
        /// Variable name
        var: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A field failed validation
    #[error("Invalid {field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Settings for one gate deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Deployment id that scanned payloads must carry
    pub app_id: u64,
    /// Hex-encoded ledger owner address
    pub owner: String,
    /// Root directory of the box store
    pub storage_path: PathBuf,
    /// File holding the audit journal
    pub journal_path: PathBuf,
    /// Seconds the lock stays open after a grant
    pub access_grant_duration_secs: u64,
    /// Actuator pin
    pub lock_gpio_pin: u8,
    /// Guest name used when a payload carries none
    pub default_guest_name: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            app_id: 0,
            owner: String::new(),
            storage_path: PathBuf::from("./storage/keys"),
            journal_path: PathBuf::from("./storage/audit_journal.json"),
            access_grant_duration_secs: 10,
            lock_gpio_pin: 4,
            default_guest_name: "Unknown Guest".to_string(),
        }
    }
}

impl GateConfig {
    /// Read a file, apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML or JSON file without overrides or validation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            }),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Apply `SOTERIA_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn merge_with_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_APP_ID) {
            self.app_id = parse_env(ENV_APP_ID, &value)?;
        }
        if let Some(value) = lookup(ENV_OWNER) {
            self.owner = value;
        }
        if let Some(value) = lookup(ENV_STORAGE_PATH) {
            self.storage_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_JOURNAL_PATH) {
            self.journal_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_GRANT_DURATION) {
            self.access_grant_duration_secs = parse_env(ENV_GRANT_DURATION, &value)?;
        }
        if let Some(value) = lookup(ENV_GPIO_PIN) {
            self.lock_gpio_pin = parse_env(ENV_GPIO_PIN, &value)?;
        }
        Ok(())
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_id == 0 {
            return Err(ConfigError::invalid("app_id", "must be non-zero"));
        }
        self.owner_address()?;
        if self.access_grant_duration_secs == 0 {
            return Err(ConfigError::invalid(
                "access_grant_duration_secs",
                "must be at least one second",
            ));
        }
        if self.access_grant_duration_secs > MAX_GRANT_DURATION_SECS {
            return Err(ConfigError::invalid(
                "access_grant_duration_secs",
                format!("must not exceed {MAX_GRANT_DURATION_SECS} seconds"),
            ));
        }
        Ok(())
    }

    /// The ledger owner.
    pub fn owner_address(&self) -> Result<Address, ConfigError> {
        if self.owner.trim().is_empty() {
            return Err(ConfigError::invalid("owner", "is required"));
        }
        self.owner
            .parse()
            .map_err(|e: IdentifierError| ConfigError::invalid("owner", e.to_string()))
    }

    /// Grant duration in milliseconds, as handed to the clock.
    pub fn access_grant_duration_ms(&self) -> u64 {
        self.access_grant_duration_secs.saturating_mul(1000)
    }
}

fn parse_env<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        reason: e.to_string(),
    })
}
