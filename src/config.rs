//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. explicit path (caller supplied)
//! 2. `~/.trendpulse/config.toml` (user)
//! 3. `/etc/trendpulse/config.toml` (system)
//!
//! The API key is a secret and lives separately, with a permission check:
//! 1. `~/.trendpulse/secrets.toml` (user, must be 0600)
//! 2. `/etc/trendpulse/secrets.toml` (system, must be 0600)
//! 3. `TRENDPULSE_API_KEY` environment variable

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::RetryConfig;
use crate::client::transport::DEFAULT_BASE_URL;
use crate::{Result, TrendPulseError};

/// Environment variable consulted when no secrets file provides a key.
pub const API_KEY_ENV_VAR: &str = "TRENDPULSE_API_KEY";

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(skip)]
    pub secrets: Secrets,
}

/// Enrichment endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Base URL; `/enrich` is appended (default: http://127.0.0.1:3000).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-attempt request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Retry policy as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// Total attempts including the first (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Linear backoff unit in milliseconds (default: 1000).
    #[serde(default = "default_backoff_step")]
    pub backoff_step_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_step_ms: default_backoff_step(),
        }
    }
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.max_attempts)
            .backoff_step(Duration::from_millis(self.backoff_step_ms))
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_step() -> u64 {
    1000
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration and secrets from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let mut config = Self::load_from_file(&path)?;
        config.secrets = Secrets::load()?;
        Ok(config)
    }

    /// Load a config file without consulting the standard locations or secrets.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TrendPulseError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml_str(&content).map_err(|e| {
            TrendPulseError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TrendPulseError::Configuration(e.to_string()))
    }

    /// API key from secrets, falling back to [`API_KEY_ENV_VAR`].
    pub fn api_key(&self) -> Option<String> {
        self.secrets.api_key().filter(|k| !k.is_empty())
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(TrendPulseError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".trendpulse").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/trendpulse/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(TrendPulseError::Configuration(
            "No config file found. Create ~/.trendpulse/config.toml or /etc/trendpulse/config.toml"
                .to_string(),
        ))
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// environment, or the endpoint may not need one).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".trendpulse").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/trendpulse/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            TrendPulseError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            TrendPulseError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            TrendPulseError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(TrendPulseError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// The API key, falling back to the environment.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
    }
}
