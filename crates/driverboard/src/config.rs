//! Configuration management for driverboard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "driverboard";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DRIVERBOARD_`)
/// 2. TOML config file at `~/.config/driverboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend configuration.
    pub api: ApiConfig,
    /// Rendering configuration.
    pub view: ViewConfig,
}

/// Backend-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the REST backend.
    pub base_url: String,
    /// Path of the driver collection below `base_url`.
    pub resource: String,
    /// Per-request timeout in seconds.
    /// Set to 0 for no timeout.
    pub timeout_secs: u64,
}

/// Rendering-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Title of the rendered HTML page.
    pub title: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3004".to_string(),
            resource: "drivers".to_string(),
            timeout_secs: 0,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: "Driver Registry".to_string(),
        }
    }
}

impl ApiConfig {
    /// Resolve the full URL of the driver collection.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an http(s) URL or `resource` is
    /// empty.
    pub fn collection_url(&self) -> Result<Url> {
        let mut base = Url::parse(&self.base_url).map_err(|e| Error::ConfigValidation {
            message: format!("invalid base_url '{}': {e}", self.base_url),
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::ConfigValidation {
                message: format!("base_url must use http or https, got '{}'", base.scheme()),
            });
        }

        let resource = self.resource.trim_matches('/');
        if resource.is_empty() {
            return Err(Error::ConfigValidation {
                message: "resource must not be empty".to_string(),
            });
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(resource).map_err(|e| Error::ConfigValidation {
            message: format!("invalid resource '{resource}': {e}"),
        })
    }

    /// Get the request timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `DRIVERBOARD_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("DRIVERBOARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.api.collection_url()?;
        Ok(())
    }
}
