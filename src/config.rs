/// Service configuration loader - parses laghi.toml
///
/// Keeps the lake selection and refresh cadence out of the code so they
/// can be changed without recompiling the service. Every key is optional.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::lakes::{all_lake_names, is_known_lake};
use crate::model::{LaghiError, Result};

/// Default location of the configuration file (working directory).
pub const DEFAULT_CONFIG_PATH: &str = "laghi.toml";

pub const DEFAULT_SCAN_INTERVAL_MINUTES: u64 = 30;
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_REFRESH_TIMEOUT_SECONDS: u64 = 120;

/// Contents of laghi.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaghiConfig {
    /// Lakes to expose, checked against the registry.
    #[serde(default = "default_lakes")]
    pub lakes: Vec<String>,

    /// Minutes between refresh cycles.
    #[serde(default = "default_scan_interval")]
    pub scan_interval_minutes: u64,

    /// Per-request HTTP timeout.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,

    /// How long the coordinator waits for one full cycle.
    #[serde(default = "default_refresh_timeout")]
    pub refresh_timeout_seconds: u64,

    /// Serve the sensor API on this port when set.
    #[serde(default)]
    pub endpoint_port: Option<u16>,
}

fn default_lakes() -> Vec<String> {
    all_lake_names().into_iter().map(String::from).collect()
}

fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL_MINUTES
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECONDS
}

fn default_refresh_timeout() -> u64 {
    DEFAULT_REFRESH_TIMEOUT_SECONDS
}

impl Default for LaghiConfig {
    fn default() -> Self {
        Self {
            lakes: default_lakes(),
            scan_interval_minutes: DEFAULT_SCAN_INTERVAL_MINUTES,
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECONDS,
            refresh_timeout_seconds: DEFAULT_REFRESH_TIMEOUT_SECONDS,
            endpoint_port: None,
        }
    }
}

impl LaghiConfig {
    /// Parses configuration from TOML text and checks value ranges.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: LaghiConfig = toml::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.scan_interval_minutes == 0 {
            return Err(LaghiError::Config(
                "scan_interval_minutes must be at least 1".to_string(),
            ));
        }
        if self.fetch_timeout_seconds == 0 || self.refresh_timeout_seconds == 0 {
            return Err(LaghiError::Config("timeouts must be at least 1 second".to_string()));
        }
        Ok(())
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_minutes.saturating_mul(60))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_seconds)
    }

    /// Configured lakes that are on the whitelist, in configured order.
    ///
    /// Unknown names are logged and dropped; duplicates are collapsed.
    ///
    /// # Errors
    /// `LaghiError::NoValidLakes` if no configured name survives.
    pub fn validated_lakes(&self) -> Result<Vec<String>> {
        let mut valid: Vec<String> = Vec::new();

        for lake in &self.lakes {
            if !is_known_lake(lake) {
                log::warn!(
                    "Unknown lake '{}' in configuration. Available lakes: {:?}",
                    lake,
                    all_lake_names()
                );
                continue;
            }
            if !valid.contains(lake) {
                valid.push(lake.clone());
            }
        }

        if valid.is_empty() {
            log::error!("No valid lakes configured. Available lakes: {:?}", all_lake_names());
            return Err(LaghiError::NoValidLakes);
        }

        Ok(valid)
    }
}

/// Loads configuration from the given TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<LaghiConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    LaghiConfig::from_toml_str(&contents)
}

/// Loads `path` if it exists, otherwise falls back to built-in defaults.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<LaghiConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        log::info!("{} not found, using default configuration", path.display());
        Ok(LaghiConfig::default())
    }
}
