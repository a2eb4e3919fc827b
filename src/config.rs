// src/config.rs - Station configuration from environment and optional YAML

use crate::error::{Result, StationError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the station identity
pub const ENV_STATION_ID: &str = "STATION_ID";

/// Environment variable holding the tick interval in seconds
pub const ENV_INTERVAL: &str = "INTERVAL";

// ============================================================================
// STATION CONFIGURATION
// ============================================================================

/// Process configuration, read once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Identity placed in every payload's `stationId`
    #[serde(default = "default_station_id")]
    pub station_id: String,

    /// Seconds between ticks
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// MQTT broker host
    #[serde(default = "default_broker")]
    pub broker: String,

    /// MQTT broker port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Topic every reading is published on
    #[serde(default = "default_topic")]
    pub topic: String,

    /// MQTT keepalive in seconds
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            station_id: default_station_id(),
            interval: default_interval(),
            broker: default_broker(),
            port: default_port(),
            topic: default_topic(),
            keepalive_secs: default_keepalive(),
        }
    }
}

impl StationConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to the documented defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        debug!("Loaded configuration file {}", path.display());
        Self::from_yaml(&contents)
    }

    /// Apply `STATION_ID` and `INTERVAL` on top of this configuration.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(station_id) = lookup(ENV_STATION_ID) {
            self.station_id = station_id;
        }

        if let Some(raw) = lookup(ENV_INTERVAL) {
            self.interval = parse_interval(&raw)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check semantic constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.interval == 0 {
            return Err(StationError::Config(
                "interval must be a positive number of seconds".to_string(),
            ));
        }
        if self.broker.trim().is_empty() {
            return Err(StationError::Config("broker host must not be empty".to_string()));
        }
        if self.topic.is_empty() {
            return Err(StationError::Config("topic must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }
}

fn parse_interval(raw: &str) -> Result<u64> {
    let interval: u64 = raw.trim().parse().map_err(|e| {
        StationError::Config(format!("{} must be a positive integer, got '{}': {}", ENV_INTERVAL, raw, e))
    })?;
    if interval == 0 {
        return Err(StationError::Config(format!(
            "{} must be a positive integer, got '{}'",
            ENV_INTERVAL, raw
        )));
    }
    Ok(interval)
}

// ============================================================================
// DEFAULT VALUE FUNCTIONS
// ============================================================================

fn default_station_id() -> String { "WS-XX".to_string() }
fn default_interval() -> u64 { 5 }
fn default_broker() -> String { "mosquitto".to_string() }
fn default_port() -> u16 { 1883 }
fn default_topic() -> String { "weather".to_string() }
fn default_keepalive() -> u64 { 60 }
