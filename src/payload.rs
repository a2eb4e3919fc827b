// src/payload.rs - Wire message assembled once per tick

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `strftime` pattern of the payload timestamp: UTC, second precision, literal `Z`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One weather message as published on the topic.
///
/// Field names are fixed by existing consumers. Values are carried through
/// untouched, including sentinel and out-of-range readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub station_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: String,
}

impl Payload {
    /// Assemble a payload stamped with `now`.
    pub fn assemble(station_id: &str, temperature: f64, humidity: f64, now: DateTime<Utc>) -> Self {
        Self {
            station_id: station_id.to_string(),
            temperature,
            humidity,
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a message received from the topic.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{stationId: {}, temperature: {}, humidity: {}, timestamp: {}}}",
            self.station_id, self.temperature, self.humidity, self.timestamp
        )
    }
}
