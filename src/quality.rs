// src/quality.rs - Plausibility flags for received readings
//
// Used on the consuming side only. The publisher never applies these checks.

use crate::payload::Payload;
use serde::Serialize;
use std::fmt;

/// Temperatures treated as "sensor failed" markers by consumers
pub const TEMPERATURE_SENTINELS: [f64; 4] = [-999.0, -99.9, 999.0, 9999.0];

#[derive(Debug, Clone)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Physically plausible outdoor temperature in °C
pub const PLAUSIBLE_TEMPERATURE: ValueRange = ValueRange::new(-50.0, 60.0);

/// Physically possible relative humidity in %
pub const PLAUSIBLE_HUMIDITY: ValueRange = ValueRange::new(0.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadingQuality {
    Good,
    Sentinel,
    OutOfRange,
}

impl ReadingQuality {
    pub fn is_good(self) -> bool {
        self == ReadingQuality::Good
    }
}

impl fmt::Display for ReadingQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingQuality::Good => write!(f, "good"),
            ReadingQuality::Sentinel => write!(f, "sentinel"),
            ReadingQuality::OutOfRange => write!(f, "out of range"),
        }
    }
}

pub fn classify_temperature(value: f64) -> ReadingQuality {
    if TEMPERATURE_SENTINELS.contains(&value) {
        ReadingQuality::Sentinel
    } else if !PLAUSIBLE_TEMPERATURE.contains(value) {
        ReadingQuality::OutOfRange
    } else {
        ReadingQuality::Good
    }
}

pub fn classify_humidity(value: f64) -> ReadingQuality {
    if PLAUSIBLE_HUMIDITY.contains(value) {
        ReadingQuality::Good
    } else {
        ReadingQuality::OutOfRange
    }
}

/// Quality of both readings in one payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub temperature: ReadingQuality,
    pub humidity: ReadingQuality,
}

impl Assessment {
    pub fn of(payload: &Payload) -> Self {
        Self {
            temperature: classify_temperature(payload.temperature),
            humidity: classify_humidity(payload.humidity),
        }
    }

    pub fn is_good(&self) -> bool {
        self.temperature.is_good() && self.humidity.is_good()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_classification() {
        assert_eq!(classify_temperature(-999.0), ReadingQuality::Sentinel);
        assert_eq!(classify_temperature(9999.0), ReadingQuality::Sentinel);
        assert_eq!(classify_temperature(22.4), ReadingQuality::Good);
        assert_eq!(classify_temperature(-50.0), ReadingQuality::Good);
        assert_eq!(classify_temperature(60.1), ReadingQuality::OutOfRange);
        assert_eq!(classify_temperature(-120.0), ReadingQuality::OutOfRange);
    }

    #[test]
    fn test_humidity_classification() {
        assert_eq!(classify_humidity(45.0), ReadingQuality::Good);
        assert_eq!(classify_humidity(0.0), ReadingQuality::Good);
        assert_eq!(classify_humidity(100.0), ReadingQuality::Good);
        assert_eq!(classify_humidity(-0.1), ReadingQuality::OutOfRange);
        assert_eq!(classify_humidity(150.0), ReadingQuality::OutOfRange);
    }

    #[test]
    fn test_assessment_of_payload() {
        let payload = Payload {
            station_id: "WS-02".to_string(),
            temperature: -999.0,
            humidity: 150.0,
            timestamp: "2024-01-15T12:34:56Z".to_string(),
        };
        let assessment = Assessment::of(&payload);
        assert_eq!(assessment.temperature, ReadingQuality::Sentinel);
        assert_eq!(assessment.humidity, ReadingQuality::OutOfRange);
        assert!(!assessment.is_good());
    }

    #[test]
    fn test_quality_display() {
        assert_eq!(ReadingQuality::OutOfRange.to_string(), "out of range");
        assert_eq!(ReadingQuality::Good.to_string(), "good");
    }
}
