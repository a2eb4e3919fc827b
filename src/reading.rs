// src/reading.rs - Sensor reading generation with fault injection
//
// Out-of-range draws are emitted as-is. Downstream consumers are expected to
// cope with both the temperature sentinel and implausible humidity values.

use rand::Rng;
use std::ops::RangeInclusive;

/// Temperature reported when the simulated sensor has failed
pub const TEMPERATURE_SENTINEL: f64 = -999.0;

/// Probability that a temperature reading is the sentinel
pub const TEMPERATURE_FAULT_PROBABILITY: f64 = 0.02;

/// Probability that a humidity reading comes from the miscalibrated range
pub const HUMIDITY_ANOMALY_PROBABILITY: f64 = 0.02;

/// Plausible temperature range in °C
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 15.0..=30.0;

/// Plausible relative humidity range in %
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 30.0..=60.0;

/// Range of a miscalibrated humidity sensor, partly physically impossible
pub const HUMIDITY_ANOMALY_RANGE: RangeInclusive<f64> = -100.0..=200.0;

/// Next temperature reading: the sentinel or a plausible value.
pub fn next_temperature<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    if rng.gen_bool(TEMPERATURE_FAULT_PROBABILITY) {
        return TEMPERATURE_SENTINEL;
    }
    round_to_tenth(rng.gen_range(TEMPERATURE_RANGE))
}

/// Next humidity reading: plausible, or drawn from the anomaly range.
pub fn next_humidity<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let range = if rng.gen_bool(HUMIDITY_ANOMALY_PROBABILITY) {
        HUMIDITY_ANOMALY_RANGE
    } else {
        HUMIDITY_RANGE
    };
    round_to_tenth(rng.gen_range(range))
}

/// Round to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
