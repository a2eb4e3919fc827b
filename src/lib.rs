//! Weather Station - synthetic sensor publisher with fault injection
//!
//! Simulates a single weather station that publishes temperature and
//! humidity readings as JSON on an MQTT topic. Readings are occasionally
//! invalid on purpose so that downstream consumers can be exercised against
//! sensor faults:
//!
//! - 2% of temperatures are the sentinel `-999`
//! - 2% of humidities come from a miscalibrated range of `[-100, 200]`
//! - 0.5% of ticks take the whole station down
//!
//! # Feature Flags
//!
//! - `mqtt` (default): the rumqttc transport and both binaries
//!
//! # Examples
//!
//! ```rust,no_run
//! use rand::{rngs::StdRng, SeedableRng};
//! use weather_station::{MqttTransport, Station, StationConfig};
//!
//! # async fn start() -> weather_station::Result<()> {
//! let config = StationConfig::from_env()?;
//! let transport = MqttTransport::connect(
//!     &config.station_id,
//!     &config.broker,
//!     config.port,
//!     config.keepalive(),
//! )
//! .await?;
//!
//! let mut station = Station::new(&config, transport, StdRng::from_entropy());
//! let stats = station.run().await?;
//! println!("published {} readings", stats.published);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// CORE MODULES (always available)
// ============================================================================

/// Crate error type
pub mod error;

/// Station configuration from environment and YAML
pub mod config;

/// Temperature and humidity generation
pub mod reading;

/// Wire payload assembly
pub mod payload;

/// Publish loop state machine
pub mod station;

/// Plausibility checks for consumers of the topic
pub mod quality;

/// Transport capability and implementations
pub mod transport;

// ============================================================================
// PUBLIC API EXPORTS
// ============================================================================

pub use config::StationConfig;
pub use error::{Result, StationError};
pub use payload::Payload;
pub use quality::{Assessment, ReadingQuality};
pub use station::{LoopState, Station, StationStats, TickOutcome};
pub use transport::Transport;

#[cfg(feature = "mqtt")]
#[cfg_attr(docsrs, doc(cfg(feature = "mqtt")))]
pub use transport::mqtt::MqttTransport;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
