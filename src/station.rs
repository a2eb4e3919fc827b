// src/station.rs - Publish loop for a single simulated station
use crate::{
    config::StationConfig,
    error::*,
    payload::Payload,
    reading::{next_humidity, next_temperature},
    transport::Transport,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Probability that a tick simulates a total station outage
pub const TOTAL_FAILURE_PROBABILITY: f64 = 0.005;

/// Lifecycle of the publish loop. `Terminated` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopState {
    Running,
    Terminated,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Readings were generated and handed to the transport
    Published(Payload),
    /// The station went down; nothing was generated or published
    Terminated,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct StationStats {
    pub ticks: u64,
    pub published: u64,
    pub publish_errors: u64,
    pub uptime_secs: u64,
}

/// One weather station: owns its transport and its randomness source.
pub struct Station<T: Transport, R: Rng> {
    station_id: String,
    topic: String,
    interval: Duration,
    transport: T,
    rng: R,
    state: LoopState,
    stats: StationStats,
    start_time: Instant,
}

impl<T: Transport, R: Rng> Station<T, R> {
    pub fn new(config: &StationConfig, transport: T, rng: R) -> Self {
        Self {
            station_id: config.station_id.clone(),
            topic: config.topic.clone(),
            interval: config.interval_duration(),
            transport,
            rng,
            state: LoopState::Running,
            stats: StationStats::default(),
            start_time: Instant::now(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn stats(&self) -> StationStats {
        StationStats {
            uptime_secs: self.start_time.elapsed().as_secs(),
            ..self.stats.clone()
        }
    }

    /// Run one tick stamped with the current wall-clock time.
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        self.tick_at(Utc::now()).await
    }

    /// Run one tick stamped with `now`.
    ///
    /// The outage draw happens before any reading is generated, so an outage
    /// tick publishes nothing. Once terminated, further ticks are no-ops.
    pub async fn tick_at(&mut self, now: DateTime<Utc>) -> Result<TickOutcome> {
        if self.state == LoopState::Terminated {
            return Ok(TickOutcome::Terminated);
        }

        self.stats.ticks += 1;

        if self.rng.gen_bool(TOTAL_FAILURE_PROBABILITY) {
            self.state = LoopState::Terminated;
            warn!("[{}] Simulated total failure", self.station_id);
            return Ok(TickOutcome::Terminated);
        }

        let temperature = next_temperature(&mut self.rng);
        let humidity = next_humidity(&mut self.rng);
        let payload = Payload::assemble(&self.station_id, temperature, humidity, now);
        let json = payload.to_json()?;

        if let Err(e) = self.transport.publish(&self.topic, json.clone().into_bytes()).await {
            self.stats.publish_errors += 1;
            return Err(e);
        }

        self.stats.published += 1;
        info!("[{}] Published: {}", self.station_id, json);

        Ok(TickOutcome::Published(payload))
    }

    /// Tick until the station terminates, sleeping `interval` after every
    /// tick that did not terminate.
    pub async fn run(&mut self) -> Result<StationStats> {
        info!(
            "Station {} publishing to '{}' every {}s via {}",
            self.station_id,
            self.topic,
            self.interval.as_secs(),
            self.transport.transport_name()
        );

        while self.state == LoopState::Running {
            match self.tick().await {
                Ok(TickOutcome::Published(_)) => {}
                Ok(TickOutcome::Terminated) => break,
                Err(e) => {
                    warn!("[{}] Publish failed #{}: {}", self.station_id, self.stats.publish_errors, e);
                }
            }

            debug!("Tick {} complete, sleeping {:?}", self.stats.ticks, self.interval);
            sleep(self.interval).await;
        }

        info!("Station {} stopped", self.station_id);
        Ok(self.stats())
    }

    /// Disconnect the transport.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.transport.disconnect().await
    }
}
