// tests/publish_loop.rs
//! Integration tests for the station publish loop

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use weather_station::reading::{
    HUMIDITY_ANOMALY_RANGE, TEMPERATURE_RANGE, TEMPERATURE_SENTINEL,
};
use weather_station::{
    LoopState, Payload, Result, Station, StationConfig, StationError, TickOutcome, Transport,
};

/// Transport that keeps every message it is handed
#[derive(Default)]
struct RecordingTransport {
    messages: Vec<(String, Vec<u8>)>,
    fail_every: Option<usize>,
    attempts: usize,
    disconnected: bool,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn publish(&mut self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.attempts += 1;
        if let Some(n) = self.fail_every {
            if self.attempts % n == 0 {
                return Err(StationError::Transport("simulated broker hiccup".to_string()));
            }
        }
        self.messages.push((topic.to_string(), payload));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.disconnected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.disconnected
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

fn test_config(station_id: &str) -> StationConfig {
    StationConfig {
        station_id: station_id.to_string(),
        interval: 5,
        ..StationConfig::default()
    }
}

#[tokio::test]
async fn test_every_published_message_is_valid_wire_json() {
    let mut station = Station::new(
        &test_config("WS-01"),
        RecordingTransport::default(),
        StdRng::seed_from_u64(2024),
    );
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 42).unwrap();

    let mut published = Vec::new();
    for _ in 0..500 {
        match station.tick_at(now).await.unwrap() {
            TickOutcome::Published(payload) => published.push(payload),
            TickOutcome::Terminated => break,
        }
    }

    let messages = &station.transport().messages;
    assert_eq!(messages.len(), published.len());

    for ((topic, bytes), payload) in messages.iter().zip(&published) {
        assert_eq!(topic, "weather");

        let text = std::str::from_utf8(bytes).expect("payload is UTF-8");
        let value: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 4);
        assert_eq!(value["stationId"], "WS-01");
        assert_eq!(value["timestamp"], "2024-03-09T17:05:42Z");

        let decoded = Payload::from_json(bytes).unwrap();
        assert_eq!(&decoded, payload);
        assert!(
            decoded.temperature == TEMPERATURE_SENTINEL
                || TEMPERATURE_RANGE.contains(&decoded.temperature)
        );
        assert!(HUMIDITY_ANOMALY_RANGE.contains(&decoded.humidity));
    }
}

#[tokio::test]
async fn test_no_activity_after_termination() {
    let mut station = Station::new(
        &test_config("WS-02"),
        RecordingTransport::default(),
        StdRng::seed_from_u64(99),
    );
    let now = Utc::now();

    let mut ticks_until_failure = 0;
    loop {
        ticks_until_failure += 1;
        if station.tick_at(now).await.unwrap() == TickOutcome::Terminated {
            break;
        }
        assert!(ticks_until_failure < 100_000, "station never failed");
    }

    let sent = station.transport().messages.len();
    assert_eq!(sent, ticks_until_failure - 1);
    assert_eq!(station.state(), LoopState::Terminated);

    for _ in 0..100 {
        assert_eq!(station.tick_at(now).await.unwrap(), TickOutcome::Terminated);
    }
    assert_eq!(station.transport().messages.len(), sent);
    assert_eq!(station.stats().ticks, ticks_until_failure as u64);
}

#[tokio::test]
async fn test_total_failure_rate_per_tick() {
    let now = Utc::now();
    let mut total_ticks = 0u64;
    let stations = 500;

    for seed in 0..stations {
        let mut station = Station::new(
            &test_config("WS-RATE"),
            RecordingTransport::default(),
            StdRng::seed_from_u64(seed),
        );
        while station.tick_at(now).await.unwrap() != TickOutcome::Terminated {}
        total_ticks += station.stats().ticks;
    }

    // one terminal tick per station
    let rate = stations as f64 / total_ticks as f64;
    assert!(rate > 0.004 && rate < 0.0065, "failure rate per tick {}", rate);
}

#[tokio::test(start_paused = true)]
async fn test_run_sleeps_interval_between_ticks() {
    let mut station = Station::new(
        &test_config("WS-03"),
        RecordingTransport::default(),
        StdRng::seed_from_u64(7),
    );

    let started = tokio::time::Instant::now();
    let stats = station.run().await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(station.state(), LoopState::Terminated);
    assert_eq!(stats.published, stats.ticks - 1);
    assert_eq!(station.transport().messages.len() as u64, stats.published);
    // every published tick is followed by a full interval, the terminal one is not
    assert_eq!(elapsed, Duration::from_secs(5 * stats.published));
}

#[tokio::test(start_paused = true)]
async fn test_run_survives_publish_failures() {
    let transport = RecordingTransport {
        fail_every: Some(3),
        ..RecordingTransport::default()
    };
    let mut station = Station::new(&test_config("WS-04"), transport, StdRng::seed_from_u64(31));

    let stats = station.run().await.unwrap();

    assert_eq!(station.state(), LoopState::Terminated);
    assert_eq!(stats.published + stats.publish_errors, stats.ticks - 1);
    assert_eq!(stats.publish_errors, (stats.ticks - 1) / 3);
}

#[tokio::test]
async fn test_shutdown_disconnects_transport() {
    let mut station = Station::new(
        &test_config("WS-05"),
        RecordingTransport::default(),
        StdRng::seed_from_u64(1),
    );
    assert!(station.transport().is_connected());

    station.shutdown().await.unwrap();

    assert!(!station.transport().is_connected());
}
