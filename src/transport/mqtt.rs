// src/transport/mqtt.rs - MQTT transport over rumqttc
use super::Transport;
use crate::error::{Result, StationError};
use async_trait::async_trait;
use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Upper bound on waiting for the broker's CONNACK at startup
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause between event loop polls after a connection error
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Bounded request queue between the client handle and the event loop
const REQUEST_CAPACITY: usize = 10;

/// Publishes through a single MQTT connection established at startup.
///
/// The rumqttc event loop is driven on a background task for as long as the
/// transport lives; it reconnects on its own after network errors.
pub struct MqttTransport {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
    poller: Option<JoinHandle<()>>,
}

impl MqttTransport {
    /// Connect to `host:port` and wait for the broker to accept the session.
    ///
    /// Any failure here is returned to the caller; there is no retry.
    pub async fn connect(client_id: &str, host: &str, port: u16, keepalive: Duration) -> Result<Self> {
        let mut mqttoptions = MqttOptions::new(client_id, host, port);
        mqttoptions.set_keep_alive(keepalive);

        let (client, mut eventloop) = AsyncClient::new(mqttoptions, REQUEST_CAPACITY);

        timeout(CONNECT_TIMEOUT, wait_for_connack(&mut eventloop))
            .await
            .map_err(|_| {
                StationError::Transport(format!(
                    "timed out after {}s connecting to {}:{}",
                    CONNECT_TIMEOUT.as_secs(),
                    host,
                    port
                ))
            })?
            .map_err(|e| StationError::Transport(format!("failed to connect to {}:{}: {}", host, port, e)))?;

        info!("Connected to MQTT broker {}:{} as '{}'", host, port, client_id);

        let connected = Arc::new(AtomicBool::new(true));
        let poller = tokio::spawn(drive_event_loop(eventloop, connected.clone()));

        Ok(Self {
            client,
            connected,
            poller: Some(poller),
        })
    }
}

async fn wait_for_connack(eventloop: &mut EventLoop) -> std::result::Result<(), String> {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                return match ack.code {
                    ConnectReturnCode::Success => Ok(()),
                    code => Err(format!("broker refused connection: {:?}", code)),
                };
            }
            Ok(event) => debug!("MQTT event before CONNACK: {:?}", event),
            Err(e) => return Err(e.to_string()),
        }
    }
}

async fn drive_event_loop(mut eventloop: EventLoop, connected: Arc<AtomicBool>) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                if !connected.swap(true, Ordering::Relaxed) {
                    info!("Reconnected to MQTT broker");
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                connected.store(false, Ordering::Relaxed);
                debug!("MQTT disconnect sent, stopping event loop");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                if connected.swap(false, Ordering::Relaxed) {
                    warn!("MQTT connection lost: {}", e);
                } else {
                    debug!("MQTT reconnect attempt failed: {}", e);
                }
                sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

#[async_trait]
impl Transport for MqttTransport {
    async fn publish(&mut self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await
            .map_err(|e| StationError::Transport(format!("publish to '{}' failed: {}", topic, e)))
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.client
            .disconnect()
            .await
            .map_err(|e| StationError::Transport(format!("disconnect failed: {}", e)))?;

        if let Some(mut poller) = self.poller.take() {
            if timeout(RECONNECT_DELAY, &mut poller).await.is_err() {
                warn!("MQTT event loop did not stop after disconnect");
                poller.abort();
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    fn transport_name(&self) -> &'static str {
        "mqtt"
    }
}

impl Drop for MqttTransport {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }
}
