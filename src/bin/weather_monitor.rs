use anyhow::Context;
use rand::Rng;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use weather_station::{Assessment, Payload, StationConfig};

const RECONNECT_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("weather_monitor=info".parse()?),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => StationConfig::from_file(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => StationConfig::default(),
    };

    let client_id = format!("weather-monitor-{:08x}", rand::thread_rng().gen::<u32>());
    let mut mqttoptions = MqttOptions::new(client_id, config.broker.as_str(), config.port);
    mqttoptions.set_keep_alive(config.keepalive());

    let (client, mut eventloop) = AsyncClient::new(mqttoptions, 10);

    info!("Monitoring '{}' on {}:{}", config.topic, config.broker, config.port);
    info!("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to {}:{}", config.broker, config.port);
                    // Session is clean, so subscribe again after every reconnect
                    if let Err(e) = client.subscribe(config.topic.as_str(), QoS::AtMostOnce).await {
                        error!("Subscribe error: {}", e);
                    }
                }
                Ok(Event::Incoming(Packet::SubAck(_))) => {
                    info!("Subscribed to '{}'", config.topic);
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    report(&publish.topic, &publish.payload);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("MQTT error: {}, reconnecting", e);
                    sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }

    let _ = client.disconnect().await;
    Ok(())
}

fn report(topic: &str, bytes: &[u8]) {
    let payload = match Payload::from_json(bytes) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("[{}] Bad JSON: {} ({})", topic, e, String::from_utf8_lossy(bytes));
            return;
        }
    };

    let assessment = Assessment::of(&payload);
    if assessment.is_good() {
        info!("[{}] {}", topic, payload);
    } else {
        warn!(
            "[{}] {} (temperature: {}, humidity: {})",
            topic, payload, assessment.temperature, assessment.humidity
        );
    }
}
