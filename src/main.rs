use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::signal;
use tracing::{error, info};
use weather_station::{MqttTransport, Station, StationConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("weather_station=info".parse()?),
        )
        .init();

    info!("Weather station v{} starting", weather_station::VERSION);

    // Optional YAML file first, then STATION_ID / INTERVAL on top
    let config = match std::env::args().nth(1) {
        Some(path) => StationConfig::from_file(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?
            .with_overrides(|key| std::env::var(key).ok())?,
        None => StationConfig::from_env()?,
    };
    info!(
        "Station {} -> {}:{} topic '{}' every {}s",
        config.station_id, config.broker, config.port, config.topic, config.interval
    );

    let mut rng = StdRng::from_entropy();
    let client_id = format!("{}-{:08x}", config.station_id, rng.gen::<u32>());

    let transport = MqttTransport::connect(&client_id, &config.broker, config.port, config.keepalive())
        .await
        .context("could not reach MQTT broker")?;

    let mut station = Station::new(&config, transport, rng);

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tokio::select! {
        _ = &mut ctrl_c => {
            info!("Received shutdown signal");
        }
        res = station.run() => {
            if let Err(e) = res {
                error!("Station error: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = station.shutdown().await {
        error!("Disconnect failed: {}", e);
    }

    let stats = station.stats();
    info!(
        "Final stats: {} ticks, {} published, {} publish errors, uptime: {}s",
        stats.ticks, stats.published, stats.publish_errors, stats.uptime_secs
    );

    Ok(())
}
