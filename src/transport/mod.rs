// src/transport/mod.rs - Publish capability consumed by the station loop
use crate::error::Result;
use async_trait::async_trait;

/// Outbound message transport.
///
/// Implementations are connected before they are handed to the
/// [`Station`](crate::station::Station); connection setup is a constructor
/// concern and not part of this trait.
///
/// # Examples
///
/// ```rust
/// use weather_station::transport::Transport;
/// use async_trait::async_trait;
///
/// struct StdoutTransport;
///
/// #[async_trait]
/// impl Transport for StdoutTransport {
///     async fn publish(&mut self, topic: &str, payload: Vec<u8>) -> weather_station::Result<()> {
///         println!("{}: {}", topic, String::from_utf8_lossy(&payload));
///         Ok(())
///     }
///
///     fn is_connected(&self) -> bool {
///         true
///     }
///
///     fn transport_name(&self) -> &'static str {
///         "stdout"
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send {
    /// Hand one message to the transport. Fire-and-forget: no acknowledgement
    /// is awaited.
    async fn publish(&mut self, topic: &str, payload: Vec<u8>) -> Result<()>;

    /// Best-effort clean shutdown of the connection
    async fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }

    /// Check if the transport currently has a live connection
    fn is_connected(&self) -> bool;

    /// Get the transport name
    fn transport_name(&self) -> &'static str;
}

#[cfg(feature = "mqtt")]
pub mod mqtt;
