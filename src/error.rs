use thiserror::Error;

/// Application level error type used throughout the crate.
#[derive(Error, Debug)]
pub enum StationError {
    /// I/O related failure
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error while parsing YAML configuration files
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Payload could not be encoded for the wire
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connect or publish failure reported by the transport
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Convenient alias over [`Result`] using [`StationError`]
pub type Result<T> = std::result::Result<T, StationError>;
