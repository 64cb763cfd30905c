use thiserror::Error;

/// The unified error type for the `clan_data_ingestor` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the upstream API (e.g., request failure, bad token).
    #[error("Provider error: {0}")]
    Provider(String),

    /// An error originating from a snapshot sink (e.g., file I/O, encoding).
    #[error("Sink error: {0}")]
    Sink(String),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
