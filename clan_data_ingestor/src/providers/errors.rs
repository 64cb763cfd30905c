use thiserror::Error;

/// Errors that can occur within a [`ClanDataProvider`](super::ClanDataProvider) implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-success status with an error body.
    #[error("API error: {0}")]
    Api(String),
}

/// Errors that can occur while constructing a provider.
#[derive(Debug, Error)]
pub enum ProviderInitError {
    /// A required credential environment variable is not set.
    #[error(transparent)]
    MissingEnv(#[from] shared_utils::env::MissingEnvVarError),

    /// The API token cannot be used as an HTTP header value.
    #[error("API token is not a valid header value")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[from] reqwest::Error),
}
