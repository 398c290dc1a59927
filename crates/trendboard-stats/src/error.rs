use thiserror::Error;

/// Errors returned by [`crate::StatsClient`].
#[derive(Debug, Error)]
pub enum AggregationError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("aggregation service returned {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid aggregation base URL '{base}': {reason}")]
    InvalidBaseUrl { base: String, reason: String },
}
