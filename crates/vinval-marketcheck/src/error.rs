use thiserror::Error;

/// Errors returned by the MarketCheck API client.
///
/// Endpoints are reported by path only; request URLs carry the API key and
/// never appear in error messages. [`ProviderError::Http`] values are built
/// with the URL stripped from the `reqwest::Error`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP 429.
    #[error("rate limited by MarketCheck on {endpoint}")]
    RateLimited { endpoint: String },

    /// HTTP 5xx.
    #[error("MarketCheck server error {status} on {endpoint}")]
    ServerError { status: u16, endpoint: String },

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status} on {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    /// The response body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A 2xx response carrying a `code`/`message` error envelope.
    #[error("MarketCheck API error: {0}")]
    ApiError(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("MARKETCHECK_API_KEY is not set")]
    MissingApiKey,
}
