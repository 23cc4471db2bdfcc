use thiserror::Error;

/// Errors returned by the Product Hunt API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint answered with a non-success status.
    #[error("failed to get access token (HTTP {status}): {body}")]
    Authentication { status: u16, body: String },

    /// The GraphQL endpoint answered with a non-success status.
    #[error("unexpected HTTP status {status} for {context}")]
    UnexpectedStatus { status: u16, context: String },

    /// The GraphQL endpoint returned an `errors` payload instead of data.
    #[error("Product Hunt API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
