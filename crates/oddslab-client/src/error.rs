//! Client error types.

/// Errors that can occur when using the oddslab client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The user's daily limit for a feature is exhausted.
    #[error("daily limit reached for {feature}: used={used}")]
    LimitReached {
        /// The gated feature.
        feature: String,
        /// Invocations already counted today.
        used: i64,
    },

    /// User not found.
    #[error("user not found: {message}")]
    UserNotFound {
        /// Server-provided detail.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
