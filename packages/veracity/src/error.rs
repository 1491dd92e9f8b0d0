//! Typed errors for the verification library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during verification.
#[derive(Debug, Error)]
pub enum VeracityError {
    /// Language model unavailable or failed (after retries)
    #[error("model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl VeracityError {
    /// Wrap any model-side failure.
    pub fn model(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Model(Box::new(err))
    }
}

/// Errors a search provider can report for one query.
///
/// The gatherer logs and absorbs these; they never escape a verification.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No credential configured
    #[error("search provider disabled")]
    Disabled,

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider answered 429
    #[error("rate limit exceeded")]
    RateLimited,

    /// Request exceeded the client timeout
    #[error("timeout searching: {query}")]
    Timeout { query: String },

    /// Provider answered with a body we could not decode
    #[error("invalid search response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for verification operations.
pub type Result<T> = std::result::Result<T, VeracityError>;

/// Result type alias for search operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
