use thiserror::Error;

/// Application-wide error types for Mercado.
#[derive(Error, Debug)]
pub enum AppError {
    /// The marketplace search API was unreachable or returned an unusable payload.
    /// Aborts the whole ingestion run.
    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),

    /// A listing page could not be fetched or parsed after every attempt.
    #[error("Listing unreachable: {0}")]
    DetailUnreachable(String),

    /// The record store rejected a write or could not be reached.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// Spreadsheet construction failed.
    #[error("Export failed: {0}")]
    ExportFailure(String),

    /// HTTP request failed (fetching a page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Caller supplied unusable input (e.g. a blank search term).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true if this error is transient and a page fetch may be attempted again.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) => true,
            // A non-success status counts as a failed attempt, not a final answer.
            AppError::HttpError(_) => true,
            _ => false,
        }
    }
}
