//! Error types for analyst operations

use thiserror::Error;

/// Analyst specific errors
///
/// Lookup misses are not errors: resolution APIs return `Ok(None)` when a
/// symbol simply does not exist, and reserve these variants for actual
/// service or configuration failures.
#[derive(Debug, Error)]
pub enum AnalystError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error (listing snapshot, media files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    Yahoo(String),

    /// Listing provider or listing table error
    #[error("Listing error: {0}")]
    Listing(String),

    /// Generative AI provider error
    #[error("AI provider error: {0}")]
    Ai(String),

    /// News search provider error
    #[error("News search error: {0}")]
    News(String),

    /// Media retrieval error
    #[error("Media error: {0}")]
    Media(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bounded wait gave up before the remote side became ready
    #[error("Timed out: {0}")]
    Timeout(String),
}

/// Result type alias for analyst operations
pub type Result<T> = std::result::Result<T, AnalystError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalystError::Yahoo("no quotes".to_string());
        assert_eq!(err.to_string(), "Yahoo Finance error: no quotes");

        let err = AnalystError::Timeout("file processing".to_string());
        assert_eq!(err.to_string(), "Timed out: file processing");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AnalystError = io.into();
        assert!(matches!(err, AnalystError::Io(_)));
    }
}
