use std::time::Duration;

use thiserror::Error;

/// Application-wide error types for Perusal.
#[derive(Error, Debug)]
pub enum AppError {
    /// URL is malformed or violates the rule for its resource kind.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Content could not be extracted from a fetched page or document.
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// Extracted text could not be scored.
    #[error("Analysis error: {0}")]
    AnalysisError(String),

    /// HTTP request failed (bad status, unreadable body).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request or task deadline elapsed.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Processing was cancelled before it finished.
    #[error("Cancelled")]
    Cancelled,

    /// Staging directory or file operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// PDF could not be opened or a page could not be read.
    #[error("Document error: {0}")]
    DocumentError(String),

    /// Invalid pipeline or client configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Returns true if the failure came from the remote side rather than
    /// from local parsing or scoring.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::NetworkError(_) | AppError::Timeout(_)
        )
    }
}
