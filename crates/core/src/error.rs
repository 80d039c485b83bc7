use std::time::Duration;

/// Errors reported by an extraction collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    /// Configuration error (missing API key, invalid settings)
    #[error("configuration error: {0}")]
    Config(String),
    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(String),
    /// API error (non-2xx response, blocked prompt, rate limit)
    #[error("API error: {0}")]
    Api(String),
    /// Parse error (invalid JSON, unexpected response shape)
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors surfaced to callers of the extraction service.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("extraction service failed: {0}")]
    Collaborator(#[from] ExtractorError),
    #[error("extraction service did not respond within {0:?}")]
    Timeout(Duration),
}

impl ExtractionError {
    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UnsupportedFileType(_))
    }
}

pub type ExtractResult<T> = std::result::Result<T, ExtractionError>;
