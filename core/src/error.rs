//! Error types for the LeafScan upload workflow.
//!
//! One enum per concern:
//!
//! - [`ErrorKind`] - Category stored in [`crate::SubmissionState::Failed`]
//! - [`IntakeError`] - File selection rejected by validation
//! - [`TransportError`] - HTTP exchange never produced a response
//! - [`PredictionError`] - Anything that keeps a response from becoming a diagnosis
//! - [`ConfigError`] - Invalid client configuration
//!
//! The rich variants carry detail for logs. Only the [`ErrorKind`] travels
//! into workflow state, so rendered views never see transport internals.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Error categories
// =============================================================================

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Selected file is not an acceptable image.
    InvalidFile,
    /// The prediction endpoint could not be reached (or timed out).
    NetworkUnreachable,
    /// The endpoint answered with a non-success status.
    ServerError,
    /// The endpoint answered 2xx but the body breaks the contract.
    MalformedResponse,
}

impl ErrorKind {
    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFile => "invalid_file",
            ErrorKind::NetworkUnreachable => "network_unreachable",
            ErrorKind::ServerError => "server_error",
            ErrorKind::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Intake Errors
// =============================================================================

/// Reasons a selected file is refused before it becomes a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    /// Declared media type is not `image/*`.
    #[error("'{name}' is not an image (media type: {media_type:?})")]
    NotAnImage { name: String, media_type: String },

    /// Zero-byte payload.
    #[error("'{name}' is empty")]
    EmptyFile { name: String },

    /// Payload exceeds the configured upload limit.
    #[error("'{name}' is {size} bytes, limit is {limit} bytes")]
    TooLarge { name: String, size: usize, limit: usize },
}

impl IntakeError {
    /// Always [`ErrorKind::InvalidFile`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidFile
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, CORS rejection, etc.
    #[error("Endpoint unreachable: {0}")]
    Unreachable(String),

    /// No response within the configured timeout.
    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),
}

// =============================================================================
// Prediction Errors
// =============================================================================

/// Errors from a single prediction round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    /// Transport failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx status.
    #[error("Server error ({status}): {body}")]
    Status { status: u16, body: String },

    /// Body is not JSON or violates the response schema.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl PredictionError {
    /// Category recorded in workflow state.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictionError::Transport(_) => ErrorKind::NetworkUnreachable,
            PredictionError::Status { .. } => ErrorKind::ServerError,
            PredictionError::Malformed(_) => ErrorKind::MalformedResponse,
        }
    }
}

impl From<serde_json::Error> for PredictionError {
    fn from(err: serde_json::Error) -> Self {
        PredictionError::Malformed(err.to_string())
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Base URL is empty or not http(s).
    #[error("Invalid API URL '{0}': expected http:// or https://")]
    InvalidUrl(String),

    /// Timeout is not a positive number of seconds.
    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    /// Upload limit is not a positive number of megabytes.
    #[error("Invalid upload limit '{0}': expected a positive number of megabytes")]
    InvalidLimit(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for intake operations.
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Result type for prediction operations.
pub type PredictionResult<T> = Result<T, PredictionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_error_kinds() {
        let err: PredictionError = TransportError::Unreachable("refused".into()).into();
        assert_eq!(err.kind(), ErrorKind::NetworkUnreachable);

        let err: PredictionError = TransportError::TimedOut(Duration::from_secs(3)).into();
        assert_eq!(err.kind(), ErrorKind::NetworkUnreachable);

        let err = PredictionError::Status { status: 500, body: "boom".into() };
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert!(err.to_string().contains("500"));

        let err: PredictionError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_intake_error_format() {
        let err = IntakeError::NotAnImage {
            name: "notes.txt".into(),
            media_type: "text/plain".into(),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidFile);
        let msg = err.to_string();
        assert!(msg.contains("notes.txt"));
        assert!(msg.contains("text/plain"));
    }

    #[test]
    fn test_error_kind_names() {
        assert_eq!(ErrorKind::MalformedResponse.to_string(), "malformed_response");
        assert_eq!(ErrorKind::InvalidFile.as_str(), "invalid_file");
    }
}
