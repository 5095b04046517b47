//! Error types for course-portal.

use thiserror::Error;

/// Main error type for course-portal operations.
#[derive(Error, Debug)]
pub enum PortalError {
    /// Transport-level HTTP failure (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL or route could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A login was attempted with an empty session field.
    #[error("incomplete session: {0} is empty")]
    IncompleteSession(&'static str),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// Convenience Result type for course-portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;
