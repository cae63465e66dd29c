//! Error types for nexus.

use thiserror::Error;

/// Result type alias using nexus's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for nexus operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration is missing or blank (e.g. the API key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The completion API could not be reached, or the exchange was cut short
    #[error("Transport error: {0}")]
    Transport(String),

    /// The completion API answered with a non-success status
    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// Image not found
    #[error("Image not found: {0}")]
    ImageNotFound(i64),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status of an upstream rejection, if this is one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
