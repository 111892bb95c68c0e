//! Error types for glossa.

use thiserror::Error;

/// Result type alias using glossa's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for glossa operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Cache store operation failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Insert rejected by the unique constraint on `entry.keyword`.
    ///
    /// The entry service turns this into the update path of an upsert.
    #[error("Keyword already exists: {0}")]
    DuplicateKeyword(String),

    /// Registration rejected because the user name is taken
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// Content failed the spam check
    #[error("Rejected as spam: {0}")]
    SpamRejected(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Authentication required
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (bad credentials or session for a vanished user)
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
