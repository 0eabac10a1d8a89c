//! Error types for identity directory operations

use thiserror::Error;

/// Identity directory error types.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No identity exists for the given key
    #[error("Identity not found: {0}")]
    NotFound(String),

    /// Another identity already uses this username
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// The identity data failed validation
    #[error("Invalid identity: {0}")]
    Invalid(String),

    /// The backing store could not be reached
    #[error("Identity directory unavailable: {0}")]
    Unavailable(String),
}

/// Result type for identity directory operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
