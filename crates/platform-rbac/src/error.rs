//! Error types for policy operations

use thiserror::Error;

/// Policy store and evaluator error types.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A referenced role, permission or identity does not exist
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "role").
        entity: &'static str,
        /// The id or name that matched nothing.
        key: String,
    },

    /// A permission name is already bound to a different resource/action pair
    #[error("Permission {name} already exists with a different resource or action")]
    Conflict {
        /// The conflicting permission name.
        name: String,
    },

    /// A role or permission name failed validation
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// The backing store could not be reached
    #[error("Policy store unavailable: {0}")]
    Unavailable(String),
}

impl PolicyError {
    /// Build a `NotFound` error for the given entity kind and key.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        PolicyError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
