//! Error types for audit recording

use thiserror::Error;

/// Audit recorder error types.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The audit store is temporarily unreachable; the write may be retried
    #[error("Audit store unavailable: {0}")]
    Unavailable(String),

    /// A record could not be durably written
    #[error("Failed to write audit record: {0}")]
    WriteFailure(String),

    /// Stored records could not be read back
    #[error("Failed to read audit records: {0}")]
    ReadFailure(String),

    /// A stored record is malformed
    #[error("Corrupt audit record at line {line}: {message}")]
    Corrupt {
        /// One-based line number in the backing file.
        line: usize,
        /// Parser message.
        message: String,
    },
}

impl AuditError {
    /// Check if retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuditError::Unavailable(_))
    }
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
