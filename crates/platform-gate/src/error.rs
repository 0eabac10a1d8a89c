//! Error types for access enforcement
//!
//! This module defines the errors raised by the gate itself and the
//! caller-visible errors of the access service. Every `ServiceError` carries a
//! machine-checkable code and a human-readable message.

use platform_audit::AuditError;
use platform_identity::IdentityError;
use platform_rbac::PolicyError;
use thiserror::Error;

/// Errors that prevent the gate from producing a decision.
#[derive(Debug, Error)]
pub enum GateError {
    /// The decision could not be durably audited
    #[error("Audit write failed: {0}")]
    AuditWriteFailure(#[source] AuditError),

    /// Policy state could not be read
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;

/// Caller-visible errors of access service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No identity was supplied
    #[error("Authentication required.")]
    Unauthenticated,

    /// The identity lacks the required permission
    #[error("{0}")]
    PermissionDenied(String),

    /// A referenced role, permission or identity does not exist
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up.
        entity: &'static str,
        /// The id or name that matched nothing.
        key: String,
    },

    /// Input failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation collides with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The decision could not be durably audited
    #[error("Audit trail unavailable: {0}")]
    AuditWriteFailure(String),

    /// A backing store could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for access service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Check if this error should be logged at error level.
    ///
    /// Rejections (unauthenticated, denied, not found, validation) are
    /// expected outcomes and are not server errors.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ServiceError::AuditWriteFailure(_)
                | ServiceError::Unavailable(_)
                | ServiceError::ConfigError(_)
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Unauthenticated => 401,
            ServiceError::PermissionDenied(_) => 403,
            ServiceError::NotFound { .. } => 404,
            ServiceError::Validation(_) => 400,
            ServiceError::Conflict(_) => 409,
            ServiceError::AuditWriteFailure(_) | ServiceError::Unavailable(_) => 503,
            ServiceError::ConfigError(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Unauthenticated => "UNAUTHENTICATED",
            ServiceError::PermissionDenied(_) => "PERMISSION_DENIED",
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::AuditWriteFailure(_) => "AUDIT_WRITE_FAILURE",
            ServiceError::Unavailable(_) => "SERVICE_UNAVAILABLE",
            ServiceError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

impl From<PolicyError> for ServiceError {
    fn from(e: PolicyError) -> Self {
        match e {
            PolicyError::NotFound { entity, key } => ServiceError::NotFound { entity, key },
            PolicyError::Conflict { .. } => ServiceError::Conflict(e.to_string()),
            PolicyError::InvalidName(message) => ServiceError::Validation(message),
            PolicyError::Unavailable(message) => ServiceError::Unavailable(message),
        }
    }
}

impl From<IdentityError> for ServiceError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::NotFound(key) => ServiceError::NotFound {
                entity: "identity",
                key,
            },
            IdentityError::UsernameTaken(_) => ServiceError::Conflict(e.to_string()),
            IdentityError::Invalid(message) => ServiceError::Validation(message),
            IdentityError::Unavailable(message) => ServiceError::Unavailable(message),
        }
    }
}

impl From<AuditError> for ServiceError {
    fn from(e: AuditError) -> Self {
        ServiceError::Unavailable(e.to_string())
    }
}

impl From<GateError> for ServiceError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::AuditWriteFailure(source) => {
                ServiceError::AuditWriteFailure(source.to_string())
            }
            GateError::Policy(source) => source.into(),
        }
    }
}
