//! Access decisions
//!
//! `Decision` is the single source of truth for the outcome of an enforcement
//! check. Handlers branch on it and nothing else.

use crate::error::ServiceError;
use serde::{Deserialize, Serialize};

/// Reason attached to every denial produced by the gate.
pub const PERMISSION_DENIED: &str = "Permission denied";

/// Outcome of one enforcement check.
///
/// # Examples
///
/// ```
/// use platform_gate::Decision;
///
/// let decision = Decision::deny();
/// assert!(!decision.is_allowed());
/// assert_eq!(decision.reason_code(), "PERMISSION_DENIED");
/// assert_eq!(decision.message(), "Permission denied");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum Decision {
    /// The identity holds a matching permission
    Allow,

    /// The identity is known but lacks a matching permission
    Deny(String),

    /// No identity was supplied
    Unauthenticated,
}

impl Decision {
    /// The standard denial.
    pub fn deny() -> Self {
        Decision::Deny(PERMISSION_DENIED.to_string())
    }

    /// Check if access is granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Machine-checkable reason code.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Decision::Allow => "ALLOWED",
            Decision::Deny(_) => "PERMISSION_DENIED",
            Decision::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Decision::Allow => "Access granted",
            Decision::Deny(reason) => reason,
            Decision::Unauthenticated => "Authentication required.",
        }
    }

    /// Turn a rejection into the matching service error.
    pub fn into_result(self) -> Result<(), ServiceError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(ServiceError::PermissionDenied(reason)),
            Decision::Unauthenticated => Err(ServiceError::Unauthenticated),
        }
    }
}
