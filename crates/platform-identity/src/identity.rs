//! Identity domain models
//!
//! This module provides the identity records referenced by the access core and
//! the `Subject` value that the session layer hands to every guarded operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of an identity.
///
/// # Examples
///
/// ```
/// use platform_identity::IdentityId;
///
/// let a = IdentityId::new();
/// let b = IdentityId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Generate a fresh UUID v7 identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An authenticated principal.
///
/// Credentials and profile data live with the account layer; the access core
/// only needs a stable id and a unique username.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Unique identity ID
    pub id: IdentityId,

    /// Unique login name
    pub username: String,

    /// Contact email
    pub email: String,

    /// When the identity was created
    pub created_at: DateTime<Utc>,
}

/// Data required to create an identity.
///
/// # Examples
///
/// ```
/// use platform_identity::NewIdentity;
///
/// let new = NewIdentity::new("alice", "alice@example.com").with_role("staff");
/// assert_eq!(new.role.as_deref(), Some("staff"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewIdentity {
    /// Requested username
    pub username: String,

    /// Contact email
    pub email: String,

    /// Optional role name to attach once the identity exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl NewIdentity {
    /// Create a new identity request without a role.
    ///
    /// # Arguments
    ///
    /// * `username` - The requested username
    /// * `email` - The contact email
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            role: None,
        }
    }

    /// Request a role to be attached after creation.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Build the stored record for this request.
    pub(crate) fn into_identity(self) -> Identity {
        Identity {
            id: IdentityId::new(),
            username: self.username,
            email: self.email,
            created_at: Utc::now(),
        }
    }
}

/// The caller of a guarded operation, as supplied by the session layer.
///
/// The access core never verifies credentials itself: a `Subject::Identity`
/// is trusted to be authenticated.
///
/// # Examples
///
/// ```
/// use platform_identity::{IdentityId, Subject};
///
/// assert!(!Subject::Anonymous.is_authenticated());
/// assert_eq!(Subject::from(None), Subject::Anonymous);
///
/// let id = IdentityId::new();
/// assert_eq!(Subject::from(Some(id)).identity(), Some(id));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Subject {
    /// No identity, or the anonymous sentinel
    #[default]
    Anonymous,

    /// An authenticated identity
    Identity(IdentityId),
}

impl Subject {
    /// Get the identity behind this subject, if any.
    pub fn identity(&self) -> Option<IdentityId> {
        match self {
            Subject::Anonymous => None,
            Subject::Identity(id) => Some(*id),
        }
    }

    /// Check if this subject carries an identity.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Subject::Identity(_))
    }
}

impl From<IdentityId> for Subject {
    fn from(id: IdentityId) -> Self {
        Subject::Identity(id)
    }
}

impl From<Option<IdentityId>> for Subject {
    fn from(id: Option<IdentityId>) -> Self {
        id.map_or(Subject::Anonymous, Subject::Identity)
    }
}

impl From<&Identity> for Subject {
    fn from(identity: &Identity) -> Self {
        Subject::Identity(identity.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_identity_into_identity() {
        let identity = NewIdentity::new("alice", "alice@example.com")
            .with_role("staff")
            .into_identity();

        assert_eq!(identity.username, "alice");
        assert_eq!(identity.email, "alice@example.com");
    }

    #[test]
    fn test_subject_conversions() {
        let id = IdentityId::new();
        assert_eq!(Subject::from(id), Subject::Identity(id));
        assert_eq!(Subject::from(Some(id)).identity(), Some(id));
        assert_eq!(Subject::from(None).identity(), None);
        assert_eq!(Subject::default(), Subject::Anonymous);
    }

    #[test]
    fn test_subject_serialization() {
        let json = serde_json::to_value(Subject::Anonymous).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "anonymous" }));
    }
}
