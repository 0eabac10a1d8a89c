//! Audit record types
//!
//! An audit record is the immutable trace of one access decision. Records are
//! built by the recorder from an [`AuditEntry`]; the recorder, not the caller,
//! assigns the id and the timestamp.

use chrono::{DateTime, Utc};
use platform_identity::IdentityId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The caller-supplied part of an audit record.
///
/// # Examples
///
/// ```
/// use platform_audit::AuditEntry;
/// use platform_identity::IdentityId;
///
/// let entry = AuditEntry::new(IdentityId::new(), "USERS", "CREATE", true);
/// assert!(entry.outcome);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEntry {
    /// Identity the decision was made for
    pub identity: IdentityId,

    /// Resource tag that was checked
    pub resource: String,

    /// Action tag that was checked
    pub action: String,

    /// Whether access was granted
    pub outcome: bool,
}

impl AuditEntry {
    /// Create a new audit entry.
    ///
    /// # Arguments
    ///
    /// * `identity` - The identity the decision was made for
    /// * `resource` - The resource tag
    /// * `action` - The action tag
    /// * `outcome` - The evaluator's result
    pub fn new(
        identity: IdentityId,
        resource: impl Into<String>,
        action: impl Into<String>,
        outcome: bool,
    ) -> Self {
        Self {
            identity,
            resource: resource.into(),
            action: action.into(),
            outcome,
        }
    }

    /// Seal this entry into a record with the given write time.
    pub fn into_record(self, timestamp: DateTime<Utc>) -> AuditRecord {
        AuditRecord {
            id: Uuid::now_v7(),
            identity: self.identity,
            action: self.action,
            resource: self.resource,
            outcome: self.outcome,
            timestamp,
        }
    }
}

/// An immutable, append-only audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditRecord {
    /// Unique record ID
    pub id: Uuid,

    /// Identity the decision was made for
    pub identity: IdentityId,

    /// Action tag that was checked
    pub action: String,

    /// Resource tag that was checked
    pub resource: String,

    /// Whether access was granted
    pub outcome: bool,

    /// When the record was written
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    /// Check if this record falls inside a window starting at `since`.
    pub fn is_since(&self, since: DateTime<Utc>) -> bool {
        self.timestamp >= since
    }
}
