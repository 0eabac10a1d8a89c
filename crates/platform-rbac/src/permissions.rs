//! # Permissions
//!
//! Permission records for the RBAC system.
//! A permission is a named grant of one action on one resource.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a permission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PermissionId(pub Uuid);

impl PermissionId {
    /// Generate a fresh UUID v7 identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grant of one action on one resource.
///
/// Two permissions with different names may carry the same
/// `(resource, action)` pair; only the name is unique.
///
/// # Example
///
/// ```
/// use platform_rbac::permissions::Permission;
///
/// let perm = Permission::new("Create Users", "USERS", "CREATE");
/// assert!(perm.grants("USERS", "CREATE"));
/// assert!(!perm.grants("users", "CREATE"));
/// assert_eq!(perm.to_string(), "Create Users (USERS:CREATE)");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Permission {
    /// Unique permission ID
    pub id: PermissionId,
    /// Unique permission name
    pub name: String,
    /// The resource tag this permission applies to
    pub resource: String,
    /// The action tag allowed on the resource
    pub action: String,
}

impl Permission {
    /// Create a new permission record with a fresh id.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique permission name
    /// * `resource` - The resource tag
    /// * `action` - The action tag
    pub fn new(
        name: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id: PermissionId::new(),
            name: name.into(),
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Check if this permission grants `action` on `resource`.
    ///
    /// Both tags are compared exactly and case-sensitively. Empty strings
    /// are ordinary tags, not wildcards.
    ///
    /// # Returns
    ///
    /// `true` if both tags match, `false` otherwise
    pub fn grants(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && self.action == action
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.resource, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_grants_exact_match() {
        let perm = Permission::new("Create Users", "USERS", "CREATE");
        assert!(perm.grants("USERS", "CREATE"));
        assert!(!perm.grants("USERS", "READ"));
        assert!(!perm.grants("ROLES", "CREATE"));
    }

    #[test]
    fn test_permission_grants_is_case_sensitive() {
        let perm = Permission::new("Create Users", "USERS", "CREATE");
        assert!(!perm.grants("users", "create"));
    }

    #[test]
    fn test_empty_tags_match_literally() {
        let perm = Permission::new("Blank", "", "");
        assert!(perm.grants("", ""));
        assert!(!perm.grants("USERS", ""));

        let other = Permission::new("Users", "USERS", "CREATE");
        assert!(!other.grants("", ""));
    }

    #[test]
    fn test_display() {
        let perm = Permission::new("View Audit Logs", "AUDIT", "READ");
        assert_eq!(perm.to_string(), "View Audit Logs (AUDIT:READ)");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(PermissionId::new(), PermissionId::new());
        assert_ne!(
            Permission::new("a", "USERS", "READ").id,
            Permission::new("a", "USERS", "READ").id
        );
    }
}
