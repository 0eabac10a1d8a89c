//! # Roles
//!
//! Role records and the built-in role vocabulary.
//!
//! Roles form a flat model: a role grants exactly the permissions attached
//! to it, with no inheritance between roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Full administrative access.
pub const ADMIN: &str = "admin";

/// Role and user oversight.
pub const SUPERVISOR: &str = "supervisor";

/// Baseline access.
pub const STAFF: &str = "staff";

/// Built-in role names, most privileged first.
pub const BUILT_IN: [&str; 3] = [ADMIN, SUPERVISOR, STAFF];

/// Unique identifier of a role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RoleId(pub Uuid);

impl RoleId {
    /// Generate a fresh UUID v7 identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named role.
///
/// Role names are unique within a policy store. The permissions attached to
/// a role are held by the store, not by the record.
///
/// # Examples
///
/// ```
/// use platform_rbac::roles::{Role, ADMIN};
///
/// let role = Role::new(ADMIN);
/// assert_eq!(role.to_string(), "admin");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Role {
    /// Unique role ID
    pub id: RoleId,
    /// Unique role name
    pub name: String,
}

impl Role {
    /// Create a new role record with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_names_are_distinct() {
        assert_ne!(ADMIN, SUPERVISOR);
        assert_ne!(SUPERVISOR, STAFF);
        assert_eq!(BUILT_IN[0], ADMIN);
    }

    #[test]
    fn test_role_ids_are_unique() {
        assert_ne!(Role::new(ADMIN).id, Role::new(ADMIN).id);
    }
}
