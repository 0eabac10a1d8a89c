//! # Resources
//!
//! Resource tags observed across the platform.
//!
//! Resources are opaque string tags to the evaluator: a permission grants an
//! action on a resource when both tags match exactly. The constants below
//! are the vocabulary the seed routine and the access service use; callers
//! are free to introduce new tags without changing this crate.

/// User accounts.
pub const USERS: &str = "USERS";

/// Role definitions and role assignments.
pub const ROLES: &str = "ROLES";

/// Permission definitions and permission assignments.
pub const PERMISSIONS: &str = "PERMISSIONS";

/// The access audit trail.
pub const AUDIT: &str = "AUDIT";

/// Baseline application access.
pub const BASIC: &str = "BASIC";

/// All built-in resource tags.
pub const ALL: [&str; 5] = [USERS, ROLES, PERMISSIONS, AUDIT, BASIC];
