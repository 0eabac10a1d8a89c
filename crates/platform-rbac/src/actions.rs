//! # Actions
//!
//! Action tags observed across the platform.
//!
//! Like resources, actions are compared as opaque, case-sensitive tokens.
//! There is no implication between actions: `MANAGE` does not grant `READ`.

/// Create a new instance of a resource.
pub const CREATE: &str = "CREATE";

/// Administer a resource class.
pub const MANAGE: &str = "MANAGE";

/// View resource data.
pub const READ: &str = "READ";

/// Attach one entity to another (roles to identities, permissions to roles).
pub const ASSIGN: &str = "ASSIGN";

/// Enter the application at all.
pub const ACCESS: &str = "ACCESS";

/// All built-in action tags.
pub const ALL: [&str; 5] = [CREATE, MANAGE, READ, ASSIGN, ACCESS];
