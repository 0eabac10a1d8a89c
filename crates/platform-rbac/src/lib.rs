//! # Platform RBAC (Role-Based Access Control)
//!
//! This crate provides the policy side of the Relay platform access core:
//! the roles, the permissions, the relations between them and the identities
//! they are assigned to, and the evaluator that turns that state into an
//! allow/deny answer.
//!
//! ## Overview
//!
//! The platform-rbac crate handles:
//! - **Roles**: Named bundles of permissions, unique by name
//! - **Permissions**: Named grants of one action on one resource
//! - **Policy Store**: Identity→role and role→permission relations
//! - **Evaluator**: Short-circuiting existence check over those relations
//!
//! ## Architecture
//!
//! ```text
//! Identity ──(many-to-many)──→ Role ──(many-to-many)──→ Permission
//!                                                      (resource, action)
//!
//! effective permissions(identity) = ∪ permissions(role) for each attached role
//! ```
//!
//! The model is flat: there is no role hierarchy and no action implication.
//! Resource and action tags are opaque strings compared exactly; the
//! [`resources`] and [`actions`] modules list the built-in vocabulary.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use platform_identity::IdentityId;
//! use platform_rbac::{actions, resources, roles};
//! use platform_rbac::{MemoryPolicyStore, PermissionEvaluator, PolicyStore};
//!
//! async fn example() {
//!     let store = Arc::new(MemoryPolicyStore::new());
//!
//!     // Get-or-create is idempotent by name
//!     let staff = store.get_or_create_role(roles::STAFF).await.unwrap();
//!     let basic = store
//!         .get_or_create_permission("Basic Access", resources::BASIC, actions::ACCESS)
//!         .await
//!         .unwrap();
//!     store.assign_permission(staff.id, basic.id).await.unwrap();
//!
//!     let identity = IdentityId::new();
//!     store.assign_role(identity, staff.id).await.unwrap();
//!
//!     let evaluator = PermissionEvaluator::new(store);
//!     assert!(evaluator.evaluate(identity, "BASIC", "ACCESS").await.unwrap());
//!     assert!(!evaluator.evaluate(identity, "USERS", "CREATE").await.unwrap());
//! }
//! ```

pub mod actions;
pub mod error;
pub mod evaluator;
pub mod permissions;
pub mod resources;
pub mod roles;
pub mod store;

// Re-export main types for convenience
pub use error::{PolicyError, PolicyResult};
pub use evaluator::PermissionEvaluator;
pub use permissions::{Permission, PermissionId};
pub use roles::{Role, RoleId};
pub use store::{MemoryPolicyStore, PolicyStore};
