//! # Platform Identity
//!
//! This crate provides the identity contract consumed by the Relay platform
//! access core. Identities are owned by the account layer; the access core only
//! references them, counts them, and creates the very first one during
//! bootstrap.
//!
//! ## Overview
//!
//! The platform-identity crate handles:
//! - **Identities**: Authenticated principals referenced by id
//! - **Subjects**: The caller of a guarded operation, either an identity or anonymous
//! - **Directory**: Storage contract for identities, including the atomic
//!   "create only if empty" transition used for bootstrap
//!
//! ## Usage
//!
//! ```rust,no_run
//! use platform_identity::{IdentityDirectory, MemoryIdentityDirectory, NewIdentity, Subject};
//!
//! async fn example() {
//!     let directory = MemoryIdentityDirectory::new();
//!
//!     // Only succeeds while the directory is empty
//!     let first = directory
//!         .create_first(NewIdentity::new("admin", "admin@example.com"))
//!         .await
//!         .unwrap();
//!     assert!(first.is_some());
//!
//!     let subject = Subject::from(first.map(|identity| identity.id));
//!     assert!(subject.is_authenticated());
//! }
//! ```

pub mod directory;
pub mod error;
pub mod identity;

// Re-export main types for convenience
pub use directory::{IdentityDirectory, MemoryIdentityDirectory};
pub use error::{IdentityError, IdentityResult};
pub use identity::{Identity, IdentityId, NewIdentity, Subject};
