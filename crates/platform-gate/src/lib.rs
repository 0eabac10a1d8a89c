//! # Platform Gate
//!
//! This crate is the enforcement point of the Relay platform access core. It
//! composes the policy store, the permission evaluator and the audit recorder
//! into a single check that request handlers call before doing guarded work.
//!
//! ## Overview
//!
//! The platform-gate crate handles:
//! - **Access Gate**: Evaluate, audit, then decide
//! - **Decisions**: Allow, deny or unauthenticated, with stable reason codes
//! - **Access Service**: Guarded administrative operations and the first-identity bootstrap
//! - **Seeding**: Built-in roles, permissions and the initial admin identity
//! - **Configuration**: Environment-driven audit window, retry and admin settings
//!
//! ## Ordering
//!
//! ```text
//! Subject ──→ anonymous? ──yes──→ Unauthenticated (not audited)
//!                │ no
//!                ▼
//!            evaluate ──→ record audit ──fail──→ GateError::AuditWriteFailure
//!                              │ ok
//!                              ▼
//!                        Allow / Deny
//! ```
//!
//! A decision is never returned before its audit record is stored.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use platform_audit::MemoryAuditRecorder;
//! use platform_gate::{seed, AccessConfig, AccessService};
//! use platform_identity::MemoryIdentityDirectory;
//! use platform_rbac::MemoryPolicyStore;
//!
//! async fn example() {
//!     let config = AccessConfig::from_env();
//!     let policy = Arc::new(MemoryPolicyStore::new());
//!     let directory = Arc::new(MemoryIdentityDirectory::new());
//!
//!     let report = seed::run(policy.as_ref(), directory.as_ref(), &config.admin)
//!         .await
//!         .unwrap();
//!     let admin = report.admin_created.unwrap();
//!
//!     let service = AccessService::new(
//!         policy,
//!         directory,
//!         Arc::new(MemoryAuditRecorder::new()),
//!         config,
//!     )
//!     .unwrap();
//!
//!     let decision = service
//!         .validate_access(admin.id.into(), "AUDIT", "READ")
//!         .await
//!         .unwrap();
//!     assert!(decision.is_allowed());
//! }
//! ```

pub mod config;
pub mod decision;
pub mod error;
pub mod gate;
pub mod retry;
pub mod seed;
pub mod service;

// Re-export main types for convenience
pub use config::{AccessConfig, AdminAccount, ConfigError, DEFAULT_AUDIT_WINDOW_HOURS};
pub use decision::{Decision, PERMISSION_DENIED};
pub use error::{GateError, GateResult, ServiceError, ServiceResult};
pub use gate::AccessGate;
pub use retry::{with_retry_if, RetryPolicy};
pub use seed::{SeedReport, DEFAULT_PERMISSIONS};
pub use service::{AccessService, CreatedIdentity};
