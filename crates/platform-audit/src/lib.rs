//! # Platform Audit
//!
//! This crate records every access decision made by the Relay platform access
//! core and serves those records back by time window.
//!
//! ## Overview
//!
//! The platform-audit crate handles:
//! - **Audit Records**: Immutable entries of identity, resource, action and outcome
//! - **Audit Recorder**: Append-only recording with recorder-assigned timestamps
//! - **Window Queries**: Records since a point in time, newest first
//!
//! ## Features
//!
//! - `jsonl` (default): Durable JSON-lines file recorder
//!
//! ## Guarantees
//!
//! - A successful `record` call means the record is stored; a failed one is
//!   always reported as an error, never dropped.
//! - Timestamps are assigned at write time and never decrease within one
//!   recorder, so write order and timestamp order agree.
//! - Records are never updated or deleted through this crate.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::Duration;
//! use platform_audit::{AuditEntry, AuditRecorder, MemoryAuditRecorder};
//! use platform_identity::IdentityId;
//!
//! async fn example() {
//!     let recorder = MemoryAuditRecorder::new();
//!
//!     recorder
//!         .record(AuditEntry::new(IdentityId::new(), "USERS", "CREATE", true))
//!         .await
//!         .unwrap();
//!
//!     // Everything from the last 24 hours, newest first
//!     let records = recorder.query_window(Duration::hours(24)).await.unwrap();
//!     assert_eq!(records.len(), 1);
//! }
//! ```

pub mod error;
#[cfg(feature = "jsonl")]
pub mod jsonl;
pub mod record;
pub mod recorder;

// Re-export main types
pub use error::{AuditError, AuditResult};
pub use record::{AuditEntry, AuditRecord};
pub use recorder::{AuditRecorder, AuditStats, Clock, MemoryAuditRecorder};

#[cfg(feature = "jsonl")]
pub use jsonl::JsonlAuditRecorder;
