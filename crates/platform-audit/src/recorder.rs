//! Audit recorder implementation
//!
//! This module provides the audit recorder abstraction and an in-memory
//! implementation for recording access decisions and reading them back by
//! time window.

use crate::error::AuditResult;
use crate::record::{AuditEntry, AuditRecord};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of write timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Audit recorder trait for append-only decision logging.
///
/// There is no update or delete: retention is handled outside the core.
#[async_trait]
pub trait AuditRecorder: Send + Sync {
    /// Append one record.
    ///
    /// The recorder assigns the timestamp at write time. An `Err` means the
    /// record is not durably stored and the decision it describes must not
    /// be reported to the caller.
    async fn record(&self, entry: AuditEntry) -> AuditResult<AuditRecord>;

    /// All records with `timestamp >= since`, newest first.
    async fn query(&self, since: DateTime<Utc>) -> AuditResult<Vec<AuditRecord>>;

    /// Current time on the clock that stamps this recorder's records.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Start of a window ending now, or `None` if it would reach past the
    /// earliest representable time.
    fn window_start(&self, window: Duration) -> Option<DateTime<Utc>> {
        self.now().checked_sub_signed(window)
    }

    /// All records written within `window` of now, newest first.
    ///
    /// A window reaching past the earliest representable time covers every
    /// record.
    async fn query_window(&self, window: Duration) -> AuditResult<Vec<AuditRecord>> {
        let since = self.window_start(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.query(since).await
    }
}

/// Audit recorder statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditStats {
    /// Total records written
    pub records_written: u64,
    /// Records with a granted outcome
    pub allowed: u64,
    /// Records with a denied outcome
    pub denied: u64,
}

impl AuditStats {
    pub(crate) fn observe(&mut self, record: &AuditRecord) {
        self.records_written += 1;
        if record.outcome {
            self.allowed += 1;
        } else {
            self.denied += 1;
        }
    }
}

/// Keeps write timestamps non-decreasing even if the clock steps backwards,
/// so write order and timestamp order agree.
pub(crate) fn next_timestamp(
    now: DateTime<Utc>,
    last: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    match last {
        Some(last) if last > now => last,
        _ => now,
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<AuditRecord>,
    stats: AuditStats,
}

/// In-memory audit recorder.
///
/// Records are kept in write order, which is also timestamp order, so a
/// query is a reverse scan. This is suitable for single-process applications
/// and testing; use the JSON-lines recorder when records must survive a
/// restart.
#[derive(Clone)]
pub struct MemoryAuditRecorder {
    state: Arc<RwLock<MemoryState>>,
    clock: Clock,
}

impl std::fmt::Debug for MemoryAuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAuditRecorder").finish_non_exhaustive()
    }
}

impl MemoryAuditRecorder {
    /// Create a new in-memory recorder using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    /// Create with a custom clock.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            clock,
        }
    }

    /// Get recorder stats.
    pub async fn stats(&self) -> AuditStats {
        self.state.read().await.stats.clone()
    }

    /// Number of records held.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Check if no record has been written.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }
}

impl Default for MemoryAuditRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditRecorder for MemoryAuditRecorder {
    async fn record(&self, entry: AuditEntry) -> AuditResult<AuditRecord> {
        let mut state = self.state.write().await;

        let last = state.records.last().map(|r| r.timestamp);
        let record = entry.into_record(next_timestamp((self.clock)(), last));
        state.records.push(record.clone());
        state.stats.observe(&record);

        tracing::debug!(
            record_id = %record.id,
            identity_id = %record.identity,
            resource = %record.resource,
            action = %record.action,
            outcome = record.outcome,
            "Audit record written"
        );

        Ok(record)
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    async fn query(&self, since: DateTime<Utc>) -> AuditResult<Vec<AuditRecord>> {
        let state = self.state.read().await;
        Ok(state
            .records
            .iter()
            .rev()
            .take_while(|record| record.is_since(since))
            .cloned()
            .collect())
    }
}
