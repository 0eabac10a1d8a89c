//! JSON-lines audit recorder (Feature: jsonl)
//!
//! Appends one JSON object per line to a local file and syncs the file before
//! acknowledging the write, so an acknowledged record survives a crash. A
//! failed append is truncated away before the error is returned, and an
//! incomplete last line found on open is dropped.
//! Reads parse the whole file; the format is meant for modest volumes and
//! for deployments that ship the file elsewhere for long-term retention.

use crate::error::{AuditError, AuditResult};
use crate::record::{AuditEntry, AuditRecord};
use crate::recorder::{next_timestamp, AuditRecorder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

struct JsonlState {
    file: File,
    last_timestamp: Option<DateTime<Utc>>,
}

/// Durable audit recorder backed by a JSON-lines file.
pub struct JsonlAuditRecorder {
    path: PathBuf,
    state: Mutex<JsonlState>,
}

impl std::fmt::Debug for JsonlAuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlAuditRecorder")
            .field("path", &self.path)
            .finish()
    }
}

fn write_error(e: std::io::Error) -> AuditError {
    match e.kind() {
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut => {
            AuditError::Unavailable(e.to_string())
        }
        _ => AuditError::WriteFailure(e.to_string()),
    }
}

/// Split off a trailing fragment left by a write that never completed.
///
/// Returns the complete part and the byte length of the dropped fragment.
fn split_torn_tail(content: &str) -> (&str, usize) {
    if content.is_empty() || content.ends_with('\n') {
        return (content, 0);
    }
    let complete = content.rfind('\n').map_or(0, |idx| idx + 1);
    (&content[..complete], content.len() - complete)
}

/// Append `line` and sync it, or leave the file exactly as it was.
///
/// A failure after the append truncates the file back to its previous
/// length, so a retried write never duplicates a record and a partial line
/// is never followed by another append.
async fn append_line(file: &mut File, line: &[u8]) -> AuditResult<()> {
    let len = file
        .metadata()
        .await
        .map_err(|e| AuditError::WriteFailure(e.to_string()))?
        .len();

    let written: std::io::Result<()> = async {
        file.write_all(line).await?;
        file.flush().await?;
        file.sync_data().await
    }
    .await;

    let Err(e) = written else {
        return Ok(());
    };

    match file.set_len(len).await {
        Ok(()) => Err(write_error(e)),
        Err(rollback) => {
            tracing::error!(error = %e, rollback_error = %rollback, "Audit log rollback failed");
            Err(AuditError::WriteFailure(format!("{e}; rollback failed: {rollback}")))
        }
    }
}

fn parse_records(content: &str) -> AuditResult<Vec<AuditRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<AuditRecord>(line).map_err(|e| AuditError::Corrupt {
                line: idx + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

impl JsonlAuditRecorder {
    /// Open (or create) the audit file at `path`.
    ///
    /// Existing records are scanned once so that new timestamps continue
    /// after the last one on disk.
    ///
    /// # Errors
    ///
    /// `AuditError::Unavailable` if the file cannot be opened, and
    /// `AuditError::Corrupt` if existing content is not valid JSON lines.
    pub async fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();

        let (last_timestamp, complete_len, torn) = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let (complete, torn) = split_torn_tail(&content);
                let last = parse_records(complete)?.last().map(|r| r.timestamp);
                (last, complete.len() as u64, torn)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => (None, 0, 0),
            Err(e) => return Err(AuditError::Unavailable(e.to_string())),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| AuditError::Unavailable(format!("{}: {}", path.display(), e)))?;

        if torn > 0 {
            tracing::warn!(path = %path.display(), bytes = torn, "Dropping incomplete trailing audit line");
            file.set_len(complete_len)
                .await
                .map_err(|e| AuditError::Unavailable(format!("{}: {}", path.display(), e)))?;
        }

        tracing::info!(path = %path.display(), "Audit log opened");

        Ok(Self {
            path,
            state: Mutex::new(JsonlState {
                file,
                last_timestamp,
            }),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditRecorder for JsonlAuditRecorder {
    async fn record(&self, entry: AuditEntry) -> AuditResult<AuditRecord> {
        let mut state = self.state.lock().await;

        let record = entry.into_record(next_timestamp(Utc::now(), state.last_timestamp));
        let mut line = serde_json::to_string(&record)
            .map_err(|e| AuditError::WriteFailure(e.to_string()))?;
        line.push('\n');

        append_line(&mut state.file, line.as_bytes()).await?;
        state.last_timestamp = Some(record.timestamp);

        tracing::debug!(
            record_id = %record.id,
            identity_id = %record.identity,
            outcome = record.outcome,
            "Audit record appended"
        );

        Ok(record)
    }

    async fn query(&self, since: DateTime<Utc>) -> AuditResult<Vec<AuditRecord>> {
        // Hold the writer lock so a half-written line is never observed.
        let _guard = self.state.lock().await;

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AuditError::ReadFailure(e.to_string()))?;

        let mut records: Vec<AuditRecord> = parse_records(&content)?
            .into_iter()
            .filter(|record| record.is_since(since))
            .collect();
        records.reverse();
        Ok(records)
    }
}
