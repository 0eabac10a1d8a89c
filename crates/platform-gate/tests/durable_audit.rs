//! Access decisions recorded to a JSON-lines audit log.
//!
//! The log is the only state that survives a restart here, so each test
//! reopens it to check what was actually persisted.

use platform_audit::{AuditRecorder, JsonlAuditRecorder};
use platform_gate::{seed, AccessConfig, AccessService, Decision};
use platform_identity::{MemoryIdentityDirectory, NewIdentity};
use platform_rbac::{actions, resources, roles, MemoryPolicyStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Build a seeded service whose recorder writes to `dir/audit.jsonl`.
async fn durable_service(dir: &TempDir) -> (AccessService, platform_identity::Identity) {
    let config = AccessConfig {
        audit_log_path: Some(dir.path().join("audit.jsonl")),
        ..AccessConfig::default()
    };
    let policy = Arc::new(MemoryPolicyStore::new());
    let directory = Arc::new(MemoryIdentityDirectory::new());
    let admin = seed::run(policy.as_ref(), directory.as_ref(), &config.admin)
        .await
        .unwrap()
        .admin_created
        .unwrap();

    let recorder = config.open_audit_recorder().await.unwrap();
    let service = AccessService::new(policy, directory, recorder, config).unwrap();
    (service, admin)
}

#[tokio::test]
async fn test_decisions_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let (service, admin) = durable_service(&dir).await;

    let staff = service
        .create_identity(
            admin.id.into(),
            NewIdentity::new("judy", "judy@example.com").with_role(roles::STAFF),
        )
        .await
        .unwrap()
        .identity;
    let decision = service
        .validate_access(staff.id.into(), resources::AUDIT, actions::READ)
        .await
        .unwrap();
    assert_eq!(decision, Decision::deny());

    let reopened = JsonlAuditRecorder::open(dir.path().join("audit.jsonl"))
        .await
        .unwrap();
    let records = reopened
        .query(chrono::DateTime::<chrono::Utc>::MIN_UTC)
        .await
        .unwrap();

    // USERS:CREATE by the admin, then AUDIT:READ by the staff identity
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].identity, staff.id);
    assert_eq!(records[0].resource, resources::AUDIT);
    assert!(!records[0].outcome);
    assert_eq!(records[1].identity, admin.id);
    assert!(records[1].outcome);
}

#[tokio::test]
async fn test_audit_logs_read_from_file() {
    let dir = TempDir::new().unwrap();
    let (service, admin) = durable_service(&dir).await;

    for _ in 0..3 {
        service
            .validate_access(admin.id.into(), resources::BASIC, actions::ACCESS)
            .await
            .unwrap();
    }

    let logs = service.audit_logs(admin.id.into(), Some(1)).await.unwrap();

    assert_eq!(logs.len(), 4);
    assert_eq!(logs[0].resource, resources::AUDIT);
    assert!(logs.iter().all(|r| r.outcome));
}

#[tokio::test]
async fn test_unwritable_log_path_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let config = AccessConfig {
        audit_log_path: Some(dir.path().join("missing").join("audit.jsonl")),
        ..AccessConfig::default()
    };

    let result = config.open_audit_recorder().await;

    assert!(matches!(result, Err(err) if err.is_transient()));
}
