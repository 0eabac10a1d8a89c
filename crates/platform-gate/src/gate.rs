//! The access-control gate.
//!
//! Request handlers hold an `AccessGate` and call [`AccessGate::enforce`]
//! before doing any guarded work. Every call runs the same steps in the same
//! order:
//!
//! 1. An anonymous subject yields `Decision::Unauthenticated` and nothing is
//!    recorded.
//! 2. The evaluator decides against the current policy state.
//! 3. The outcome is written to the audit recorder, allowed or denied.
//! 4. Only then is the decision returned.
//!
//! If step 3 fails the call fails with `GateError::AuditWriteFailure` and no
//! decision is returned at all.

use crate::decision::Decision;
use crate::error::{GateError, GateResult};
use crate::retry::{with_retry_if, RetryPolicy};
use platform_audit::{AuditEntry, AuditError, AuditRecorder};
use platform_identity::Subject;
use platform_rbac::{PermissionEvaluator, PolicyStore};
use std::sync::Arc;
use tracing::instrument;

/// Enforcement wrapper combining the evaluator and the audit recorder.
#[derive(Clone)]
pub struct AccessGate {
    evaluator: PermissionEvaluator,
    recorder: Arc<dyn AuditRecorder>,
    audit_retry: RetryPolicy,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("audit_retry", &self.audit_retry)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    /// Create a gate over the given policy store and audit recorder.
    ///
    /// Audit writes use the default retry policy.
    pub fn new(policy: Arc<dyn PolicyStore>, recorder: Arc<dyn AuditRecorder>) -> Self {
        Self {
            evaluator: PermissionEvaluator::new(policy),
            recorder,
            audit_retry: RetryPolicy::default(),
        }
    }

    /// Set the retry policy for transient audit write failures.
    pub fn with_audit_retry(mut self, policy: RetryPolicy) -> Self {
        self.audit_retry = policy;
        self
    }

    /// The evaluator used by this gate.
    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    /// The audit recorder used by this gate.
    pub fn recorder(&self) -> &Arc<dyn AuditRecorder> {
        &self.recorder
    }

    /// Decide whether `subject` may perform `action` on `resource`, and
    /// record the decision.
    ///
    /// # Arguments
    ///
    /// * `subject` - The caller, as supplied by the session layer
    /// * `resource` - The resource tag
    /// * `action` - The action tag
    ///
    /// # Returns
    ///
    /// The decision, once its audit record is stored
    ///
    /// # Errors
    ///
    /// `GateError::AuditWriteFailure` when the audit record could not be
    /// written, and `GateError::Policy` when policy state could not be read.
    #[instrument(skip(self), fields(identity_id = tracing::field::Empty))]
    pub async fn enforce(
        &self,
        subject: Subject,
        resource: &str,
        action: &str,
    ) -> GateResult<Decision> {
        let Some(identity) = subject.identity() else {
            tracing::debug!("Anonymous access rejected");
            return Ok(Decision::Unauthenticated);
        };
        tracing::Span::current().record("identity_id", tracing::field::display(identity));

        let has_permission = self.evaluator.evaluate(identity, resource, action).await?;

        let entry = AuditEntry::new(identity, resource, action, has_permission);
        let recorder = self.recorder.clone();
        with_retry_if(
            &self.audit_retry,
            || {
                let recorder = recorder.clone();
                let entry = entry.clone();
                async move { recorder.record(entry).await }
            },
            AuditError::is_transient,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, outcome = has_permission, "Audit write failed, withholding decision");
            GateError::AuditWriteFailure(e)
        })?;

        if !has_permission {
            tracing::info!("Permission denied");
            return Ok(Decision::deny());
        }

        tracing::debug!("Access granted");
        Ok(Decision::Allow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_audit::MemoryAuditRecorder;
    use platform_identity::IdentityId;
    use platform_rbac::{actions, resources, roles, MemoryPolicyStore};

    struct Fixture {
        policy: Arc<MemoryPolicyStore>,
        recorder: Arc<MemoryAuditRecorder>,
        gate: AccessGate,
    }

    fn fixture() -> Fixture {
        let policy = Arc::new(MemoryPolicyStore::new());
        let recorder = Arc::new(MemoryAuditRecorder::new());
        let gate = AccessGate::new(policy.clone(), recorder.clone());
        Fixture {
            policy,
            recorder,
            gate,
        }
    }

    #[tokio::test]
    async fn test_anonymous_is_unauthenticated_without_audit() {
        let f = fixture();

        let decision = f
            .gate
            .enforce(Subject::Anonymous, resources::USERS, actions::CREATE)
            .await
            .unwrap();

        assert_eq!(decision, Decision::Unauthenticated);
        assert!(f.recorder.is_empty().await);
    }

    #[tokio::test]
    async fn test_allow_is_audited() {
        let f = fixture();
        let admin = f.policy.get_or_create_role(roles::ADMIN).await.unwrap();
        let perm = f
            .policy
            .get_or_create_permission("Create Users", resources::USERS, actions::CREATE)
            .await
            .unwrap();
        f.policy.assign_permission(admin.id, perm.id).await.unwrap();
        let identity = IdentityId::new();
        f.policy.assign_role(identity, admin.id).await.unwrap();

        let decision = f
            .gate
            .enforce(identity.into(), resources::USERS, actions::CREATE)
            .await
            .unwrap();

        assert_eq!(decision, Decision::Allow);
        let records = f.recorder.query(chrono::DateTime::<chrono::Utc>::MIN_UTC).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].outcome);
        assert_eq!(records[0].identity, identity);
        assert_eq!(records[0].resource, resources::USERS);
        assert_eq!(records[0].action, actions::CREATE);
    }

    #[tokio::test]
    async fn test_deny_is_audited() {
        let f = fixture();
        let identity = IdentityId::new();

        let decision = f
            .gate
            .enforce(identity.into(), resources::AUDIT, actions::READ)
            .await
            .unwrap();

        assert_eq!(decision, Decision::Deny("Permission denied".to_string()));
        let stats = f.recorder.stats().await;
        assert_eq!(stats.records_written, 1);
        assert_eq!(stats.denied, 1);
    }
}
