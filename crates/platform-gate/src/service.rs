//! Administrative access operations.
//!
//! `AccessService` is what request handlers call. Each guarded operation runs
//! the gate first and performs its work only on `Decision::Allow`; the
//! operations that only need an authenticated caller check the subject
//! directly and are not audited.
//!
//! | Operation | Guard |
//! |-----------|-------|
//! | `create_identity` | bootstrap exemption, else `USERS:CREATE` |
//! | `create_role` | `ROLES:MANAGE` |
//! | `create_permission` | `PERMISSIONS:MANAGE` |
//! | `assign_role` | `ROLES:ASSIGN` |
//! | `assign_permission` | `PERMISSIONS:ASSIGN` |
//! | `audit_logs` | `AUDIT:READ` |
//! | `validate_access` | gate, decision returned as-is |
//! | `role_permissions`, `identity_roles`, `list_roles`, `list_permissions` | authenticated |

use crate::config::AccessConfig;
use crate::decision::Decision;
use crate::error::{ServiceError, ServiceResult};
use crate::gate::AccessGate;
use chrono::Duration;
use platform_audit::{AuditRecord, AuditRecorder};
use platform_identity::{Identity, IdentityDirectory, IdentityId, NewIdentity, Subject};
use platform_rbac::{actions, resources};
use platform_rbac::{Permission, PermissionId, PolicyStore, Role, RoleId};
use std::sync::Arc;
use tracing::instrument;

/// Result of a successful identity creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIdentity {
    /// The stored identity.
    pub identity: Identity,

    /// The role attached at creation, if one was requested.
    pub role: Option<Role>,

    /// Whether this was the first identity, created without a permission check.
    pub bootstrap: bool,
}

/// Handler-facing access operations.
#[derive(Clone)]
pub struct AccessService {
    gate: AccessGate,
    policy: Arc<dyn PolicyStore>,
    directory: Arc<dyn IdentityDirectory>,
    recorder: Arc<dyn AuditRecorder>,
    config: AccessConfig,
}

impl std::fmt::Debug for AccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessService")
            .field("gate", &self.gate)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AccessService {
    /// Create a service over the given stores.
    ///
    /// # Errors
    ///
    /// `ServiceError::ConfigError` if `config` fails validation.
    pub fn new(
        policy: Arc<dyn PolicyStore>,
        directory: Arc<dyn IdentityDirectory>,
        recorder: Arc<dyn AuditRecorder>,
        config: AccessConfig,
    ) -> ServiceResult<Self> {
        config
            .validate()
            .map_err(|e| ServiceError::ConfigError(e.to_string()))?;

        let gate = AccessGate::new(policy.clone(), recorder.clone())
            .with_audit_retry(config.audit_retry.clone());

        Ok(Self {
            gate,
            policy,
            directory,
            recorder,
            config,
        })
    }

    /// The gate guarding this service.
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// The active configuration.
    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    async fn require(&self, subject: Subject, resource: &str, action: &str) -> ServiceResult<()> {
        self.gate.enforce(subject, resource, action).await?.into_result()
    }

    fn require_authenticated(subject: Subject) -> ServiceResult<IdentityId> {
        subject.identity().ok_or(ServiceError::Unauthenticated)
    }

    async fn attach_role(
        &self,
        identity: &Identity,
        role_name: Option<&str>,
    ) -> ServiceResult<Option<Role>> {
        let Some(name) = role_name else {
            return Ok(None);
        };
        let role = self.policy.get_or_create_role(name).await?;
        self.policy.assign_role(identity.id, role.id).await?;
        Ok(Some(role))
    }

    /// Create an identity, optionally attaching a role by name.
    ///
    /// While the directory is empty the first creation proceeds without any
    /// permission check and without an audit record. The exemption is decided
    /// by the directory's atomic create-if-empty step, so of several
    /// concurrent first creations exactly one is exempt; the others go
    /// through the gate like any later creation.
    #[instrument(skip(self, new), fields(username = %new.username))]
    pub async fn create_identity(
        &self,
        subject: Subject,
        new: NewIdentity,
    ) -> ServiceResult<CreatedIdentity> {
        if matches!(new.role.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(ServiceError::Validation("role name must not be empty".to_string()));
        }

        if let Some(identity) = self.directory.create_first(new.clone()).await? {
            tracing::info!(identity_id = %identity.id, "Bootstrap identity created");
            let role = self.attach_role(&identity, new.role.as_deref()).await?;
            return Ok(CreatedIdentity {
                identity,
                role,
                bootstrap: true,
            });
        }

        self.require(subject, resources::USERS, actions::CREATE).await?;

        let identity = self.directory.create(new.clone()).await?;
        let role = self.attach_role(&identity, new.role.as_deref()).await?;
        Ok(CreatedIdentity {
            identity,
            role,
            bootstrap: false,
        })
    }

    /// Create a role, or return the existing one with this name.
    #[instrument(skip(self))]
    pub async fn create_role(&self, subject: Subject, name: &str) -> ServiceResult<Role> {
        self.require(subject, resources::ROLES, actions::MANAGE).await?;
        Ok(self.policy.get_or_create_role(name).await?)
    }

    /// Create a permission, or return the existing one with this name.
    #[instrument(skip(self))]
    pub async fn create_permission(
        &self,
        subject: Subject,
        name: &str,
        resource: &str,
        action: &str,
    ) -> ServiceResult<Permission> {
        self.require(subject, resources::PERMISSIONS, actions::MANAGE).await?;
        Ok(self
            .policy
            .get_or_create_permission(name, resource, action)
            .await?)
    }

    /// Attach a role to an identity.
    ///
    /// # Errors
    ///
    /// `ServiceError::NotFound` naming the identity or role that does not exist.
    #[instrument(skip(self))]
    pub async fn assign_role(
        &self,
        subject: Subject,
        identity_id: IdentityId,
        role_id: RoleId,
    ) -> ServiceResult<(Identity, Role)> {
        self.require(subject, resources::ROLES, actions::ASSIGN).await?;

        let identity = self.directory.get(identity_id).await?;
        let role = self.policy.role(role_id).await?;
        self.policy.assign_role(identity.id, role.id).await?;

        tracing::info!(username = %identity.username, role = %role.name, "Role assigned to identity");
        Ok((identity, role))
    }

    /// Attach a permission to a role.
    ///
    /// # Errors
    ///
    /// `ServiceError::NotFound` naming the role or permission that does not exist.
    #[instrument(skip(self))]
    pub async fn assign_permission(
        &self,
        subject: Subject,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> ServiceResult<(Role, Permission)> {
        self.require(subject, resources::PERMISSIONS, actions::ASSIGN).await?;

        let role = self.policy.role(role_id).await?;
        let permission = self.policy.permission(permission_id).await?;
        self.policy.assign_permission(role.id, permission.id).await?;

        tracing::info!(role = %role.name, permission = %permission.name, "Permission assigned to role");
        Ok((role, permission))
    }

    /// Permissions attached to a role.
    pub async fn role_permissions(
        &self,
        subject: Subject,
        role_id: RoleId,
    ) -> ServiceResult<Vec<Permission>> {
        Self::require_authenticated(subject)?;
        Ok(self.policy.permissions_of(role_id).await?)
    }

    /// Roles attached to an identity, or to the caller when `identity_id` is `None`.
    pub async fn identity_roles(
        &self,
        subject: Subject,
        identity_id: Option<IdentityId>,
    ) -> ServiceResult<Vec<Role>> {
        let caller = Self::require_authenticated(subject)?;
        let target = match identity_id {
            Some(id) => self.directory.get(id).await?.id,
            None => caller,
        };
        Ok(self.policy.roles_of(target).await?)
    }

    /// All roles.
    pub async fn list_roles(&self, subject: Subject) -> ServiceResult<Vec<Role>> {
        Self::require_authenticated(subject)?;
        Ok(self.policy.list_roles().await?)
    }

    /// All permissions.
    pub async fn list_permissions(&self, subject: Subject) -> ServiceResult<Vec<Permission>> {
        Self::require_authenticated(subject)?;
        Ok(self.policy.list_permissions().await?)
    }

    /// Evaluate and record an access check, returning the decision itself.
    ///
    /// A denial is a successful answer here, not an error; only an anonymous
    /// caller is rejected.
    #[instrument(skip(self))]
    pub async fn validate_access(
        &self,
        subject: Subject,
        resource: &str,
        action: &str,
    ) -> ServiceResult<Decision> {
        match self.gate.enforce(subject, resource, action).await? {
            Decision::Unauthenticated => Err(ServiceError::Unauthenticated),
            decision => Ok(decision),
        }
    }

    /// Audit records from the last `hours` hours, newest first.
    ///
    /// Uses the configured window when `hours` is `None`.
    ///
    /// # Errors
    ///
    /// `ServiceError::Validation` when `hours` is not positive or the window
    /// cannot be represented.
    #[instrument(skip(self))]
    pub async fn audit_logs(
        &self,
        subject: Subject,
        hours: Option<i64>,
    ) -> ServiceResult<Vec<AuditRecord>> {
        self.require(subject, resources::AUDIT, actions::READ).await?;

        let window = match hours {
            Some(h) if h <= 0 => {
                return Err(ServiceError::Validation(
                    "hours must be a positive number".to_string(),
                ))
            }
            Some(h) => Duration::try_hours(h)
                .ok_or_else(|| ServiceError::Validation(format!("hours out of range: {h}")))?,
            None => self
                .config
                .audit_window()
                .map_err(|e| ServiceError::ConfigError(e.to_string()))?,
        };
        let since = self.recorder.window_start(window).ok_or_else(|| {
            ServiceError::Validation("audit window reaches past the earliest supported time".to_string())
        })?;

        Ok(self.recorder.query(since).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_audit::MemoryAuditRecorder;
    use platform_identity::MemoryIdentityDirectory;
    use platform_rbac::{roles, MemoryPolicyStore};

    fn service() -> (AccessService, Arc<MemoryAuditRecorder>) {
        let recorder = Arc::new(MemoryAuditRecorder::new());
        let service = AccessService::new(
            Arc::new(MemoryPolicyStore::new()),
            Arc::new(MemoryIdentityDirectory::new()),
            recorder.clone(),
            AccessConfig::default(),
        )
        .unwrap();
        (service, recorder)
    }

    #[tokio::test]
    async fn test_first_identity_is_bootstrapped() {
        let (service, recorder) = service();

        let created = service
            .create_identity(
                Subject::Anonymous,
                NewIdentity::new("root", "root@example.com").with_role(roles::ADMIN),
            )
            .await
            .unwrap();

        assert!(created.bootstrap);
        assert_eq!(created.role.map(|r| r.name), Some(roles::ADMIN.to_string()));
        assert!(recorder.is_empty().await);
    }

    #[tokio::test]
    async fn test_second_identity_requires_authentication() {
        let (service, recorder) = service();
        service
            .create_identity(Subject::Anonymous, NewIdentity::new("root", "r@example.com"))
            .await
            .unwrap();

        let err = service
            .create_identity(Subject::Anonymous, NewIdentity::new("other", "o@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Unauthenticated));
        assert!(recorder.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_role_name_rejected() {
        let (service, _) = service();
        let err = service
            .create_identity(
                Subject::Anonymous,
                NewIdentity::new("root", "r@example.com").with_role(" "),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_read_operations_need_identity() {
        let (service, _) = service();

        assert!(matches!(
            service.list_roles(Subject::Anonymous).await,
            Err(ServiceError::Unauthenticated)
        ));
        assert!(matches!(
            service.identity_roles(Subject::Anonymous, None).await,
            Err(ServiceError::Unauthenticated)
        ));
        assert!(matches!(
            service.role_permissions(Subject::Anonymous, RoleId::new()).await,
            Err(ServiceError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_validate_access_returns_denial() {
        let (service, recorder) = service();
        let created = service
            .create_identity(Subject::Anonymous, NewIdentity::new("root", "r@example.com"))
            .await
            .unwrap();

        let decision = service
            .validate_access(created.identity.id.into(), "USERS", "CREATE")
            .await
            .unwrap();

        assert_eq!(decision.message(), "Permission denied");
        assert_eq!(recorder.len().await, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AccessConfig::default();
        config.audit_window_hours = -1;

        let result = AccessService::new(
            Arc::new(MemoryPolicyStore::new()),
            Arc::new(MemoryIdentityDirectory::new()),
            Arc::new(MemoryAuditRecorder::new()),
            config,
        );
        assert!(matches!(result, Err(ServiceError::ConfigError(_))));
    }
}
