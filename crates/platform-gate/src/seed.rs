//! Initial RBAC setup.
//!
//! [`run`] makes sure the built-in roles and permissions exist, wires the
//! default role→permission associations and provisions the admin identity.
//! Every step is get-or-create or idempotent assignment, so running it again
//! changes nothing.

use crate::config::AdminAccount;
use crate::error::ServiceResult;
use platform_identity::{Identity, IdentityDirectory, IdentityError, NewIdentity};
use platform_rbac::{actions, resources, roles};
use platform_rbac::{Permission, PolicyStore, Role};
use tracing::instrument;

/// Built-in permissions as `(name, resource, action)`.
pub const DEFAULT_PERMISSIONS: [(&str, &str, &str); 8] = [
    ("Create Users", resources::USERS, actions::CREATE),
    ("Manage Roles", resources::ROLES, actions::MANAGE),
    ("Manage Permissions", resources::PERMISSIONS, actions::MANAGE),
    ("Assign Permissions", resources::PERMISSIONS, actions::ASSIGN),
    ("View Audit Logs", resources::AUDIT, actions::READ),
    ("Assign Roles", resources::ROLES, actions::ASSIGN),
    ("View Users", resources::USERS, actions::READ),
    ("Basic Access", resources::BASIC, actions::ACCESS),
];

/// What a seed run ensured.
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// The built-in roles, most privileged first.
    pub roles: Vec<Role>,

    /// The built-in permissions, in [`DEFAULT_PERMISSIONS`] order.
    pub permissions: Vec<Permission>,

    /// The admin identity, if this run created it.
    pub admin_created: Option<Identity>,
}

/// Roles that receive a permission on `resource` by default.
fn default_grantees(resource: &str) -> &'static [&'static str] {
    match resource {
        resources::ROLES | resources::USERS => &[roles::ADMIN, roles::SUPERVISOR],
        resources::BASIC => &[roles::ADMIN, roles::SUPERVISOR, roles::STAFF],
        _ => &[roles::ADMIN],
    }
}

/// Ensure the built-in RBAC structure and the admin identity exist.
///
/// - Roles `admin`, `supervisor` and `staff`
/// - The permissions in [`DEFAULT_PERMISSIONS`]
/// - `admin` holds every built-in permission, `supervisor` holds the `ROLES`,
///   `USERS` and `BASIC` ones, `staff` holds `BASIC`
/// - An identity named after `admin.username` with the `admin` role, created
///   only if no identity has that username
///
/// # Errors
///
/// Any policy or directory failure; a permission name already bound to a
/// different resource/action surfaces as `ServiceError::Conflict`.
#[instrument(skip(policy, directory))]
pub async fn run(
    policy: &dyn PolicyStore,
    directory: &dyn IdentityDirectory,
    admin: &AdminAccount,
) -> ServiceResult<SeedReport> {
    let mut built_in = Vec::with_capacity(roles::BUILT_IN.len());
    for name in roles::BUILT_IN {
        built_in.push(policy.get_or_create_role(name).await?);
    }

    let mut permissions = Vec::with_capacity(DEFAULT_PERMISSIONS.len());
    for (name, resource, action) in DEFAULT_PERMISSIONS {
        let permission = policy.get_or_create_permission(name, resource, action).await?;

        for grantee in default_grantees(resource) {
            if let Some(role) = built_in.iter().find(|r| r.name == *grantee) {
                policy.assign_permission(role.id, permission.id).await?;
            }
        }
        permissions.push(permission);
    }

    let admin_created = provision_admin(policy, directory, admin, &built_in).await?;

    tracing::info!(
        roles = built_in.len(),
        permissions = permissions.len(),
        admin_created = admin_created.is_some(),
        "RBAC structure set up"
    );

    Ok(SeedReport {
        roles: built_in,
        permissions,
        admin_created,
    })
}

async fn provision_admin(
    policy: &dyn PolicyStore,
    directory: &dyn IdentityDirectory,
    admin: &AdminAccount,
    built_in: &[Role],
) -> ServiceResult<Option<Identity>> {
    if directory.find_by_username(&admin.username).await?.is_some() {
        return Ok(None);
    }

    let identity = match directory
        .create(NewIdentity::new(admin.username.clone(), admin.email.clone()))
        .await
    {
        Ok(identity) => identity,
        // Another seed run won the race.
        Err(IdentityError::UsernameTaken(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if let Some(role) = built_in.iter().find(|r| r.name == roles::ADMIN) {
        policy.assign_role(identity.id, role.id).await?;
    }

    tracing::info!(identity_id = %identity.id, username = %identity.username, "Created admin identity");
    Ok(Some(identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_identity::MemoryIdentityDirectory;
    use platform_rbac::{MemoryPolicyStore, PermissionEvaluator};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let policy = MemoryPolicyStore::new();
        let directory = MemoryIdentityDirectory::new();
        let admin = AdminAccount::default();

        let first = run(&policy, &directory, &admin).await.unwrap();
        let second = run(&policy, &directory, &admin).await.unwrap();

        assert!(first.admin_created.is_some());
        assert!(second.admin_created.is_none());
        assert_eq!(
            first.roles.iter().map(|r| r.id).collect::<Vec<_>>(),
            second.roles.iter().map(|r| r.id).collect::<Vec<_>>()
        );
        assert_eq!(policy.list_roles().await.unwrap().len(), 3);
        assert_eq!(policy.list_permissions().await.unwrap().len(), 8);
        assert_eq!(directory.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_default_associations() {
        let policy = MemoryPolicyStore::new();
        let directory = MemoryIdentityDirectory::new();
        run(&policy, &directory, &AdminAccount::default()).await.unwrap();

        let count = |name: &'static str| {
            let policy = policy.clone();
            async move {
                let role = policy.role_by_name(name).await.unwrap();
                policy.permissions_of(role.id).await.unwrap().len()
            }
        };

        assert_eq!(count(roles::ADMIN).await, 8);
        // Manage Roles, Assign Roles, Create Users, View Users, Basic Access
        assert_eq!(count(roles::SUPERVISOR).await, 5);
        assert_eq!(count(roles::STAFF).await, 1);
    }

    #[tokio::test]
    async fn test_seeded_admin_holds_admin_permissions() {
        let policy = Arc::new(MemoryPolicyStore::new());
        let directory = MemoryIdentityDirectory::new();
        let report = run(policy.as_ref(), &directory, &AdminAccount::default())
            .await
            .unwrap();
        let admin = report.admin_created.unwrap();

        let evaluator = PermissionEvaluator::new(policy);
        for (_, resource, action) in DEFAULT_PERMISSIONS {
            assert!(evaluator.evaluate(admin.id, resource, action).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_existing_admin_username_is_left_alone() {
        let policy = MemoryPolicyStore::new();
        let directory = MemoryIdentityDirectory::new();
        let existing = directory
            .create(NewIdentity::new("admin", "someone@example.com"))
            .await
            .unwrap();

        let report = run(&policy, &directory, &AdminAccount::default()).await.unwrap();

        assert!(report.admin_created.is_none());
        assert!(policy.roles_of(existing.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conflicting_permission_name_fails() {
        let policy = MemoryPolicyStore::new();
        policy
            .get_or_create_permission("Create Users", resources::ROLES, actions::CREATE)
            .await
            .unwrap();

        let err = run(&policy, &MemoryIdentityDirectory::new(), &AdminAccount::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFLICT");
    }
}
