//! Policy store
//!
//! This module provides the policy store abstraction, which holds the
//! role→permission and identity→role relations, and an in-memory
//! implementation.
//!
//! Every mutation is atomic per call. The in-memory store performs its
//! compare-and-create steps under a single write lock, so two callers racing
//! to get-or-create the same name observe one record.

use crate::error::{PolicyError, PolicyResult};
use crate::permissions::{Permission, PermissionId};
use crate::roles::{Role, RoleId};
use async_trait::async_trait;
use platform_identity::IdentityId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Policy store trait for role and permission management.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Roles currently attached to an identity.
    ///
    /// Returns an empty list for identities with no roles, including
    /// identities the store has never seen.
    async fn roles_of(&self, identity: IdentityId) -> PolicyResult<Vec<Role>>;

    /// Permissions directly attached to a role.
    async fn permissions_of(&self, role: RoleId) -> PolicyResult<Vec<Permission>>;

    /// Attach a role to an identity.
    ///
    /// Attaching an already attached role is a no-op.
    async fn assign_role(&self, identity: IdentityId, role: RoleId) -> PolicyResult<()>;

    /// Attach a permission to a role.
    ///
    /// Attaching an already attached permission is a no-op.
    async fn assign_permission(&self, role: RoleId, permission: PermissionId) -> PolicyResult<()>;

    /// Return the role with this name, creating it if absent.
    async fn get_or_create_role(&self, name: &str) -> PolicyResult<Role>;

    /// Return the permission with this name, creating it if absent.
    ///
    /// Fails with `PolicyError::Conflict` when the name already exists with a
    /// different resource or action.
    async fn get_or_create_permission(
        &self,
        name: &str,
        resource: &str,
        action: &str,
    ) -> PolicyResult<Permission>;

    /// Look up a role by id.
    async fn role(&self, id: RoleId) -> PolicyResult<Role>;

    /// Look up a role by name.
    async fn role_by_name(&self, name: &str) -> PolicyResult<Role>;

    /// Look up a permission by id.
    async fn permission(&self, id: PermissionId) -> PolicyResult<Permission>;

    /// All roles, in creation order.
    async fn list_roles(&self) -> PolicyResult<Vec<Role>>;

    /// All permissions, in creation order.
    async fn list_permissions(&self) -> PolicyResult<Vec<Permission>>;
}

fn validate_name(kind: &str, name: &str) -> PolicyResult<()> {
    if name.trim().is_empty() {
        return Err(PolicyError::InvalidName(format!("{kind} name must not be empty")));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct PolicyState {
    roles: HashMap<RoleId, Role>,
    role_names: HashMap<String, RoleId>,
    permissions: HashMap<PermissionId, Permission>,
    permission_names: HashMap<String, PermissionId>,
    role_permissions: HashMap<RoleId, Vec<PermissionId>>,
    identity_roles: HashMap<IdentityId, Vec<RoleId>>,
}

impl PolicyState {
    fn role(&self, id: RoleId) -> PolicyResult<&Role> {
        self.roles.get(&id).ok_or_else(|| PolicyError::not_found("role", id))
    }

    fn permission(&self, id: PermissionId) -> PolicyResult<&Permission> {
        self.permissions
            .get(&id)
            .ok_or_else(|| PolicyError::not_found("permission", id))
    }
}

/// In-memory policy store.
///
/// This is suitable for single-process applications and testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicyStore {
    state: Arc<RwLock<PolicyState>>,
}

impl MemoryPolicyStore {
    /// Create an empty policy store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn roles_of(&self, identity: IdentityId) -> PolicyResult<Vec<Role>> {
        let state = self.state.read().await;
        let Some(role_ids) = state.identity_roles.get(&identity) else {
            return Ok(Vec::new());
        };

        role_ids
            .iter()
            .map(|id| state.role(*id).cloned())
            .collect()
    }

    async fn permissions_of(&self, role: RoleId) -> PolicyResult<Vec<Permission>> {
        let state = self.state.read().await;
        state.role(role)?;

        let Some(permission_ids) = state.role_permissions.get(&role) else {
            return Ok(Vec::new());
        };

        permission_ids
            .iter()
            .map(|id| state.permission(*id).cloned())
            .collect()
    }

    async fn assign_role(&self, identity: IdentityId, role: RoleId) -> PolicyResult<()> {
        let mut state = self.state.write().await;
        state.role(role)?;

        let roles = state.identity_roles.entry(identity).or_default();
        if !roles.contains(&role) {
            roles.push(role);
            tracing::debug!(identity_id = %identity, role_id = %role, "Role assigned");
        }
        Ok(())
    }

    async fn assign_permission(&self, role: RoleId, permission: PermissionId) -> PolicyResult<()> {
        let mut state = self.state.write().await;
        state.role(role)?;
        state.permission(permission)?;

        let permissions = state.role_permissions.entry(role).or_default();
        if !permissions.contains(&permission) {
            permissions.push(permission);
            tracing::debug!(role_id = %role, permission_id = %permission, "Permission assigned");
        }
        Ok(())
    }

    async fn get_or_create_role(&self, name: &str) -> PolicyResult<Role> {
        validate_name("role", name)?;
        let mut state = self.state.write().await;

        if let Some(id) = state.role_names.get(name) {
            return state.role(*id).cloned();
        }

        let role = Role::new(name);
        state.role_names.insert(role.name.clone(), role.id);
        state.roles.insert(role.id, role.clone());
        tracing::debug!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    async fn get_or_create_permission(
        &self,
        name: &str,
        resource: &str,
        action: &str,
    ) -> PolicyResult<Permission> {
        validate_name("permission", name)?;
        let mut state = self.state.write().await;

        if let Some(id) = state.permission_names.get(name) {
            let existing = state.permission(*id)?;
            if !existing.grants(resource, action) {
                return Err(PolicyError::Conflict {
                    name: name.to_string(),
                });
            }
            return Ok(existing.clone());
        }

        let permission = Permission::new(name, resource, action);
        state
            .permission_names
            .insert(permission.name.clone(), permission.id);
        state.permissions.insert(permission.id, permission.clone());
        tracing::debug!(permission = %permission, "Permission created");
        Ok(permission)
    }

    async fn role(&self, id: RoleId) -> PolicyResult<Role> {
        self.state.read().await.role(id).cloned()
    }

    async fn role_by_name(&self, name: &str) -> PolicyResult<Role> {
        let state = self.state.read().await;
        let id = state
            .role_names
            .get(name)
            .ok_or_else(|| PolicyError::not_found("role", name))?;
        state.role(*id).cloned()
    }

    async fn permission(&self, id: PermissionId) -> PolicyResult<Permission> {
        self.state.read().await.permission(id).cloned()
    }

    async fn list_roles(&self) -> PolicyResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.state.read().await.roles.values().cloned().collect();
        roles.sort_by_key(|role| role.id);
        Ok(roles)
    }

    async fn list_permissions(&self) -> PolicyResult<Vec<Permission>> {
        let mut permissions: Vec<Permission> =
            self.state.read().await.permissions.values().cloned().collect();
        permissions.sort_by_key(|permission| permission.id);
        Ok(permissions)
    }
}
