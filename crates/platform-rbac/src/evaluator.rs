//! Permission evaluation
//!
//! The evaluator answers a single question: does any role attached to this
//! identity carry a permission for exactly this resource and action?
//!
//! Evaluation is a pure read of the current policy state. Nothing is cached,
//! so a decision always reflects every assignment that completed before it.

use crate::error::PolicyResult;
use crate::store::PolicyStore;
use platform_identity::IdentityId;
use std::sync::Arc;
use tracing::instrument;

/// Decides allow/deny from the role→permission relation.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use platform_identity::IdentityId;
/// use platform_rbac::{MemoryPolicyStore, PermissionEvaluator, PolicyStore};
///
/// async fn example() {
///     let store = Arc::new(MemoryPolicyStore::new());
///     let admin = store.get_or_create_role("admin").await.unwrap();
///     let create_users = store
///         .get_or_create_permission("Create Users", "USERS", "CREATE")
///         .await
///         .unwrap();
///     store.assign_permission(admin.id, create_users.id).await.unwrap();
///
///     let user = IdentityId::new();
///     store.assign_role(user, admin.id).await.unwrap();
///
///     let evaluator = PermissionEvaluator::new(store);
///     assert!(evaluator.evaluate(user, "USERS", "CREATE").await.unwrap());
/// }
/// ```
#[derive(Clone)]
pub struct PermissionEvaluator {
    store: Arc<dyn PolicyStore>,
}

impl std::fmt::Debug for PermissionEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionEvaluator").finish_non_exhaustive()
    }
}

impl PermissionEvaluator {
    /// Create an evaluator reading from the given policy store.
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// The policy store this evaluator reads from.
    pub fn store(&self) -> &Arc<dyn PolicyStore> {
        &self.store
    }

    /// Check whether `identity` may perform `action` on `resource`.
    ///
    /// Roles are visited in no particular order and the search stops at the
    /// first matching permission. Tags are compared exactly; an identity with
    /// no roles is never granted anything.
    ///
    /// # Arguments
    ///
    /// * `identity` - The identity being checked
    /// * `resource` - The resource tag
    /// * `action` - The action tag
    ///
    /// # Returns
    ///
    /// `true` if some attached role grants the pair, `false` otherwise
    #[instrument(skip(self), level = "debug")]
    pub async fn evaluate(
        &self,
        identity: IdentityId,
        resource: &str,
        action: &str,
    ) -> PolicyResult<bool> {
        for role in self.store.roles_of(identity).await? {
            let permissions = self.store.permissions_of(role.id).await?;
            if permissions.iter().any(|p| p.grants(resource, action)) {
                tracing::debug!(role = %role.name, "Permission matched");
                return Ok(true);
            }
        }

        Ok(false)
    }
}
