//! Identity directory
//!
//! This module provides the storage contract for identities and an in-memory
//! implementation. The contract includes `create_first`, the atomic
//! create-if-empty transition that the bootstrap rule relies on.

use crate::error::{IdentityError, IdentityResult};
use crate::identity::{Identity, IdentityId, NewIdentity};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Identity directory trait.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Number of identities currently stored.
    async fn count(&self) -> IdentityResult<usize>;

    /// Look up an identity by id.
    ///
    /// Fails with `IdentityError::NotFound` when no identity has this id.
    async fn get(&self, id: IdentityId) -> IdentityResult<Identity>;

    /// Look up an identity by username.
    async fn find_by_username(&self, username: &str) -> IdentityResult<Option<Identity>>;

    /// Create an identity.
    ///
    /// Fails with `IdentityError::UsernameTaken` when the username is in use.
    async fn create(&self, new: NewIdentity) -> IdentityResult<Identity>;

    /// Create an identity only if the directory is currently empty.
    ///
    /// The count check and the insert happen as one atomic step, so of any
    /// number of concurrent callers at most one receives `Some`.
    async fn create_first(&self, new: NewIdentity) -> IdentityResult<Option<Identity>>;
}

#[derive(Debug, Default)]
struct DirectoryState {
    identities: HashMap<IdentityId, Identity>,
    by_username: HashMap<String, IdentityId>,
}

impl DirectoryState {
    fn insert(&mut self, new: NewIdentity) -> IdentityResult<Identity> {
        if new.username.trim().is_empty() {
            return Err(IdentityError::Invalid("username must not be empty".to_string()));
        }
        if self.by_username.contains_key(&new.username) {
            return Err(IdentityError::UsernameTaken(new.username));
        }

        let identity = new.into_identity();
        self.by_username.insert(identity.username.clone(), identity.id);
        self.identities.insert(identity.id, identity.clone());
        Ok(identity)
    }
}

/// In-memory identity directory.
///
/// Suitable for single-process deployments and testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl MemoryIdentityDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityDirectory for MemoryIdentityDirectory {
    async fn count(&self) -> IdentityResult<usize> {
        Ok(self.state.read().await.identities.len())
    }

    async fn get(&self, id: IdentityId) -> IdentityResult<Identity> {
        self.state
            .read()
            .await
            .identities
            .get(&id)
            .cloned()
            .ok_or_else(|| IdentityError::NotFound(id.to_string()))
    }

    async fn find_by_username(&self, username: &str) -> IdentityResult<Option<Identity>> {
        let state = self.state.read().await;
        Ok(state
            .by_username
            .get(username)
            .and_then(|id| state.identities.get(id))
            .cloned())
    }

    async fn create(&self, new: NewIdentity) -> IdentityResult<Identity> {
        let identity = self.state.write().await.insert(new)?;
        tracing::debug!(identity_id = %identity.id, username = %identity.username, "Identity created");
        Ok(identity)
    }

    async fn create_first(&self, new: NewIdentity) -> IdentityResult<Option<Identity>> {
        let mut state = self.state.write().await;
        if !state.identities.is_empty() {
            return Ok(None);
        }

        let identity = state.insert(new)?;
        tracing::info!(identity_id = %identity.id, username = %identity.username, "First identity created");
        Ok(Some(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let directory = MemoryIdentityDirectory::new();
        let alice = directory
            .create(NewIdentity::new("alice", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(directory.count().await.unwrap(), 1);
        assert_eq!(directory.get(alice.id).await.unwrap(), alice);
        assert_eq!(
            directory.find_by_username("alice").await.unwrap(),
            Some(alice)
        );
        assert!(directory.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let directory = MemoryIdentityDirectory::new();
        directory
            .create(NewIdentity::new("alice", "a@example.com"))
            .await
            .unwrap();

        let err = directory
            .create(NewIdentity::new("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::UsernameTaken(name) if name == "alice"));
    }

    #[tokio::test]
    async fn test_empty_username_rejected() {
        let directory = MemoryIdentityDirectory::new();
        let err = directory
            .create(NewIdentity::new("  ", "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_get_unknown_identity() {
        let directory = MemoryIdentityDirectory::new();
        let err = directory.get(IdentityId::new()).await.unwrap_err();
        assert!(matches!(err, IdentityError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_first_only_when_empty() {
        let directory = MemoryIdentityDirectory::new();

        let first = directory
            .create_first(NewIdentity::new("root", "root@example.com"))
            .await
            .unwrap();
        assert!(first.is_some());

        let second = directory
            .create_first(NewIdentity::new("other", "other@example.com"))
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(directory.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_first_single_winner() {
        let directory = MemoryIdentityDirectory::new();

        let mut tasks = Vec::new();
        for i in 0..16 {
            let directory = directory.clone();
            tasks.push(tokio::spawn(async move {
                directory
                    .create_first(NewIdentity::new(format!("user-{i}"), "u@example.com"))
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap().is_some() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(directory.count().await.unwrap(), 1);
    }
}
