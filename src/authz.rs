//! Authorization cache: derives effective permissions from account data.
//!
//! The service layer only depends on the [`Authorization`] trait; it calls
//! [`Authorization::refresh_permissions`] after every mutation that could
//! change an account's credentials or role linkage. [`PermissionCache`] is
//! the bundled implementation: it rebuilds a snapshot of account metadata
//! from the store and swaps it in atomically, so readers on the request
//! path never take a lock.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::api::models::accounts::AccountQuery;
use crate::store::AccountStore;

#[async_trait]
pub trait Authorization: Send + Sync {
    /// Recompute derived permissions after account or role data changed.
    async fn refresh_permissions(&self) -> anyhow::Result<()>;
}

/// Point-in-time view of the accounts the permission layer derives from.
#[derive(Debug, Default)]
struct PermissionSnapshot {
    /// Account name to the time its record last changed
    accounts: HashMap<String, DateTime<Utc>>,
    built_at: Option<DateTime<Utc>>,
}

/// Store-backed [`Authorization`] implementation.
pub struct PermissionCache {
    store: Arc<dyn AccountStore>,
    snapshot: ArcSwap<PermissionSnapshot>,
}

impl PermissionCache {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self {
            store,
            snapshot: ArcSwap::from_pointee(PermissionSnapshot::default()),
        }
    }

    /// Whether the given account was present at the last refresh.
    pub fn contains(&self, name: &str) -> bool {
        self.snapshot.load().accounts.contains_key(name)
    }

    /// When the current snapshot was built, if a refresh has completed yet.
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.load().built_at
    }

    /// Whether the account's record changed after the given instant,
    /// according to the current snapshot.
    pub fn changed_since(&self, name: &str, instant: DateTime<Utc>) -> bool {
        self.snapshot
            .load()
            .accounts
            .get(name)
            .is_some_and(|updated_at| *updated_at > instant)
    }
}

#[async_trait]
impl Authorization for PermissionCache {
    #[instrument(skip(self), err)]
    async fn refresh_permissions(&self) -> anyhow::Result<()> {
        // Unbounded query: the snapshot must cover every account
        let metadata = self.store.metadata_list(&AccountQuery::default()).await?;

        let snapshot = PermissionSnapshot {
            accounts: metadata.into_iter().map(|entry| (entry.name, entry.updated_at)).collect(),
            built_at: Some(Utc::now()),
        };
        self.snapshot.store(Arc::new(snapshot));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::accounts::{Account, Metadata};
    use crate::store::{MemoryStore, Result as StoreResult, StoreError};
    use serde_json::value::RawValue;

    #[tokio::test]
    async fn test_refresh_builds_snapshot_from_store() {
        let store = Arc::new(MemoryStore::new());
        let mut account = Account::new("alice");
        account.metadata.stamp_created();
        store.create(&account).await.unwrap();

        let cache = PermissionCache::new(store);
        assert!(!cache.contains("alice"));
        assert!(cache.built_at().is_none());

        cache.refresh_permissions().await.unwrap();
        assert!(cache.contains("alice"));
        assert!(!cache.contains("bob"));
        assert!(cache.built_at().is_some());
        assert!(cache.changed_since("alice", DateTime::UNIX_EPOCH));
    }

    /// Store that delegates to a [`MemoryStore`] until switched offline.
    struct FlakyStore {
        inner: MemoryStore,
        offline: std::sync::atomic::AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                offline: std::sync::atomic::AtomicBool::new(false),
            }
        }

        fn go_offline(&self) {
            self.offline.store(true, std::sync::atomic::Ordering::SeqCst);
        }

        fn check(&self) -> StoreResult<()> {
            if self.offline.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(StoreError::Other(anyhow::anyhow!("storage offline")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AccountStore for FlakyStore {
        async fn create(&self, entity: &Account) -> StoreResult<()> {
            self.check()?;
            self.inner.create(entity).await
        }
        async fn update(&self, entity: &Account) -> StoreResult<()> {
            self.check()?;
            self.inner.update(entity).await
        }
        async fn delete(&self, name: &str) -> StoreResult<()> {
            self.check()?;
            self.inner.delete(name).await
        }
        async fn get(&self, name: &str) -> StoreResult<Account> {
            self.check()?;
            self.inner.get(name).await
        }
        async fn list(&self, query: &AccountQuery) -> StoreResult<Vec<Account>> {
            self.check()?;
            self.inner.list(query).await
        }
        async fn metadata_list(&self, query: &AccountQuery) -> StoreResult<Vec<Metadata>> {
            self.check()?;
            self.inner.metadata_list(query).await
        }
        async fn raw_metadata_list(&self, query: &AccountQuery) -> StoreResult<Vec<Box<RawValue>>> {
            self.check()?;
            self.inner.raw_metadata_list(query).await
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let store = Arc::new(FlakyStore::new());
        let mut account = Account::new("alice");
        account.metadata.stamp_created();
        store.create(&account).await.unwrap();

        let cache = PermissionCache::new(store.clone());
        cache.refresh_permissions().await.unwrap();
        let first_build = cache.built_at();
        assert!(cache.contains("alice"));

        store.go_offline();
        assert!(cache.refresh_permissions().await.is_err());

        // The previous snapshot stays in place until a refresh succeeds
        assert_eq!(cache.built_at(), first_build);
        assert!(cache.contains("alice"));
    }
}
