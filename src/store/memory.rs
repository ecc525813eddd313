//! In-memory storage backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::value::RawValue;
use tokio::sync::RwLock;
use tracing::instrument;

use super::{AccountStore, Result, StoreError};
use crate::api::models::accounts::{Account, AccountQuery, Metadata};

/// Account store backed by a name-ordered map behind an async lock.
///
/// Listings are lexicographic by name, so paging with `skip`/`limit` is
/// deterministic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<BTreeMap<String, Account>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(query: &AccountQuery, name: &str) -> bool {
        query.prefix.as_deref().is_none_or(|prefix| name.starts_with(prefix))
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    #[instrument(skip(self, entity), fields(name = %entity.metadata.name), err)]
    async fn create(&self, entity: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&entity.metadata.name) {
            return Err(StoreError::Conflict {
                name: entity.metadata.name.clone(),
            });
        }
        accounts.insert(entity.metadata.name.clone(), entity.clone());
        Ok(())
    }

    #[instrument(skip(self, entity), fields(name = %entity.metadata.name), err)]
    async fn update(&self, entity: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&entity.metadata.name) {
            Some(existing) => {
                *existing = entity.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, name: &str) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        match accounts.remove(name) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    #[instrument(skip(self), err)]
    async fn get(&self, name: &str) -> Result<Account> {
        let accounts = self.accounts.read().await;
        accounts.get(name).cloned().ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self, query), fields(skip = query.skip, limit = ?query.limit), err)]
    async fn list(&self, query: &AccountQuery) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .filter(|account| Self::matches(query, &account.metadata.name))
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    #[instrument(skip(self, query), fields(skip = query.skip, limit = ?query.limit), err)]
    async fn metadata_list(&self, query: &AccountQuery) -> Result<Vec<Metadata>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .filter(|account| Self::matches(query, &account.metadata.name))
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|account| account.metadata.clone())
            .collect())
    }

    #[instrument(skip(self, query), err)]
    async fn raw_metadata_list(&self, query: &AccountQuery) -> Result<Vec<Box<RawValue>>> {
        let metadata = self.metadata_list(query).await?;
        metadata
            .into_iter()
            .map(|entry| {
                let json = serde_json::to_string(&entry).map_err(anyhow::Error::from)?;
                RawValue::from_string(json).map_err(|e| StoreError::Other(e.into()))
            })
            .collect()
    }
}
