//! Storage contract for account records.
//!
//! The service layer only ever talks to the [`AccountStore`] trait; the
//! engine behind it is interchangeable. This crate bundles one backend,
//! [`memory::MemoryStore`], which keeps records in process memory.

pub mod memory;

use async_trait::async_trait;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::api::models::accounts::{Account, AccountQuery, Metadata};

pub use memory::MemoryStore;

/// Unified error type for storage operations that application code can handle
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record exists under the given name
    #[error("account not found")]
    NotFound,

    /// A record already exists under the given name
    #[error("account {name} already exists")]
    Conflict { name: String },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type alias for storage operation results
pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable record store keyed by unique account name.
///
/// All methods take shared references; implementations handle their own
/// interior synchronization. Listing order is implementation-defined but
/// must be stable across calls.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account. Fails with [`StoreError::Conflict`] if the
    /// name is already taken.
    async fn create(&self, entity: &Account) -> Result<()>;

    /// Replace an existing account. Fails with [`StoreError::NotFound`] if
    /// no record exists under the entity's name.
    async fn update(&self, entity: &Account) -> Result<()>;

    /// Remove an account by name.
    async fn delete(&self, name: &str) -> Result<()>;

    /// Fetch an account by name.
    async fn get(&self, name: &str) -> Result<Account>;

    /// List accounts matching the query.
    async fn list(&self, query: &AccountQuery) -> Result<Vec<Account>>;

    /// List only the metadata of accounts matching the query.
    async fn metadata_list(&self, query: &AccountQuery) -> Result<Vec<Metadata>>;

    /// List raw serialized metadata of accounts matching the query.
    async fn raw_metadata_list(&self, query: &AccountQuery) -> Result<Vec<Box<RawValue>>>;
}
