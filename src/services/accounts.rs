//! Account lifecycle orchestration.
//!
//! Sits between the HTTP handlers and the storage backend. Enforces the
//! account invariants - non-empty password on creation, path/body identity
//! consistency on update, hash-not-plaintext at rest, sparse-overlay merge -
//! and keeps the permission cache informed after every mutation that could
//! change an account's effective permissions.

use std::sync::Arc;

use serde_json::value::RawValue;
use tracing::{debug, error, instrument};

use crate::api::models::accounts::{Account, AccountQuery, Metadata, PublicAccount};
use crate::authz::Authorization;
use crate::crypto;
use crate::errors::{Error, Result};
use crate::store::AccountStore;
use crate::types::Parameters;

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    authz: Arc<dyn Authorization>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, authz: Arc<dyn Authorization>) -> Self {
        Self { store, authz }
    }

    #[instrument(skip(self, entity), fields(name = %entity.metadata.name), err)]
    pub async fn create(&self, entity: &Account) -> Result<PublicAccount> {
        let mut entity = entity.clone();
        entity.metadata.stamp_created();

        // check that the password is correctly filled
        if entity.spec.native_provider.password.is_empty() {
            return Err(Error::bad_request("password cannot be empty"));
        }
        let hash = match crypto::hash_and_salt(&entity.spec.native_provider.password) {
            Ok(hash) => hash,
            Err(err) => {
                error!(error = %err, "unable to generate the hash for the password of account {}", entity.metadata.name);
                return Err(Error::Internal {
                    operation: "hash the account password".to_string(),
                });
            }
        };
        // save the hash in the password field
        entity.spec.native_provider.password = hash;

        self.store.create(&entity).await?;

        // The account's associated role may have changed, which can add or remove permissions.
        self.refresh_permissions_best_effort().await;
        Ok(PublicAccount::from(&entity))
    }

    #[instrument(skip(self, entity, parameters), fields(name = %parameters.name), err)]
    pub async fn update(&self, entity: &Account, parameters: &Parameters) -> Result<PublicAccount> {
        let mut entity = entity.clone();

        if entity.metadata.name != parameters.name {
            debug!(
                "name in account '{}' and coming from the http request: '{}' doesn't match",
                entity.metadata.name, parameters.name
            );
            return Err(Error::bad_request("metadata.name and the name in the http path request don't match"));
        }

        // find the previous version of the account
        let old_entity = self.store.get(&parameters.name).await?;
        entity.metadata.merge(&old_entity.metadata);

        // in case the caller updated the password, it must be hashed again; otherwise the old hash is kept
        if !entity.spec.native_provider.password.is_empty() {
            let hash = match crypto::hash_and_salt(&entity.spec.native_provider.password) {
                Ok(hash) => hash,
                Err(err) => {
                    error!(error = %err, "unable to generate the hash for the password of account {}", entity.metadata.name);
                    return Err(Error::Internal {
                        operation: "hash the account password".to_string(),
                    });
                }
            };
            entity.spec.native_provider.password = hash;
        } else {
            entity.spec.native_provider.password = old_entity.spec.native_provider.password;
        }

        // unspecified fields keep their previous value, specified ones are overwritten
        if entity.spec.first_name.is_empty() {
            entity.spec.first_name = old_entity.spec.first_name;
        }
        if entity.spec.last_name.is_empty() {
            entity.spec.last_name = old_entity.spec.last_name;
        }

        if let Err(update_err) = self.store.update(&entity).await {
            error!(error = %update_err, "unable to perform the update of account {}", entity.metadata.name);
            return Err(update_err.into());
        }

        // The account's associated role may have changed, which can add or remove permissions.
        self.refresh_permissions_best_effort().await;
        Ok(PublicAccount::from(&entity))
    }

    #[instrument(skip(self, parameters), fields(name = %parameters.name), err)]
    pub async fn delete(&self, parameters: &Parameters) -> Result<()> {
        self.store.delete(&parameters.name).await?;

        // The account's associated role may have changed, which can add or remove permissions.
        self.refresh_permissions_best_effort().await;
        Ok(())
    }

    #[instrument(skip(self, parameters), fields(name = %parameters.name), err)]
    pub async fn get(&self, parameters: &Parameters) -> Result<PublicAccount> {
        let account = self.store.get(&parameters.name).await?;
        Ok(PublicAccount::from(&account))
    }

    #[instrument(skip(self, query, _parameters), err)]
    pub async fn list(&self, query: &AccountQuery, _parameters: &Parameters) -> Result<Vec<PublicAccount>> {
        let accounts = self.store.list(query).await?;
        Ok(accounts.iter().map(PublicAccount::from).collect())
    }

    /// Intentionally unimplemented; callers must use [`AccountService::list`].
    pub async fn raw_list(&self, _query: &AccountQuery, _parameters: &Parameters) -> Result<Vec<Box<RawValue>>> {
        Err(Error::NotImplemented {
            operation: "raw account listing",
        })
    }

    #[instrument(skip(self, query, _parameters), err)]
    pub async fn metadata_list(&self, query: &AccountQuery, _parameters: &Parameters) -> Result<Vec<Metadata>> {
        Ok(self.store.metadata_list(query).await?)
    }

    #[instrument(skip(self, query, _parameters), err)]
    pub async fn raw_metadata_list(&self, query: &AccountQuery, _parameters: &Parameters) -> Result<Vec<Box<RawValue>>> {
        Ok(self.store.raw_metadata_list(query).await?)
    }

    /// Refresh the permission cache without affecting the outcome of the
    /// primary operation. Account data durability must not depend on the
    /// permission subsystem's availability; a failed refresh only means the
    /// derived permissions stay stale until the next successful one.
    async fn refresh_permissions_best_effort(&self) {
        if let Err(err) = self.authz.refresh_permissions().await {
            error!(error = %err, "failed to refresh the permission cache");
        }
    }
}
