//! # accountd: Account Management Service
//!
//! `accountd` manages the lifecycle of user-account records in a multi-user
//! application: creation, update, deletion, retrieval, and listing, with
//! secure credential storage and permission-cache invalidation on any
//! mutation that could change an account's effective permissions.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer. Handlers hand incoming entities to the
//! [`services::AccountService`], which enforces the account invariants and
//! orchestrates three collaborators behind explicit contracts:
//!
//! - the **storage backend** ([`store::AccountStore`]) keeps the durable
//!   records, keyed by unique account name; the bundled backend is an
//!   in-memory store, but nothing in the service layer depends on that;
//! - the **credential hasher** ([`crypto`]) turns plaintext passwords into
//!   Argon2id hashes, so plaintext only ever exists inside the scope of a
//!   single create or update call;
//! - the **authorization cache** ([`authz::Authorization`]) derives effective
//!   permissions from account data and is refreshed after every mutation.
//!   The refresh is best-effort: account data durability never depends on
//!   the permission subsystem's availability.
//!
//! ## Request Flow
//!
//! A request to `/api/v1/accounts/*` is parsed by an axum handler, which
//! builds the path-identity [`types::Parameters`] and calls the service. The
//! service defensively copies the incoming entity, validates it, merges it
//! with the previous record where applicable, persists it, refreshes the
//! permission cache, and returns a redacted
//! [`api::models::accounts::PublicAccount`] projection - the only
//! representation that ever leaves the service.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use accountd::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = accountd::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     accountd::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod authz;
pub mod config;
pub mod crypto;
pub mod errors;
mod openapi;
pub mod services;
pub mod store;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::api::models::accounts::Account;
use crate::authz::{Authorization, PermissionCache};
use crate::errors::Error;
use crate::services::AccountService;
use crate::store::{AccountStore, MemoryStore, StoreError};
use crate::types::Parameters;

pub use config::Config;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub config: Config,
}

/// A fully wired application, ready to serve.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting account service with configuration: {:#?}", config);

        let store: Arc<dyn AccountStore> = Arc::new(MemoryStore::new());
        let authz = Arc::new(PermissionCache::new(store.clone()));
        let accounts = AccountService::new(store, authz.clone());

        seed_admin_account(&accounts, &config).await?;

        // Prime the permission cache so derived permissions exist before the
        // first request arrives.
        authz.refresh_permissions().await?;

        let state = AppState {
            accounts,
            config: config.clone(),
        };
        let router = api::router(state);

        Ok(Self { router, config })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Account service listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

/// Create the initial admin account if it doesn't exist.
///
/// Idempotent: an existing account under the configured name is left
/// untouched. Creation goes through the regular service path, so the seed
/// password is hashed and the permission cache refreshed like any other
/// account creation.
async fn seed_admin_account(accounts: &AccountService, config: &Config) -> anyhow::Result<()> {
    let Some(seed) = &config.admin else {
        return Ok(());
    };

    match accounts.get(&Parameters::new(&seed.name)).await {
        Ok(_) => {
            debug!("admin account {} already exists, leaving it untouched", seed.name);
            Ok(())
        }
        Err(Error::Store(StoreError::NotFound)) => {
            let mut entity = Account::new(&seed.name);
            entity.spec.first_name = seed.first_name.clone();
            entity.spec.last_name = seed.last_name.clone();
            entity.spec.native_provider.password = seed.password.clone();
            accounts.create(&entity).await?;
            info!("created initial admin account {}", seed.name);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
