//! Shared constructors for tests.

use std::sync::Arc;

use axum_test::TestServer;

use crate::AppState;
use crate::api;
use crate::authz::PermissionCache;
use crate::config::Config;
use crate::services::AccountService;
use crate::store::{AccountStore, MemoryStore};

/// Build a test server over a fresh in-memory store.
pub fn create_test_app() -> TestServer {
    let store: Arc<dyn AccountStore> = Arc::new(MemoryStore::new());
    let authz = Arc::new(PermissionCache::new(store.clone()));
    let state = AppState {
        accounts: AccountService::new(store, authz),
        config: Config::default(),
    };
    TestServer::new(api::router(state)).expect("Failed to create test server")
}
