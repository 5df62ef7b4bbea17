//! Shared helpers for handler tests.
//!
//! Tests run against [`MemoryStore`] so no database is required; the returned
//! store handle lets a test seed agents or mutate item state directly.

use crate::db::models::Agent;
use crate::{AppState, Config, build_router};
use axum_test::TestServer;
use std::sync::Arc;

pub use crate::db::store::{MemoryStore, Store};

/// Build a test server over a fresh in-memory store with default config
pub async fn create_test_app() -> (TestServer, Arc<MemoryStore>) {
    create_test_app_with(|_| {}).await
}

/// Same as [`create_test_app`] but lets the test adjust the config first
pub async fn create_test_app_with(configure: impl FnOnce(&mut Config)) -> (TestServer, Arc<MemoryStore>) {
    let mut config = Config::default();
    configure(&mut config);

    let store = Arc::new(MemoryStore::new());
    let state = AppState::builder()
        .store(store.clone() as Arc<dyn Store>)
        .config(config)
        .build();

    let server = TestServer::new(build_router(&state)).expect("Failed to create test server");
    (server, store)
}

/// Seed `count` agents in directory order and return them
pub async fn seed_agents(store: &MemoryStore, count: usize) -> Vec<Agent> {
    let mut agents = Vec::with_capacity(count);
    for i in 0..count {
        agents.push(store.add_agent(&format!("Agent {}", i + 1)).await);
    }
    agents
}
