use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in production; tests swap in an in-memory store.
    pub storage: Arc<dyn Storage>,
    pub llm: LlmClient,
    pub tokens: TokenKeys,
    pub config: Config,
}
