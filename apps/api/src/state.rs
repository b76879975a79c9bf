use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::practice::controller::InFlightRegistry;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// In-memory with a TTL in production; swapped for fixtures in tests.
    pub sessions: Arc<dyn SessionStore>,
    /// Sessions with a feedback request outstanding.
    pub in_flight: Arc<InFlightRegistry>,
    pub config: Config,
}
