use std::sync::Arc;

use crate::llm_client::CompletionService;
use crate::security::rate_limit::{RateLimit, RateLimiter};
use crate::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Job catalogue and user profiles. Default: PgJobStore.
    pub store: Arc<dyn JobStore>,
    /// Chat completions. Default: Groq-backed LlmClient.
    pub llm: Arc<dyn CompletionService>,
    /// Sliding-window counters shared by every rate-limited route.
    pub rate_limiter: Arc<RateLimiter>,
    pub search_limit: RateLimit,
    pub chat_limit: RateLimit,
}
