use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Reports database reachability and how many clients the rate limiter is
/// tracking. Always 200; a failed ping shows up as `"status": "degraded"`.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = match state.store.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            warn!(error = %e, "health check: database unreachable");
            "unreachable"
        }
    };

    Json(json!({
        "status": if database == "ok" { "ok" } else { "degraded" },
        "service": "jobmatch-api",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "rate_limited_clients": state.rate_limiter.tracked_keys(),
    }))
}
