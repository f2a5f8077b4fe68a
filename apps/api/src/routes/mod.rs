pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::errors::AppError;
use crate::search::handlers as search;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs/search", post(search::handle_search))
        .route("/api/v1/chat", post(chat::handle_chat))
        .fallback(not_found)
        .with_state(state)
}
