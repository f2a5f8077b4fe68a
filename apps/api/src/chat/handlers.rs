//! Axum route handlers for the chat API.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::chat::assistant::answer_chat;
use crate::errors::AppError;
use crate::security::rate_limit::client_key;
use crate::security::sanitize::{sanitize_input, MAX_MESSAGE_CHARS};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// POST /api/v1/chat
///
/// Recommends jobs for the message, personalised when `user_id` names a user.
pub async fn handle_chat(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if !state
        .rate_limiter
        .check(&client_key("chat", connect_info), state.chat_limit)
    {
        return Err(AppError::RateLimited(
            "Too many requests. Please wait a moment before chatting again.".to_string(),
        ));
    }

    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    if request.message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    if request.user_id.is_some_and(|id| id <= 0) {
        return Err(AppError::Validation("Invalid user ID".to_string()));
    }

    let message = sanitize_input(&request.message, MAX_MESSAGE_CHARS);
    if message.is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }

    let answer = answer_chat(
        state.store.as_ref(),
        state.llm.as_ref(),
        request.user_id,
        &message,
    )
    .await?;

    Ok(Json(ChatResponse { answer }))
}
