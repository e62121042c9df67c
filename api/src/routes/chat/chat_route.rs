//! POST /api/chat — answer a user message with retrieved context.

use axum::{Json, extract::State};
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// Handler: POST /api/chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"what is RAG?","history":[]}'
/// ```
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    if body.message.trim().is_empty() {
        return Err(AppError::MissingMessage);
    }

    debug!(message_len = body.message.len(), history = body.history.len(), "chat: start");

    let answer = state.pipeline.answer(&body.message, &body.history).await?;

    Ok(Json(answer.into()))
}
