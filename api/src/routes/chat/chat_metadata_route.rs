//! GET /api/chat-metadata — summary of the practice dataset.

use axum::{Json, extract::State};

use chat_engine::practice::DatasetSummary;

use crate::{core::app_state::AppState, error_handler::AppResult};

pub async fn chat_metadata(State(state): State<AppState>) -> AppResult<Json<DatasetSummary>> {
    let dataset = state.pipeline.dataset()?;
    Ok(Json(dataset.summary()))
}
