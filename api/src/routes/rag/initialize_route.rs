//! POST /api/rag/initialize — seed the store with the sample documents.

use axum::{Json, extract::State};
use tracing::{error, info};

use knowledge_base::samples::sample_documents;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::rag::rag_requests::InitializeResponse,
};

pub async fn initialize(State(state): State<AppState>) -> AppResult<Json<InitializeResponse>> {
    let ids = state.store.add_documents(sample_documents()).await.map_err(|e| {
        error!(error = %e, "initialize: store failure");
        AppError::Upstream("Failed to initialize knowledge base")
    })?;

    info!(chunks = ids.len(), "knowledge base initialized with samples");

    Ok(Json(InitializeResponse {
        success: true,
        count: ids.len(),
        message: "Knowledge base initialized successfully".to_string(),
    }))
}
