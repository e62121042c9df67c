//! POST /api/rag/add — chunk, embed, and store documents.

use axum::{Json, extract::State};
use tracing::{debug, error};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::rag::rag_requests::{AddDocumentsRequest, AddDocumentsResponse},
};

pub async fn add_documents(
    State(state): State<AppState>,
    Json(body): Json<AddDocumentsRequest>,
) -> AppResult<Json<AddDocumentsResponse>> {
    let documents = body.documents.ok_or(AppError::MissingDocuments)?;

    debug!(documents = documents.len(), "add_documents: start");

    let ids = state.store.add_documents(documents).await.map_err(|e| {
        error!(error = %e, "add_documents: store failure");
        AppError::Upstream("Failed to add documents")
    })?;

    let count = ids.len();
    Ok(Json(AddDocumentsResponse {
        success: true,
        ids,
        count,
        message: format!("Added {count} documents successfully"),
    }))
}
