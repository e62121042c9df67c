//! POST /api/rag/delete — delete stored chunks by id.

use axum::{Json, extract::State};
use tracing::error;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::rag::rag_requests::{DeleteDocumentsRequest, DeleteDocumentsResponse},
};

pub async fn delete_documents(
    State(state): State<AppState>,
    Json(body): Json<DeleteDocumentsRequest>,
) -> AppResult<Json<DeleteDocumentsResponse>> {
    let ids = body.ids.ok_or(AppError::MissingIds)?;

    let count = state.store.delete_documents(&ids).await.map_err(|e| {
        error!(error = %e, "delete_documents: store failure");
        AppError::Upstream("Failed to delete documents")
    })?;

    Ok(Json(DeleteDocumentsResponse {
        success: true,
        message: format!("Deleted {count} documents successfully"),
    }))
}
