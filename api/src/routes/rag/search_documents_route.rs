//! POST /api/rag/search — similarity search with an optional metadata filter.

use axum::{Json, extract::State};
use tracing::{debug, error};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::rag::rag_requests::{SearchDocumentsRequest, SearchDocumentsResponse},
};

const DEFAULT_LIMIT: usize = 5;

pub async fn search_documents(
    State(state): State<AppState>,
    Json(body): Json<SearchDocumentsRequest>,
) -> AppResult<Json<SearchDocumentsResponse>> {
    if body.query.trim().is_empty() {
        return Err(AppError::MissingQuery);
    }

    let limit = body.limit.unwrap_or(DEFAULT_LIMIT);
    let filter = body.metadata_filter();

    debug!(query = %body.query, limit, filtered = filter.is_some(), "search_documents: start");

    let results = state
        .store
        .similarity_search(&body.query, limit, filter.as_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "search_documents: store failure");
            AppError::Upstream("Failed to search documents")
        })?;

    let count = results.len();
    Ok(Json(SearchDocumentsResponse { success: true, results, count }))
}
