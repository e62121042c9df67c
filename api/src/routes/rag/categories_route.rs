//! GET /api/rag/categories — distinct metadata categories in the store.

use axum::{Json, extract::State};
use tracing::error;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::rag::rag_requests::CategoriesResponse,
};

pub async fn categories(State(state): State<AppState>) -> AppResult<Json<CategoriesResponse>> {
    let categories = state.store.distinct_values("category").await.map_err(|e| {
        error!(error = %e, "categories: store failure");
        AppError::Upstream("Failed to fetch categories")
    })?;

    let count = categories.len();
    Ok(Json(CategoriesResponse { success: true, categories, count }))
}
