//! HTTP layer: axum router over the chat pipeline and the document store.

use std::env;

pub mod core;
pub mod error_handler;
pub mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::core::app_state::AppState;
use crate::error_handler::AppError;
use crate::routes::chat::{chat_metadata_route::chat_metadata, chat_route::chat};
use crate::routes::rag::{
    add_documents_route::add_documents, categories_route::categories,
    delete_documents_route::delete_documents, initialize_route::initialize,
    search_documents_route::search_documents,
};

/// Build the application router over the given state.
///
/// Exposed separately from [`start`] so tests can drive the router with
/// stubbed collaborators.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/chat-metadata", get(chat_metadata))
        .route("/api/rag/add", post(add_documents))
        .route("/api/rag/delete", post(delete_documents))
        .route("/api/rag/search", post(search_documents))
        .route("/api/rag/categories", get(categories))
        .route("/api/rag/initialize", post(initialize))
        // The chat widget is a cross-origin browser caller.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server: load state from env, bind, serve until ctrl-c.
pub async fn start() -> Result<(), AppError> {
    let state = AppState::from_env().await?;

    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&host_url).await.map_err(AppError::Bind)?;

    info!(address = %host_url, "server listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    signal::ctrl_c().await.expect("Failed to listen for shutdown signal");
}
