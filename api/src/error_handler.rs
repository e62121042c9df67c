//! Public application error type and its HTTP mapping.
//!
//! The wire contract is deliberately small: every error body is
//! `{ "error": "<message>" }`. Validation problems are 400 with a
//! user-correctable message; a missing LLM credential is the one 500 with a
//! distinct message so operators can tell it from a bug; everything else is
//! a generic 500 with full detail in the logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use chat_engine::ChatEngineError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Request validation (400) ---
    #[error("Message is required")]
    MissingMessage,

    #[error("Query is required")]
    MissingQuery,

    #[error("Documents array is required")]
    MissingDocuments,

    #[error("IDs array is required")]
    MissingIds,

    #[error("{0}")]
    BadRequest(String),

    // --- Operator-correctable (500, distinct message) ---
    #[error("OpenAI API key not configured")]
    LlmNotConfigured,

    // --- Generic failures (500) ---
    /// Fixed per-route message; the underlying cause is logged where it
    /// occurs.
    #[error("{0}")]
    Upstream(&'static str),

    #[error("Internal server error")]
    Internal,

    // --- Boot / config (never reach a response in practice) ---
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingMessage
            | AppError::MissingQuery
            | AppError::MissingDocuments
            | AppError::MissingIds
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            AppError::LlmNotConfigured
            | AppError::Upstream(_)
            | AppError::Internal
            | AppError::Config(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody { error: self.to_string() };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Map pipeline errors to the HTTP taxonomy. Full detail for the generic
/// 500s is logged here, once.
impl From<ChatEngineError> for AppError {
    fn from(err: ChatEngineError) -> Self {
        match err {
            ChatEngineError::InvalidHistory(_) => AppError::BadRequest(err.to_string()),
            ChatEngineError::NotConfigured(detail) => {
                error!(error = %detail, "LLM credentials missing or rejected");
                AppError::LlmNotConfigured
            }
            ChatEngineError::Dataset(_)
            | ChatEngineError::Retrieval(_)
            | ChatEngineError::Generation(_) => {
                error!(error = %err, "chat pipeline failed");
                AppError::Internal
            }
        }
    }
}
