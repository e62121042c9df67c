//! Unified error type for the knowledge-base crate.

use thiserror::Error;

/// Errors produced by the knowledge-base module.
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── JSON / serialization ────────────────────────────────────────────────
    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Qdrant client / transport ───────────────────────────────────────────
    /// Transport / client error from Qdrant.
    #[error("qdrant error: {0}")]
    Qdrant(String),

    // ── Embeddings backend ──────────────────────────────────────────────────
    /// Embedding backend failed to embed inputs.
    #[error("embedding error: {0}")]
    Embedding(String),
}
