//! Typed error for the chat-engine crate.
//!
//! The variants mirror the orchestration boundary's taxonomy: the HTTP layer
//! maps `InvalidHistory` to 400, `NotConfigured` to the distinct
//! operator-facing 500, and everything else to a generic 500.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatEngineError {
    /// A conversation turn carried an unknown role.
    #[error("invalid history: unknown role '{0}'")]
    InvalidHistory(String),

    /// The practice dataset could not be loaded or parsed.
    #[error("practice dataset error: {0}")]
    Dataset(String),

    /// The vector retriever failed (network, auth, index absent).
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// The language model call failed because credentials are missing or
    /// invalid. Reported distinctly so operators can tell it from a bug.
    #[error("language model not configured: {0}")]
    NotConfigured(String),

    /// Any other language model invocation failure.
    #[error("generation error: {0}")]
    Generation(String),
}
