//! Seams for the external collaborators of the pipeline.
//!
//! The pipeline only sees these narrow contracts; the HTTP layer wires in
//! the Qdrant store and the shared LLM service, tests wire in stubs.

use async_trait::async_trait;

use llm_service::ChatMessage;

use crate::api_types::ScoredChunk;
use crate::error::ChatEngineError;

/// Vector retriever contract.
///
/// Ranked `(chunk, score)` pairs, descending, at most `limit`. Failures
/// propagate as [`ChatEngineError::Retrieval`]; the pipeline never retries.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    async fn similarity_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, ChatEngineError>;
}

/// Chat model contract: one completion over a message sequence.
///
/// Implementations classify credential failures as
/// [`ChatEngineError::NotConfigured`] and everything else as
/// [`ChatEngineError::Generation`]. No retries at this level.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatEngineError>;
}
