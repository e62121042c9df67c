//! Shared state for all HTTP handlers, plus the adapters that wire the
//! concrete collaborators into the pipeline's trait seams.

use std::sync::Arc;

use async_trait::async_trait;

use chat_engine::practice::DatasetHandle;
use chat_engine::{
    ChatEngineError, ChatModel, ChatPipeline, KnowledgeRetriever, PipelineConfig, ScoredChunk,
};
use knowledge_base::{DocumentStore, QdrantDocumentStore};
use llm_service::{ChatMessage, LlmServiceProfiles};

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The answer pipeline (chat endpoint).
    pub pipeline: Arc<ChatPipeline>,
    /// The document store (admin endpoints).
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Load shared state from environment variables and connect the store.
    pub async fn from_env() -> Result<Self, AppError> {
        let svc = Arc::new(
            LlmServiceProfiles::from_env().map_err(|e| AppError::Config(e.to_string()))?,
        );

        let store: Arc<dyn DocumentStore> = Arc::new(
            QdrantDocumentStore::connect_from_env(svc.clone())
                .await
                .map_err(|e| AppError::Config(e.to_string()))?,
        );

        let pipeline = Arc::new(ChatPipeline::new(
            Arc::new(StoreRetriever { store: store.clone() }),
            Arc::new(ProfilesChatModel { svc }),
            DatasetHandle::Shared,
            PipelineConfig::from_env(),
        ));

        Ok(Self { pipeline, store })
    }
}

/// Adapter: the document store as the pipeline's vector retriever.
pub struct StoreRetriever {
    pub store: Arc<dyn DocumentStore>,
}

#[async_trait]
impl KnowledgeRetriever for StoreRetriever {
    async fn similarity_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, ChatEngineError> {
        let hits = self
            .store
            .similarity_search(query, limit, None)
            .await
            .map_err(|e| ChatEngineError::Retrieval(e.to_string()))?;

        Ok(hits
            .into_iter()
            .map(|hit| ScoredChunk {
                content: hit.document.page_content,
                metadata: hit.document.metadata,
                score: hit.score,
            })
            .collect())
    }
}

/// Adapter: the shared LLM service as the pipeline's chat model.
pub struct ProfilesChatModel {
    pub svc: Arc<LlmServiceProfiles>,
}

#[async_trait]
impl ChatModel for ProfilesChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatEngineError> {
        self.svc.chat(messages).await.map_err(|e| {
            if e.is_configuration() {
                ChatEngineError::NotConfigured(e.to_string())
            } else {
                ChatEngineError::Generation(e.to_string())
            }
        })
    }
}
