//! Qdrant-backed document store for the assistant's knowledge base.
//!
//! Public API:
//! - [`DocumentStore`]: the narrow store contract (add / similarity-search /
//!   delete / distinct) the rest of the system depends on.
//! - [`QdrantDocumentStore`]: the concrete backend — chunks incoming
//!   documents, embeds them through the shared LLM service, and stores
//!   `(vector, content, metadata)` points in Qdrant.
//! - [`samples::sample_documents`]: canned seed documents for a fresh store.

pub mod chunker;
pub mod errors;
pub mod samples;
pub mod structs;
mod vector_db;

use std::sync::Arc;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use tracing::{debug, info};
use uuid::Uuid;

use llm_service::LlmServiceProfiles;

use errors::knowledge_base_error::KnowledgeBaseError;
use structs::document::{DocumentInput, MetadataFilter, ScoredDocument};
use structs::store_config::StoreConfig;

/// Abstract document store contract.
///
/// Kept deliberately narrow so deployments can swap the backend and tests
/// can stub it without a running vector database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Chunk, embed, and store documents. Returns the ids of the stored
    /// chunks (one document may produce several).
    async fn add_documents(
        &self,
        documents: Vec<DocumentInput>,
    ) -> Result<Vec<String>, KnowledgeBaseError>;

    /// Similarity search: ranked `(document, score)` pairs, descending,
    /// at most `limit` results.
    async fn similarity_search(
        &self,
        query: &str,
        limit: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredDocument>, KnowledgeBaseError>;

    /// Delete chunks by id. Returns the number of ids submitted.
    async fn delete_documents(&self, ids: &[String]) -> Result<usize, KnowledgeBaseError>;

    /// Distinct string values of a metadata field across the store.
    async fn distinct_values(&self, field: &str) -> Result<Vec<String>, KnowledgeBaseError>;
}

/// Qdrant implementation of [`DocumentStore`].
pub struct QdrantDocumentStore {
    client: Qdrant,
    cfg: StoreConfig,
    svc: Arc<LlmServiceProfiles>,
}

impl QdrantDocumentStore {
    /// Connect to Qdrant and make sure the collection exists.
    pub async fn connect(
        cfg: StoreConfig,
        svc: Arc<LlmServiceProfiles>,
    ) -> Result<Self, KnowledgeBaseError> {
        let client = vector_db::connect(&cfg).await?;
        vector_db::ensure_collection(&client, &cfg).await?;
        info!(collection = %cfg.collection, url = %cfg.url, "document store connected");
        Ok(Self { client, cfg, svc })
    }

    /// Connect using environment-driven configuration.
    pub async fn connect_from_env(
        svc: Arc<LlmServiceProfiles>,
    ) -> Result<Self, KnowledgeBaseError> {
        Self::connect(StoreConfig::from_env()?, svc).await
    }

    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }
}

#[async_trait]
impl DocumentStore for QdrantDocumentStore {
    async fn add_documents(
        &self,
        documents: Vec<DocumentInput>,
    ) -> Result<Vec<String>, KnowledgeBaseError> {
        // Chunk first so one embedding batch covers all pieces.
        let mut texts: Vec<String> = Vec::new();
        let mut metadatas: Vec<serde_json::Value> = Vec::new();
        for doc in documents {
            for chunk in chunker::split_text(&doc.page_content, self.cfg.chunk_size, self.cfg.chunk_overlap)
            {
                texts.push(chunk);
                metadatas.push(doc.metadata.clone());
            }
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self
            .svc
            .embed_batch(&texts)
            .await
            .map_err(|e| KnowledgeBaseError::Embedding(e.to_string()))?;

        let ids: Vec<String> = texts.iter().map(|_| Uuid::new_v4().to_string()).collect();
        let batch = ids
            .iter()
            .cloned()
            .zip(vectors)
            .zip(texts.into_iter().zip(metadatas))
            .map(|((id, vector), (content, metadata))| (id, vector, content, metadata))
            .collect();

        let written = vector_db::upsert_documents(&self.client, &self.cfg, batch).await?;
        debug!(chunks = written, "add_documents: stored");
        Ok(ids)
    }

    async fn similarity_search(
        &self,
        query: &str,
        limit: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredDocument>, KnowledgeBaseError> {
        let query_vec = self
            .svc
            .embed(query)
            .await
            .map_err(|e| KnowledgeBaseError::Embedding(e.to_string()))?;

        vector_db::search_top_k(&self.client, &self.cfg, query_vec, limit, filter).await
    }

    async fn delete_documents(&self, ids: &[String]) -> Result<usize, KnowledgeBaseError> {
        vector_db::delete_points(&self.client, &self.cfg, ids).await
    }

    async fn distinct_values(&self, field: &str) -> Result<Vec<String>, KnowledgeBaseError> {
        vector_db::distinct_metadata_values(&self.client, &self.cfg, field).await
    }
}
