//! Configuration layer: reads runtime settings from environment variables
//! and exposes a strongly typed config for the Qdrant-backed store.

use serde::{Deserialize, Serialize};

use crate::errors::knowledge_base_error::KnowledgeBaseError;

/// Connectivity and ingest parameters for the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// gRPC URL for Qdrant (e.g., "http://localhost:6334").
    pub url: String,

    /// Target collection name (created on first connect if absent).
    pub collection: String,

    /// Embedding vector dimensionality (1536 for text-embedding-3-small).
    pub dim: usize,

    /// Chunk size (characters) for ingest splitting.
    pub chunk_size: usize,

    /// Overlap (characters) between consecutive chunks of an oversized block.
    pub chunk_overlap: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection: "knowledge_base".to_string(),
            dim: 1536,
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl StoreConfig {
    /// Build from environment variables with defaults.
    ///
    /// Variables: `QDRANT_URL`, `QDRANT_COLLECTION`, `EMBEDDING_DIM`,
    /// `CHUNK_SIZE`, `CHUNK_OVERLAP`.
    ///
    /// # Errors
    /// Returns [`KnowledgeBaseError::EnvParse`] when a numeric variable is
    /// set but malformed, and [`KnowledgeBaseError::InvalidConfig`] when the
    /// overlap is not smaller than the chunk size.
    pub fn from_env() -> Result<Self, KnowledgeBaseError> {
        let dflt = Self::default();
        let cfg = Self {
            url: env_or("QDRANT_URL", &dflt.url),
            collection: env_or("QDRANT_COLLECTION", &dflt.collection),
            dim: parse_env("EMBEDDING_DIM", dflt.dim)?,
            chunk_size: parse_env("CHUNK_SIZE", dflt.chunk_size)?,
            chunk_overlap: parse_env("CHUNK_OVERLAP", dflt.chunk_overlap)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), KnowledgeBaseError> {
        if self.chunk_size == 0 {
            return Err(KnowledgeBaseError::InvalidConfig("CHUNK_SIZE must be > 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(KnowledgeBaseError::InvalidConfig(
                "CHUNK_OVERLAP must be smaller than CHUNK_SIZE".into(),
            ));
        }
        Ok(())
    }
}

fn env_or(key: &str, dflt: &str) -> String {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| dflt.to_string())
}

fn parse_env<T: std::str::FromStr + Copy>(key: &str, dflt: T) -> Result<T, KnowledgeBaseError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.parse::<T>().map_err(|_| KnowledgeBaseError::EnvParse {
            key: key.to_string(),
            value: v,
        }),
        _ => Ok(dflt),
    }
}
