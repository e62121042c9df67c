//! Data types for vector-store interaction: inputs, stored documents,
//! scored hits, and the metadata filter shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document submitted for ingestion.
///
/// Long content is chunked before embedding; every chunk inherits the
/// document's metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    /// Raw text content.
    pub page_content: String,

    /// Free-form metadata (source, type, category, tags, ...).
    #[serde(default)]
    pub metadata: Value,
}

/// A document chunk as stored in (and returned from) the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    /// Chunk id (UUID, assigned at ingest).
    pub id: String,

    /// Chunk text.
    pub page_content: String,

    /// Metadata carried over from the parent document.
    #[serde(default)]
    pub metadata: Value,
}

/// A single similarity-search hit (ranked by similarity, higher = closer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: StoredDocument,
    pub score: f32,
}

/// Equality predicate over metadata fields, applied server-side.
///
/// Each `(field, value)` pair must match; fields address keys of the
/// document metadata object (e.g., `category`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub equals: Vec<(String, Value)>,
}

impl MetadataFilter {
    pub fn is_empty(&self) -> bool {
        self.equals.is_empty()
    }
}
