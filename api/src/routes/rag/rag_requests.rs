//! Request/response DTOs for the knowledge-base admin endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use knowledge_base::structs::document::{DocumentInput, MetadataFilter, ScoredDocument};

#[derive(Debug, Deserialize)]
pub struct AddDocumentsRequest {
    /// Absent or non-array bodies are rejected with a 400.
    pub documents: Option<Vec<DocumentInput>>,
}

#[derive(Debug, Serialize)]
pub struct AddDocumentsResponse {
    pub success: bool,
    pub ids: Vec<String>,
    pub count: usize,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteDocumentsRequest {
    pub ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct DeleteDocumentsResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchDocumentsRequest {
    #[serde(default)]
    pub query: String,
    pub limit: Option<usize>,
    /// Flat `{field: value}` equality filter over document metadata.
    pub filter: Option<serde_json::Map<String, Value>>,
}

impl SearchDocumentsRequest {
    pub fn metadata_filter(&self) -> Option<MetadataFilter> {
        self.filter.as_ref().map(|map| MetadataFilter {
            equals: map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SearchDocumentsResponse {
    pub success: bool,
    pub results: Vec<ScoredDocument>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    pub success: bool,
    pub count: usize,
    pub message: String,
}
