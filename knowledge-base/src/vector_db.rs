//! Qdrant vector DB helpers: connection lifecycle, collection bootstrap,
//! upserts, filtered top-K search, deletes, and scroll-based distinct
//! collection using the modern `qdrant_client` API.
//!
//! Vector-store concerns stay isolated here so the backend is easy to
//! replace: the rest of the crate only sees `StoredDocument`-shaped data.
//! This module does **not** chunk text or create embeddings — only DB I/O.

use std::collections::BTreeSet;

use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
    PointsIdsList, ScrollPointsBuilder, SearchPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::errors::knowledge_base_error::KnowledgeBaseError;
use crate::structs::document::{MetadataFilter, ScoredDocument, StoredDocument};
use crate::structs::store_config::StoreConfig;

/// Establish a gRPC connection to Qdrant using `cfg.url`.
///
/// # Errors
/// Returns `KnowledgeBaseError::Qdrant` if the client cannot be constructed.
pub async fn connect(cfg: &StoreConfig) -> Result<Qdrant, KnowledgeBaseError> {
    Qdrant::from_url(&cfg.url)
        .build()
        .map_err(|e| KnowledgeBaseError::Qdrant(format!("client build: {e}")))
}

/// Create the collection if it does not exist yet.
///
/// Unlike a reindexing pipeline, the document store persists across
/// restarts, so existing collections are left untouched.
pub async fn ensure_collection(client: &Qdrant, cfg: &StoreConfig) -> Result<(), KnowledgeBaseError> {
    let exists = client
        .collection_exists(&cfg.collection)
        .await
        .map_err(|e| KnowledgeBaseError::Qdrant(format!("collection_exists: {e}")))?;
    if exists {
        return Ok(());
    }

    client
        .create_collection(
            CreateCollectionBuilder::new(&cfg.collection)
                .vectors_config(VectorParamsBuilder::new(cfg.dim as u64, Distance::Cosine)),
        )
        .await
        .map_err(|e| KnowledgeBaseError::Qdrant(format!("create_collection: {e}")))?;

    info!(collection = %cfg.collection, dim = cfg.dim, "created qdrant collection");
    Ok(())
}

/// Upsert a batch of chunks: `(id, vector, content, metadata)`.
///
/// Returns the number of upserted points.
///
/// # Errors
/// - `InvalidConfig` if any vector has the wrong dimensionality.
/// - `Qdrant` on transport/server errors.
pub async fn upsert_documents(
    client: &Qdrant,
    cfg: &StoreConfig,
    batch: Vec<(String, Vec<f32>, String, Value)>,
) -> Result<usize, KnowledgeBaseError> {
    if batch.is_empty() {
        return Ok(0);
    }

    let mut points: Vec<PointStruct> = Vec::with_capacity(batch.len());
    for (id, vector, content, metadata) in batch {
        if vector.len() != cfg.dim {
            return Err(KnowledgeBaseError::InvalidConfig(format!(
                "vector length {} != EMBEDDING_DIM {} for id {}",
                vector.len(),
                cfg.dim,
                id
            )));
        }

        let payload: Payload = json!({
            "content": content,
            "metadata": metadata,
        })
        .try_into()
        .map_err(|e| KnowledgeBaseError::Qdrant(format!("payload convert: {e}")))?;

        points.push(PointStruct::new(id, vector, payload));
    }

    let count = points.len();
    client
        .upsert_points(qdrant_client::qdrant::UpsertPointsBuilder::new(&cfg.collection, points))
        .await
        .map_err(|e| KnowledgeBaseError::Qdrant(format!("upsert_points: {e}")))?;

    debug!(collection = %cfg.collection, count, "upserted points");
    Ok(count)
}

/// Run k-NN search for a query vector and return scored documents.
///
/// # Errors
/// - `InvalidConfig` if the query vector length mismatches `EMBEDDING_DIM`.
/// - `Qdrant` on transport/server errors.
pub async fn search_top_k(
    client: &Qdrant,
    cfg: &StoreConfig,
    query_vec: Vec<f32>,
    k: usize,
    filter: Option<&MetadataFilter>,
) -> Result<Vec<ScoredDocument>, KnowledgeBaseError> {
    if query_vec.len() != cfg.dim {
        return Err(KnowledgeBaseError::InvalidConfig(format!(
            "query vector length {} != EMBEDDING_DIM {}",
            query_vec.len(),
            cfg.dim
        )));
    }

    let mut builder =
        SearchPointsBuilder::new(&cfg.collection, query_vec, k as u64).with_payload(true);

    if let Some(f) = filter.filter(|f| !f.is_empty()) {
        builder = builder.filter(metadata_filter_to_qdrant(f));
    }

    let resp = client
        .search_points(builder)
        .await
        .map_err(|e| KnowledgeBaseError::Qdrant(format!("search_points: {e}")))?;

    Ok(resp
        .result
        .into_iter()
        .map(|sp| {
            let id = point_id_to_string(sp.id);
            let (content, metadata) = read_payload(&sp.payload);
            ScoredDocument {
                document: StoredDocument { id, page_content: content, metadata },
                score: sp.score,
            }
        })
        .collect())
}

/// Delete points by their string/UUID ids. Returns the number requested.
pub async fn delete_points(
    client: &Qdrant,
    cfg: &StoreConfig,
    ids: &[String],
) -> Result<usize, KnowledgeBaseError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let selector = PointsIdsList {
        ids: ids.iter().map(|id| id.clone().into()).collect(),
    };

    client
        .delete_points(DeletePointsBuilder::new(&cfg.collection).points(selector))
        .await
        .map_err(|e| KnowledgeBaseError::Qdrant(format!("delete_points: {e}")))?;

    debug!(collection = %cfg.collection, count = ids.len(), "deleted points");
    Ok(ids.len())
}

/// Collect distinct string values of one metadata field by scrolling the
/// collection (payload only, no vectors).
pub async fn distinct_metadata_values(
    client: &Qdrant,
    cfg: &StoreConfig,
    field: &str,
) -> Result<Vec<String>, KnowledgeBaseError> {
    const PAGE: u32 = 256;

    let mut values = BTreeSet::new();
    let mut offset: Option<qdrant_client::qdrant::PointId> = None;

    loop {
        let mut builder = ScrollPointsBuilder::new(&cfg.collection).limit(PAGE).with_payload(true);
        if let Some(off) = offset.clone() {
            builder = builder.offset(off);
        }

        let resp = client
            .scroll(builder)
            .await
            .map_err(|e| KnowledgeBaseError::Qdrant(format!("scroll: {e}")))?;

        for point in &resp.result {
            let (_, metadata) = read_payload(&point.payload);
            if let Some(v) = metadata.get(field).and_then(Value::as_str) {
                if !v.is_empty() {
                    values.insert(v.to_string());
                }
            }
        }

        match resp.next_page_offset {
            Some(next) => offset = Some(next),
            None => break,
        }
    }

    Ok(values.into_iter().collect())
}

/// Convert the crate's equality filter into a Qdrant `must` filter over
/// nested metadata fields.
fn metadata_filter_to_qdrant(filter: &MetadataFilter) -> Filter {
    Filter::must(filter.equals.iter().map(|(field, value)| {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Condition::matches(format!("metadata.{field}"), text)
    }))
}

fn point_id_to_string(id: Option<qdrant_client::qdrant::PointId>) -> String {
    use qdrant_client::qdrant::point_id::PointIdOptions;
    match id.and_then(|pid| pid.point_id_options) {
        Some(PointIdOptions::Uuid(s)) => s,
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

/// Extract `(content, metadata)` from a point payload, best-effort.
fn read_payload(
    payload: &std::collections::HashMap<String, qdrant_client::qdrant::Value>,
) -> (String, Value) {
    let content = payload
        .get("content")
        .map(|v| v.clone().into_json())
        .and_then(|v| v.as_str().map(|s| s.to_owned()))
        .unwrap_or_default();
    let metadata = payload
        .get("metadata")
        .map(|v| v.clone().into_json())
        .unwrap_or(Value::Null);
    (content, metadata)
}
