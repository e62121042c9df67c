//! HTTP-level tests over the router with stubbed collaborators:
//! no vector database, no model endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use api::core::app_state::AppState;
use chat_engine::practice::{DatasetHandle, PracticeDataset, PracticeRecord};
use chat_engine::{
    ChatEngineError, ChatModel, ChatPipeline, KnowledgeRetriever, PipelineConfig, ScoredChunk,
};
use knowledge_base::errors::knowledge_base_error::KnowledgeBaseError;
use knowledge_base::structs::document::{
    DocumentInput, MetadataFilter, ScoredDocument, StoredDocument,
};
use knowledge_base::DocumentStore;
use llm_service::ChatMessage;

/* ---------------------------------- stubs --------------------------------- */

struct StubRetriever {
    chunks: Vec<ScoredChunk>,
}

#[async_trait::async_trait]
impl KnowledgeRetriever for StubRetriever {
    async fn similarity_search(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<ScoredChunk>, ChatEngineError> {
        Ok(self.chunks.clone())
    }
}

struct StubModel {
    calls: AtomicUsize,
    fail_unconfigured: bool,
}

#[async_trait::async_trait]
impl ChatModel for StubModel {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ChatEngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_unconfigured {
            Err(ChatEngineError::NotConfigured("missing OPENAI_API_KEY".into()))
        } else {
            Ok("stub answer".to_string())
        }
    }
}

struct StubStore {
    results: Vec<ScoredDocument>,
}

#[async_trait::async_trait]
impl DocumentStore for StubStore {
    async fn add_documents(
        &self,
        documents: Vec<DocumentInput>,
    ) -> Result<Vec<String>, KnowledgeBaseError> {
        Ok((0..documents.len()).map(|i| format!("id-{i}")).collect())
    }

    async fn similarity_search(
        &self,
        _query: &str,
        _limit: usize,
        _filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredDocument>, KnowledgeBaseError> {
        Ok(self.results.clone())
    }

    async fn delete_documents(&self, ids: &[String]) -> Result<usize, KnowledgeBaseError> {
        Ok(ids.len())
    }

    async fn distinct_values(&self, _field: &str) -> Result<Vec<String>, KnowledgeBaseError> {
        Ok(vec!["embeddings".to_string(), "rag".to_string()])
    }
}

/* -------------------------------- fixtures -------------------------------- */

fn fixture_record(id: &str, subject: &str, topic: &str) -> PracticeRecord {
    PracticeRecord {
        id: id.to_string(),
        subject: subject.to_string(),
        topic: topic.to_string(),
        year: 2023,
        difficulty: "medium".to_string(),
        question: format!("Sample {topic} question"),
        answer: format!("Sample {topic} answer"),
        solution: format!("Sample {topic} solution"),
        marks: 4,
        learning_objectives: vec![format!("Understand {topic}")],
        keywords: vec![topic.to_lowercase()],
    }
}

fn chunk(content: &str, score: f32) -> ScoredChunk {
    ScoredChunk { content: content.to_string(), metadata: json!({}), score }
}

struct TestApp {
    router: Router,
    model: Arc<StubModel>,
}

fn test_app(chunks: Vec<ScoredChunk>, fail_unconfigured: bool) -> TestApp {
    let model = Arc::new(StubModel { calls: AtomicUsize::new(0), fail_unconfigured });
    let dataset = DatasetHandle::Fixed(Arc::new(PracticeDataset::from_records(vec![
        fixture_record("q1", "Mathematics", "Calculus"),
        fixture_record("q2", "Physics", "Waves"),
    ])));

    let pipeline = Arc::new(ChatPipeline::new(
        Arc::new(StubRetriever { chunks }),
        model.clone(),
        dataset,
        PipelineConfig::default(),
    ));
    let store: Arc<dyn DocumentStore> = Arc::new(StubStore {
        results: vec![ScoredDocument {
            document: StoredDocument {
                id: "d1".to_string(),
                page_content: "stored chunk".to_string(),
                metadata: json!({"category": "rag"}),
            },
            score: 0.9,
        }],
    });

    TestApp { router: api::app(AppState { pipeline, store }), model }
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => Request::builder().method(method).uri(uri).body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/* ---------------------------------- chat ---------------------------------- */

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = test_app(Vec::new(), false);

    let (status, body) =
        send(app.router, "POST", "/api/chat", Some(json!({"message": "", "history": []}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
    assert_eq!(app.model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn zero_matches_mean_no_context_and_no_model_call() {
    let app = test_app(Vec::new(), false);

    let (status, body) = send(
        app.router,
        "POST",
        "/api/chat",
        Some(json!({"message": "what is CBC?", "history": []})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["noContext"], true);
    assert_eq!(body["dataSource"], "knowledge_base");
    assert!(body.get("context").is_none());
    assert_eq!(app.model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn strong_matches_yield_high_relevance() {
    let app = test_app(vec![chunk("fact one", 0.84), chunk("fact two", 0.80)], false);

    let (status, body) = send(
        app.router,
        "POST",
        "/api/chat",
        Some(json!({"message": "what is CBC?", "history": []})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "stub answer");
    assert_eq!(body["relevance"], "high");
    assert_eq!(body["avgRelevance"], "0.82");
    assert!(body.get("noContext").is_none());
    assert_eq!(app.model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn practice_requests_carry_question_details() {
    let app = test_app(Vec::new(), false);

    let (status, body) = send(
        app.router,
        "POST",
        "/api/chat",
        Some(json!({"message": "show me a maths question", "history": []})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dataSource"], "practice_questions");
    assert_eq!(body["subjects"][0], "Mathematics");
    assert_eq!(body["questionDetails"][0]["id"], "q1");
    assert_eq!(body["questionDetails"][0]["subject"], "Mathematics");
}

#[tokio::test]
async fn unknown_history_role_is_a_bad_request() {
    let app = test_app(vec![chunk("fact", 0.9)], false);

    let (status, body) = send(
        app.router,
        "POST",
        "/api/chat",
        Some(json!({
            "message": "what is CBC?",
            "history": [{"role": "operator", "content": "hi"}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("unknown role"));
    assert_eq!(app.model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_credentials_surface_as_not_configured() {
    let app = test_app(vec![chunk("fact", 0.9)], true);

    let (status, body) = send(
        app.router,
        "POST",
        "/api/chat",
        Some(json!({"message": "what is CBC?", "history": []})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "OpenAI API key not configured");
}

#[tokio::test]
async fn history_is_windowed_to_ten_turns() {
    let app = test_app(vec![chunk("fact", 0.9)], false);

    let history: Vec<Value> = (0..15)
        .map(|i| {
            json!({
                "role": if i % 2 == 0 { "user" } else { "assistant" },
                "content": format!("turn {i}")
            })
        })
        .collect();

    let (status, _) = send(
        app.router,
        "POST",
        "/api/chat",
        Some(json!({"message": "what is CBC?", "history": history})),
    )
    .await;

    // Windowing happens inside the pipeline; a long history must not error.
    assert_eq!(status, StatusCode::OK);
}

/* ------------------------------- chat-metadata ----------------------------- */

#[tokio::test]
async fn chat_metadata_summarizes_the_dataset() {
    let app = test_app(Vec::new(), false);

    let (status, body) = send(app.router, "GET", "/api/chat-metadata", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQuestions"], 2);
    let subjects = body["subjects"].as_array().unwrap();
    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[0]["subject"], "Mathematics");
    assert_eq!(subjects[0]["count"], 1);
}

/* ---------------------------------- admin ---------------------------------- */

#[tokio::test]
async fn add_requires_a_documents_array() {
    let app = test_app(Vec::new(), false);

    let (status, body) = send(app.router, "POST", "/api/rag/add", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Documents array is required");
}

#[tokio::test]
async fn add_returns_ids_and_count() {
    let app = test_app(Vec::new(), false);

    let (status, body) = send(
        app.router,
        "POST",
        "/api/rag/add",
        Some(json!({
            "documents": [
                {"pageContent": "first", "metadata": {"category": "demo"}},
                {"pageContent": "second"}
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["ids"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_requires_an_ids_array() {
    let app = test_app(Vec::new(), false);

    let (status, body) = send(app.router, "POST", "/api/rag/delete", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "IDs array is required");
}

#[tokio::test]
async fn delete_reports_success() {
    let app = test_app(Vec::new(), false);

    let (status, body) =
        send(app.router, "POST", "/api/rag/delete", Some(json!({"ids": ["a", "b"]}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn search_requires_a_query() {
    let app = test_app(Vec::new(), false);

    let (status, body) =
        send(app.router, "POST", "/api/rag/search", Some(json!({"limit": 3}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query is required");
}

#[tokio::test]
async fn search_returns_scored_documents() {
    let app = test_app(Vec::new(), false);

    let (status, body) = send(
        app.router,
        "POST",
        "/api/rag/search",
        Some(json!({"query": "rag", "limit": 3, "filter": {"category": "rag"}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["document"]["pageContent"], "stored chunk");
    let score = body["results"][0]["score"].as_f64().unwrap();
    assert!((score - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn categories_lists_distinct_values() {
    let app = test_app(Vec::new(), false);

    let (status, body) = send(app.router, "GET", "/api/rag/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"], json!(["embeddings", "rag"]));
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn initialize_seeds_the_samples() {
    let app = test_app(Vec::new(), false);

    let (status, body) = send(app.router, "POST", "/api/rag/initialize", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["count"].as_u64().unwrap() > 0);
}
