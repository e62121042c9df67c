//! Retrieval-and-context-assembly pipeline with a single public entrypoint.
//!
//! Public API: [`ChatPipeline::answer`]. It classifies the query, retrieves
//! context from the practice dataset (lexical) or the vector store
//! (semantic), assembles a scored context bundle, short-circuits to a
//! refusal when no usable context exists, windows the conversation history,
//! builds a grounded prompt, calls the chat model once, and shapes the
//! final answer with relevance metadata.

pub mod api_types;
pub mod assemble;
pub mod classify;
pub mod error;
pub mod history;
pub mod lexical;
pub mod practice;
pub mod prompt;
pub mod traits;

use std::sync::Arc;

use tracing::{debug, info};

pub use api_types::{
    ChatAnswer, ContextBundle, ConversationTurn, QuestionDetail, RelevanceTier, RetrievedItem,
    ScoredChunk, SourceKind,
};
pub use error::ChatEngineError;
pub use traits::{ChatModel, KnowledgeRetriever};

use classify::QueryIntent;
use practice::DatasetHandle;

/// Retrieval and windowing knobs. All fields have env-driven defaults.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// How many items to retrieve from either source.
    pub retrieval_limit: usize,
    /// How many recent conversation turns reach the model.
    pub history_max_turns: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { retrieval_limit: 4, history_max_turns: history::DEFAULT_MAX_TURNS }
    }
}

impl PipelineConfig {
    /// Build from environment variables (`RAG_TOP_K`, `HISTORY_MAX_TURNS`)
    /// with defaults.
    pub fn from_env() -> Self {
        let dflt = Self::default();
        Self {
            retrieval_limit: parse("RAG_TOP_K", dflt.retrieval_limit),
            history_max_turns: parse("HISTORY_MAX_TURNS", dflt.history_max_turns),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &str, dflt: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(dflt)
}

/// The answer pipeline over its two external collaborators and the
/// process-wide practice dataset.
pub struct ChatPipeline {
    retriever: Arc<dyn KnowledgeRetriever>,
    model: Arc<dyn ChatModel>,
    dataset: DatasetHandle,
    cfg: PipelineConfig,
}

impl ChatPipeline {
    pub fn new(
        retriever: Arc<dyn KnowledgeRetriever>,
        model: Arc<dyn ChatModel>,
        dataset: DatasetHandle,
        cfg: PipelineConfig,
    ) -> Self {
        Self { retriever, model, dataset, cfg }
    }

    /// Resolve the practice dataset (loads the shared one on first access).
    pub fn dataset(&self) -> Result<&practice::PracticeDataset, ChatEngineError> {
        self.dataset.get()
    }

    /// Answer one user message.
    ///
    /// # Errors
    /// - [`ChatEngineError::InvalidHistory`] for unknown history roles
    /// - [`ChatEngineError::Retrieval`] when the vector store fails
    /// - [`ChatEngineError::NotConfigured`] / [`ChatEngineError::Generation`]
    ///   when the model call fails
    pub async fn answer(
        &self,
        message: &str,
        history_turns: &[ConversationTurn],
    ) -> Result<ChatAnswer, ChatEngineError> {
        // 1) Route the query.
        let intent = classify::classify(message);
        debug!(?intent, "query classified");

        // 2) Retrieve from the chosen source.
        let bundle = match intent {
            QueryIntent::SpecificRequest => {
                let dataset = self.dataset.get()?;
                let mut rng = rand::thread_rng();
                let matched = lexical::match_records(
                    dataset,
                    message,
                    self.cfg.retrieval_limit,
                    &mut rng,
                );
                let items = matched
                    .into_iter()
                    .map(|(record, score)| RetrievedItem::Practice {
                        record: record.clone(),
                        score,
                    })
                    .collect();
                assemble::assemble(items, SourceKind::PracticeQuestions)
            }
            QueryIntent::GeneralKnowledge => {
                let chunks = self
                    .retriever
                    .similarity_search(message, self.cfg.retrieval_limit)
                    .await?;
                let items = chunks
                    .into_iter()
                    .map(|c| RetrievedItem::Document {
                        content: c.content,
                        metadata: c.metadata,
                        score: c.score,
                    })
                    .collect();
                assemble::assemble(items, SourceKind::KnowledgeBase)
            }
        };

        // 3) Short-circuit: no context, no model call.
        if let Some(refusal) = bundle.refusal {
            info!(source = bundle.source.as_str(), "no usable context, refusing");
            return Ok(refusal_answer(refusal, &bundle));
        }

        // 4) Window history and build the grounded prompt.
        let windowed = history::window(history_turns, self.cfg.history_max_turns)?;
        let messages = prompt::build_messages(message, &windowed, &bundle.rendered_text);

        // 5) One model call, no retries.
        let answer_text = self.model.complete(&messages).await?;

        info!(
            source = bundle.source.as_str(),
            items = bundle.items.len(),
            avg_relevance = bundle.average_relevance,
            tier = bundle.tier.as_str(),
            "answer generated"
        );

        Ok(success_answer(answer_text, bundle))
    }
}

fn refusal_answer(refusal: &str, bundle: &ContextBundle) -> ChatAnswer {
    ChatAnswer {
        message: refusal.to_string(),
        context: None,
        source: bundle.source,
        relevance: bundle.tier,
        average_relevance: bundle.average_relevance,
        subjects: None,
        question_details: None,
        no_context: true,
    }
}

fn success_answer(message: String, bundle: ContextBundle) -> ChatAnswer {
    let (subjects, question_details) = match bundle.source {
        SourceKind::PracticeQuestions => {
            let mut subjects: Vec<String> = Vec::new();
            let mut details = Vec::new();
            for item in &bundle.items {
                if let RetrievedItem::Practice { record, score } = item {
                    if !subjects.contains(&record.subject) {
                        subjects.push(record.subject.clone());
                    }
                    details.push(QuestionDetail {
                        id: record.id.clone(),
                        subject: record.subject.clone(),
                        topic: record.topic.clone(),
                        year: record.year,
                        difficulty: record.difficulty.clone(),
                        marks: record.marks,
                        relevance_score: *score,
                    });
                }
            }
            (Some(subjects), Some(details))
        }
        SourceKind::KnowledgeBase => (None, None),
    };

    ChatAnswer {
        message,
        context: Some(bundle.rendered_text),
        source: bundle.source,
        relevance: bundle.tier,
        average_relevance: bundle.average_relevance,
        subjects,
        question_details,
        no_context: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use llm_service::ChatMessage;
    use serde_json::json;

    use crate::practice::fixture_record;

    struct StubRetriever {
        chunks: Vec<ScoredChunk>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl KnowledgeRetriever for StubRetriever {
        async fn similarity_search(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<ScoredChunk>, ChatEngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.chunks.clone())
        }
    }

    struct StubModel {
        answer: String,
        calls: AtomicUsize,
        fail_with: Option<fn() -> ChatEngineError>,
    }

    #[async_trait]
    impl ChatModel for StubModel {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ChatEngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                Some(make) => Err(make()),
                None => Ok(self.answer.clone()),
            }
        }
    }

    fn chunk(content: &str, score: f32) -> ScoredChunk {
        ScoredChunk { content: content.to_string(), metadata: json!({}), score }
    }

    fn pipeline(
        chunks: Vec<ScoredChunk>,
        fail_with: Option<fn() -> ChatEngineError>,
    ) -> (ChatPipeline, Arc<StubRetriever>, Arc<StubModel>) {
        let retriever =
            Arc::new(StubRetriever { chunks, calls: AtomicUsize::new(0) });
        let model = Arc::new(StubModel {
            answer: "stub answer".to_string(),
            calls: AtomicUsize::new(0),
            fail_with,
        });
        let dataset = DatasetHandle::Fixed(Arc::new(practice::PracticeDataset::from_records(vec![
            fixture_record("q1", "Mathematics", "Calculus"),
            fixture_record("q2", "Physics", "Waves"),
        ])));
        let p = ChatPipeline::new(
            retriever.clone(),
            model.clone(),
            dataset,
            PipelineConfig::default(),
        );
        (p, retriever, model)
    }

    #[tokio::test]
    async fn zero_matches_refuse_without_model_call() {
        let (p, retriever, model) = pipeline(Vec::new(), None);

        let answer = p.answer("what is CBC?", &[]).await.unwrap();

        assert!(answer.no_context);
        assert_eq!(answer.average_relevance, 0.0);
        assert!(answer.context.is_none());
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn high_average_yields_high_relevance() {
        let (p, _, model) =
            pipeline(vec![chunk("fact one", 0.84), chunk("fact two", 0.80)], None);

        let answer = p.answer("what is CBC?", &[]).await.unwrap();

        assert_eq!(answer.message, "stub answer");
        assert_eq!(answer.relevance, RelevanceTier::High);
        assert!((answer.average_relevance - 0.82).abs() < 1e-6);
        assert_eq!(answer.source, SourceKind::KnowledgeBase);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn specific_requests_use_the_practice_dataset() {
        let (p, retriever, _) = pipeline(Vec::new(), None);

        let answer = p.answer("show me a maths question", &[]).await.unwrap();

        assert_eq!(answer.source, SourceKind::PracticeQuestions);
        assert!(!answer.no_context);
        // The maths record wins on subject boost + similarity.
        assert_eq!(answer.subjects.as_ref().unwrap()[0], "Mathematics");
        let details = answer.question_details.unwrap();
        assert_eq!(details[0].id, "q1");
        // The lexical path never touches the vector store.
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_history_fails_before_the_model_call() {
        let (p, _, model) = pipeline(vec![chunk("fact", 0.9)], None);
        let turns = vec![ConversationTurn {
            id: None,
            role: "operator".to_string(),
            content: "hello".to_string(),
            timestamp: None,
        }];

        let err = p.answer("what is CBC?", &turns).await.unwrap_err();

        assert!(matches!(err, ChatEngineError::InvalidHistory(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn model_configuration_errors_propagate() {
        let (p, _, _) = pipeline(
            vec![chunk("fact", 0.9)],
            Some(|| ChatEngineError::NotConfigured("missing key".into())),
        );

        let err = p.answer("what is CBC?", &[]).await.unwrap_err();
        assert!(matches!(err, ChatEngineError::NotConfigured(_)));
    }
}
