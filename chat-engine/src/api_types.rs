//! Public API types re-used by external crates (e.g., the HTTP layer).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::practice::PracticeRecord;

/// One turn of the conversation as supplied by the caller.
///
/// The role is kept as raw text at this boundary; history windowing
/// validates it and rejects unknown roles.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    #[serde(default)]
    pub id: Option<String>,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Which retrieval path produced the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Lexical matching over the local practice dataset.
    PracticeQuestions,
    /// Similarity search against the vector store.
    KnowledgeBase,
}

impl SourceKind {
    /// Wire name surfaced as `dataSource`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PracticeQuestions => "practice_questions",
            Self::KnowledgeBase => "knowledge_base",
        }
    }
}

/// Coarse confidence bucket derived from the average similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceTier {
    High,
    Medium,
    Low,
}

impl RelevanceTier {
    /// Bucket an average score: > 0.7 high, ≥ 0.5 medium, else low.
    ///
    /// Exactly 0.5 lands in medium (the boundary belongs to the bucket
    /// below the strict high cut).
    pub fn from_average(avg: f32) -> Self {
        if avg > 0.7 {
            Self::High
        } else if avg >= 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A document chunk returned by the vector retriever.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub content: String,
    pub metadata: Value,
    pub score: f32,
}

/// A scored piece of evidence from either retrieval path.
///
/// The assembler operates purely on the shared capability (`score`,
/// `render`), never on the concrete variant.
#[derive(Debug, Clone)]
pub enum RetrievedItem {
    Document { content: String, metadata: Value, score: f32 },
    Practice { record: PracticeRecord, score: f32 },
}

impl RetrievedItem {
    pub fn score(&self) -> f32 {
        match self {
            Self::Document { score, .. } => *score,
            Self::Practice { score, .. } => *score,
        }
    }

    /// Human-readable context block for this item.
    pub fn render(&self) -> String {
        match self {
            Self::Document { content, .. } => content.clone(),
            Self::Practice { record, score } => record.render_block(*score),
        }
    }
}

/// The assembled, scored evidence passed to the generation step.
///
/// Created fresh per request; never cached across requests.
#[derive(Debug, Clone)]
pub struct ContextBundle {
    pub source: SourceKind,
    pub rendered_text: String,
    pub items: Vec<RetrievedItem>,
    pub average_relevance: f32,
    pub tier: RelevanceTier,
    /// Fixed, source-specific message when there is nothing to ground an
    /// answer in. A refused bundle must never reach the model.
    pub refusal: Option<&'static str>,
}

impl ContextBundle {
    pub fn refused(&self) -> bool {
        self.refusal.is_some()
    }
}

/// Per-item summary of a matched practice question.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    pub id: String,
    pub subject: String,
    pub topic: String,
    pub year: i32,
    pub difficulty: String,
    pub marks: u32,
    pub relevance_score: f32,
}

/// Terminal artifact of the pipeline, mapped 1:1 to the HTTP response.
#[derive(Debug, Clone)]
pub struct ChatAnswer {
    /// Model answer, or the fixed refusal message.
    pub message: String,
    /// Rendered context that grounded the answer (absent when refused).
    pub context: Option<String>,
    pub source: SourceKind,
    pub relevance: RelevanceTier,
    pub average_relevance: f32,
    /// Distinct subjects of the matched practice items (practice path only).
    pub subjects: Option<Vec<String>>,
    /// Matched practice item summaries (practice path only).
    pub question_details: Option<Vec<QuestionDetail>>,
    /// True when no usable context existed and the model was not invoked.
    pub no_context: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(RelevanceTier::from_average(0.71), RelevanceTier::High);
        assert_eq!(RelevanceTier::from_average(0.7), RelevanceTier::Medium);
        assert_eq!(RelevanceTier::from_average(0.5), RelevanceTier::Medium);
        assert_eq!(RelevanceTier::from_average(0.3), RelevanceTier::Low);
    }
}
