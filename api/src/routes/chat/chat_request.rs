use serde::{Deserialize, Serialize};

use chat_engine::{ChatAnswer, ConversationTurn, QuestionDetail};

/// Request payload for POST /api/chat.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// User message. Required; an absent or blank message is rejected.
    #[serde(default)]
    pub message: String,
    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

/// Response payload for POST /api/chat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Model answer, or the fixed refusal message.
    pub message: String,

    /// Rendered context that grounded the answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    pub data_source: String,
    pub relevance: String,

    /// Average relevance formatted with two decimals (e.g. "0.82").
    pub avg_relevance: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_details: Option<Vec<QuestionDetail>>,

    /// Present (true) only when no usable context existed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_context: Option<bool>,
}

impl From<ChatAnswer> for ChatResponse {
    fn from(answer: ChatAnswer) -> Self {
        Self {
            message: answer.message,
            context: answer.context,
            data_source: answer.source.as_str().to_string(),
            relevance: answer.relevance.as_str().to_string(),
            avg_relevance: format!("{:.2}", answer.average_relevance),
            subjects: answer.subjects,
            question_details: answer.question_details,
            no_context: answer.no_context.then_some(true),
        }
    }
}
