//! Prompt builder: grounding persona + windowed history + context + question.

use llm_service::ChatMessage;

/// Fixed persona constraining the model to the supplied context.
///
/// Keep this short: it consistently improves steering without wasting tokens.
pub const SYSTEM_PROMPT: &str = "\
You are a helpful study assistant for exam preparation. \
Answer using only the supplied context; if the context is insufficient, \
say so instead of guessing. Keep answers clear and concise.";

/// Compose the full message sequence for one completion call.
///
/// Layout: system persona, then the windowed history in order, then one
/// user message carrying the rendered context and the question.
pub fn build_messages(
    question: &str,
    history: &[ChatMessage],
    context: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    messages.extend_from_slice(history);
    messages.push(ChatMessage::user(format!(
        "Context:\n{}\n\nQuestion:\n{}",
        context.trim(),
        question.trim()
    )));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_service::ChatRole;

    #[test]
    fn layout_is_system_history_user() {
        let history = vec![ChatMessage::user("earlier"), ChatMessage::assistant("reply")];
        let messages = build_messages("What is RAG?", &history, "RAG is retrieval + generation.");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].content, "earlier");
        assert_eq!(messages[2].content, "reply");
        assert_eq!(messages[3].role, ChatRole::User);
        assert!(messages[3].content.contains("Context:"));
        assert!(messages[3].content.contains("RAG is retrieval + generation."));
        assert!(messages[3].content.contains("What is RAG?"));
    }
}
