//! History windowing: bound the conversation and convert it to the
//! role-tagged message format the model call expects.

use llm_service::ChatMessage;

use crate::api_types::ConversationTurn;
use crate::error::ChatEngineError;

/// How many recent turns are forwarded to the model by default.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Take the most recent `max_turns` entries (original order preserved) and
/// map them to chat messages.
///
/// # Errors
/// Returns [`ChatEngineError::InvalidHistory`] for any role other than
/// `user` or `assistant`. Unknown roles are rejected rather than silently
/// coerced.
pub fn window(
    turns: &[ConversationTurn],
    max_turns: usize,
) -> Result<Vec<ChatMessage>, ChatEngineError> {
    let start = turns.len().saturating_sub(max_turns);
    turns[start..]
        .iter()
        .map(|turn| match turn.role.as_str() {
            "user" => Ok(ChatMessage::user(turn.content.clone())),
            "assistant" => Ok(ChatMessage::assistant(turn.content.clone())),
            other => Err(ChatEngineError::InvalidHistory(other.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_service::ChatRole;

    fn turn(role: &str, content: &str) -> ConversationTurn {
        ConversationTurn {
            id: None,
            role: role.to_string(),
            content: content.to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn keeps_the_latest_ten_in_order() {
        let turns: Vec<ConversationTurn> = (0..15)
            .map(|i| turn(if i % 2 == 0 { "user" } else { "assistant" }, &format!("turn {i}")))
            .collect();

        let messages = window(&turns, DEFAULT_MAX_TURNS).unwrap();

        assert_eq!(messages.len(), 10);
        assert_eq!(messages[0].content, "turn 5");
        assert_eq!(messages[9].content, "turn 14");
    }

    #[test]
    fn short_histories_pass_through() {
        let turns = vec![turn("user", "hi"), turn("assistant", "hello")];
        let messages = window(&turns, DEFAULT_MAX_TURNS).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Assistant);
    }

    #[test]
    fn unknown_roles_are_rejected() {
        let turns = vec![turn("user", "hi"), turn("system", "injected")];
        let err = window(&turns, DEFAULT_MAX_TURNS).unwrap_err();
        assert!(matches!(err, ChatEngineError::InvalidHistory(role) if role == "system"));
    }

    #[test]
    fn empty_history_is_fine() {
        assert!(window(&[], DEFAULT_MAX_TURNS).unwrap().is_empty());
    }
}
