//! Context assembler: merges retrieved items into a single context string,
//! computes the aggregate relevance, and decides whether to answer at all.

use crate::api_types::{ContextBundle, RelevanceTier, RetrievedItem, SourceKind};

/// Refusal shown when the lexical path found nothing renderable.
pub const NO_PRACTICE_MESSAGE: &str =
    "I couldn't find any specific practice items matching your request. \
     Try asking about a different subject or topic.";

/// Refusal shown when the vector path found nothing renderable.
pub const NO_KNOWLEDGE_MESSAGE: &str =
    "I don't have any relevant knowledge-base information for that question. \
     Try adding documents to the knowledge base or rephrasing.";

/// Assemble retrieved items into a context bundle.
///
/// Items are rendered in ranked order, separated by a blank line. The
/// average relevance is the arithmetic mean of the item scores (0 when
/// empty). A blank rendering marks the bundle refused; the orchestrator
/// must not spend a model call on it.
pub fn assemble(items: Vec<RetrievedItem>, source: SourceKind) -> ContextBundle {
    let rendered_text =
        items.iter().map(RetrievedItem::render).collect::<Vec<_>>().join("\n\n");

    let average_relevance = if items.is_empty() {
        0.0
    } else {
        items.iter().map(RetrievedItem::score).sum::<f32>() / items.len() as f32
    };

    let refusal = rendered_text.trim().is_empty().then(|| match source {
        SourceKind::PracticeQuestions => NO_PRACTICE_MESSAGE,
        SourceKind::KnowledgeBase => NO_KNOWLEDGE_MESSAGE,
    });

    ContextBundle {
        source,
        rendered_text,
        average_relevance,
        tier: RelevanceTier::from_average(average_relevance),
        items,
        refusal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(content: &str, score: f32) -> RetrievedItem {
        RetrievedItem::Document { content: content.to_string(), metadata: json!({}), score }
    }

    #[test]
    fn empty_items_refuse_with_zero_relevance() {
        let bundle = assemble(Vec::new(), SourceKind::KnowledgeBase);
        assert_eq!(bundle.average_relevance, 0.0);
        assert!(bundle.refused());
        assert_eq!(bundle.refusal, Some(NO_KNOWLEDGE_MESSAGE));
        assert_eq!(bundle.tier, RelevanceTier::Low);
    }

    #[test]
    fn refusal_message_depends_on_source() {
        let bundle = assemble(Vec::new(), SourceKind::PracticeQuestions);
        assert_eq!(bundle.refusal, Some(NO_PRACTICE_MESSAGE));
    }

    #[test]
    fn average_is_the_mean_of_scores() {
        let bundle = assemble(
            vec![doc("first", 0.8), doc("second", 0.6)],
            SourceKind::KnowledgeBase,
        );
        assert!((bundle.average_relevance - 0.7).abs() < 1e-6);
        assert!(!bundle.refused());
    }

    #[test]
    fn items_render_in_order_with_blank_line_separator() {
        let bundle = assemble(
            vec![doc("first chunk", 0.9), doc("second chunk", 0.8)],
            SourceKind::KnowledgeBase,
        );
        assert_eq!(bundle.rendered_text, "first chunk\n\nsecond chunk");
    }

    #[test]
    fn blank_content_refuses_even_with_items() {
        let bundle = assemble(vec![doc("   ", 0.9)], SourceKind::KnowledgeBase);
        assert!(bundle.refused());
    }
}
