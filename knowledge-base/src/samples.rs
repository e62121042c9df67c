//! Canned sample documents used by the initialize endpoint.

use serde_json::json;

use crate::structs::document::DocumentInput;

/// Sample documents for seeding a fresh knowledge base.
pub fn sample_documents() -> Vec<DocumentInput> {
    vec![
        DocumentInput {
            page_content: "Retrieval-augmented generation (RAG) combines information retrieval \
                           with language generation. It retrieves relevant documents from a \
                           knowledge base and uses them as context for generating more accurate \
                           and informed responses."
                .to_string(),
            metadata: json!({
                "source": "ai-concepts",
                "type": "definition",
                "category": "rag",
                "tags": ["ai", "rag", "retrieval", "generation"]
            }),
        },
        DocumentInput {
            page_content: "Vector embeddings are high-dimensional numerical representations of \
                           data that capture semantic meaning. They enable similarity search by \
                           measuring distances between vectors in the embedding space."
                .to_string(),
            metadata: json!({
                "source": "ai-concepts",
                "type": "definition",
                "category": "embeddings",
                "tags": ["ai", "embeddings", "vectors"]
            }),
        },
        DocumentInput {
            page_content: "Qdrant is a vector database that stores points consisting of a dense \
                           vector and a JSON payload. It supports filtered k-NN search with \
                           several distance metrics, including cosine similarity."
                .to_string(),
            metadata: json!({
                "source": "qdrant-docs",
                "type": "overview",
                "category": "database",
                "tags": ["database", "vector-search", "qdrant"]
            }),
        },
        DocumentInput {
            page_content: "OpenAI's text-embedding-3-small model provides high-quality embeddings \
                           with 1536 dimensions. It is cost-effective and suitable for most \
                           semantic search applications, offering a good balance between \
                           performance and price."
                .to_string(),
            metadata: json!({
                "source": "openai-docs",
                "type": "technical",
                "category": "embeddings",
                "tags": ["openai", "embeddings", "api"]
            }),
        },
        DocumentInput {
            page_content: "Spaced repetition is a study technique that schedules reviews of \
                           learned material at increasing intervals. Reviewing a topic just \
                           before it would be forgotten strengthens long-term retention and is \
                           especially effective for exam preparation."
                .to_string(),
            metadata: json!({
                "source": "study-skills",
                "type": "concept",
                "category": "learning",
                "tags": ["study", "memory", "exam-prep"]
            }),
        },
        DocumentInput {
            page_content: "Past-paper practice under timed conditions is one of the most reliable \
                           predictors of exam performance. It trains retrieval under pressure, \
                           exposes gaps in understanding, and familiarizes students with mark \
                           schemes and question phrasing."
                .to_string(),
            metadata: json!({
                "source": "study-skills",
                "type": "concept",
                "category": "learning",
                "tags": ["study", "practice", "exam-prep"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_have_content_and_category() {
        let docs = sample_documents();
        assert!(!docs.is_empty());
        for doc in docs {
            assert!(!doc.page_content.trim().is_empty());
            assert!(doc.metadata.get("category").is_some());
        }
    }
}
