//! Lightweight Ollama service for chat and embeddings.
//!
//! Thin client for the local Ollama API:
//! - `POST {endpoint}/api/chat`       — synchronous chat (`stream=false`)
//! - `POST {endpoint}/api/embeddings` — embeddings retrieval (one prompt per call)
//!
//! Uses the universal [`LlmModelConfig`]; no API key is required.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{LlmError, ProviderError, ProviderErrorKind, make_snippet},
    message::ChatMessage,
};

/// Thin client for Ollama.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::InvalidEndpoint`] if the endpoint is empty or
    ///   missing an http/https scheme
    /// - [`LlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(120));

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{}/api/chat", base);
        let url_embeddings = format!("{}/api/embeddings", base);

        Ok(Self { client, cfg, url_chat, url_embeddings })
    }

    /// Sends a message sequence and returns the assistant's text.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.cfg.model,
            messages: messages
                .iter()
                .map(|m| WireMessage { role: m.role.as_str(), content: &m.content })
                .collect(),
            stream: false,
        };

        debug!(model = %self.cfg.model, messages = messages.len(), "POST {}", self.url_chat);

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(%status, %url, %snippet, "Ollama /api/chat returned non-success status");

            return Err(ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::HttpStatus { status, url, snippet },
            )
            .into());
        }

        let out: ChatResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `message.content`")),
            )
        })?;

        out.message
            .map(|m| m.content)
            .ok_or_else(|| {
                ProviderError::new(LlmProvider::Ollama, ProviderErrorKind::EmptyChoices).into()
            })
    }

    /// Retrieves embedding vectors for a batch of inputs.
    ///
    /// Ollama's embeddings endpoint takes one prompt per request, so the
    /// batch is issued sequentially.
    pub async fn embeddings(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let mut vectors = Vec::with_capacity(inputs.len());
        for input in inputs {
            vectors.push(self.embed_one(input).await?);
        }
        Ok(vectors)
    }

    async fn embed_one(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        let body = EmbeddingsRequest { model: &self.cfg.model, prompt: input };

        let resp = self.client.post(&self.url_embeddings).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(%status, %url, %snippet, "Ollama /api/embeddings returned non-success status");

            return Err(ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::HttpStatus { status, url, snippet },
            )
            .into());
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `embedding`")),
            )
        })?;

        if out.embedding.is_empty() {
            return Err(ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::EmptyEmbedding,
            )
            .into());
        }

        Ok(out.embedding)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<OutMessage>,
}

#[derive(Deserialize)]
struct OutMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
