//! Shared LLM service with two active profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - Missing credentials surface on first use of a profile, not at startup,
//!   so the server boots and reports the condition per request.

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;
use tracing::info;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::LlmError,
    message::ChatMessage,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Shared service managing the **chat** and **embedding** profiles.
///
/// Internally caches OpenAI/Ollama clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,

    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
}

impl LlmServiceProfiles {
    /// Creates the service from explicit profile configs.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Self {
        info!(
            chat_provider = %chat.provider,
            chat_model = %chat.model,
            embedding_provider = %embedding.provider,
            embedding_model = %embedding.model,
            "LlmServiceProfiles created"
        );
        Self {
            chat,
            embedding,
            openai: RwLock::new(HashMap::new()),
            ollama: RwLock::new(HashMap::new()),
        }
    }

    /// Builds both profiles from environment variables with defaults.
    ///
    /// Variables:
    /// - `LLM_PROVIDER` — `openai` (default) or `ollama`
    /// - `LLM_MODEL` — chat model id, default `gpt-5-nano`
    /// - `EMBEDDING_MODEL` — default `text-embedding-3-small`
    /// - `OPENAI_API_KEY` — key for OpenAI profiles (checked on first use)
    /// - `OPENAI_URL` — default `https://api.openai.com`
    /// - `OLLAMA_URL` — default `http://localhost:11434`
    /// - `LLM_MAX_TOKENS`, `LLM_TEMPERATURE`, `LLM_TIMEOUT_SECS` — optional knobs
    ///
    /// # Errors
    /// Returns [`LlmError::InvalidConfig`] for an unknown `LLM_PROVIDER`.
    pub fn from_env() -> Result<Self, LlmError> {
        let provider_name = env_or("LLM_PROVIDER", "openai");
        let provider = LlmProvider::from_name(&provider_name)
            .ok_or_else(|| LlmError::InvalidConfig(format!("unsupported LLM_PROVIDER: {provider_name}")))?;

        let endpoint = match provider {
            LlmProvider::OpenAi => env_or("OPENAI_URL", "https://api.openai.com"),
            LlmProvider::Ollama => env_or("OLLAMA_URL", "http://localhost:11434"),
        };
        let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());

        let chat = LlmModelConfig {
            provider,
            model: env_or("LLM_MODEL", "gpt-5-nano"),
            endpoint: endpoint.clone(),
            api_key: api_key.clone(),
            max_tokens: parse_opt("LLM_MAX_TOKENS"),
            temperature: parse_opt("LLM_TEMPERATURE"),
            top_p: None,
            timeout_secs: parse_opt("LLM_TIMEOUT_SECS"),
        };

        let embedding = LlmModelConfig {
            model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),
            max_tokens: None,
            temperature: None,
            ..chat.clone()
        };

        Ok(Self::new(chat, embedding))
    }

    /// Sends a chat completion through the **chat** profile.
    ///
    /// # Errors
    /// Returns [`LlmError`]; use [`LlmError::is_configuration`] to detect
    /// credential problems.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        match self.chat.provider {
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.chat).await?;
                cli.chat(messages).await
            }
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.chat).await?;
                cli.chat(messages).await
            }
        }
    }

    /// Computes one embedding through the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        let mut rows = self.embed_batch(std::slice::from_ref(&input.to_string())).await?;
        rows.pop().ok_or_else(|| LlmError::InvalidConfig("empty embedding batch".into()))
    }

    /// Computes embeddings for a batch of inputs, aligned with the input order.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        match self.embedding.provider {
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(inputs).await
            }
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embeddings(inputs).await
            }
        }
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, LlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        // Construct outside the map so a failure (missing key) is returned,
        // not cached.
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        let mut w = self.openai.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, LlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        let mut w = self.ollama.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }
}

fn env_or(key: &str, dflt: &str) -> String {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| dflt.to_string())
}

fn parse_opt<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        self.api_key.hash(state);
        self.timeout.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(provider: LlmProvider, api_key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: "gpt-5-nano".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: api_key.map(|s| s.to_string()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn missing_key_surfaces_on_first_chat() {
        let svc = LlmServiceProfiles::new(
            profile(LlmProvider::OpenAi, None),
            profile(LlmProvider::OpenAi, None),
        );
        let err = svc.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn empty_embed_batch_is_noop() {
        let svc = LlmServiceProfiles::new(
            profile(LlmProvider::OpenAi, None),
            profile(LlmProvider::OpenAi, None),
        );
        // No inputs means no client is constructed, so no credential error.
        let rows = svc.embed_batch(&[]).await.unwrap();
        assert!(rows.is_empty());
    }
}
