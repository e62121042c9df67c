use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM profile (a model behind an endpoint).
///
/// The same struct is used for chat and embedding profiles; fields that a
/// provider does not support are ignored by its client.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend (e.g., OpenAI, Ollama).
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-5-nano"`, `"text-embedding-3-small"`).
    pub model: String,

    /// Inference endpoint (remote API URL or local socket URL).
    pub endpoint: String,

    /// Optional API key for providers that require authentication.
    ///
    /// Absence is not a constructor error for the profile facade; the
    /// provider client reports it when the profile is actually used.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
