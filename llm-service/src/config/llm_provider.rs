/// Represents the provider (backend) used for LLM inference and embeddings.
///
/// Adding more providers in the future (e.g., Anthropic, Mistral API) can be
/// done by extending this enum and the matching service module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI's hosted API.
    OpenAi,
    /// Local Ollama runtime for on-device inference.
    Ollama,
}

impl LlmProvider {
    /// Parses a provider name from configuration (case-insensitive).
    ///
    /// Returns `None` for unknown names so callers can report the offending
    /// value themselves.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" | "open_ai" | "chatgpt" => Some(Self::OpenAi),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "OpenAI"),
            Self::Ollama => write!(f, "Ollama"),
        }
    }
}
