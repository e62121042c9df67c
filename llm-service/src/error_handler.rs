//! Unified error handling for `llm-service`.
//!
//! One top-level [`LlmError`] for the whole crate, with provider-specific
//! failures grouped under [`ProviderError`]. All messages carry the
//! `[LLM Service]` prefix to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Top-level error for the `llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider-level failures (auth, protocol, decoding).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Configuration value was missing or malformed at load time.
    #[error("[LLM Service] invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LlmError {
    /// True when the failure indicates missing or invalid credentials.
    ///
    /// Callers use this to report a distinct "service not configured"
    /// condition instead of a generic failure. Detection combines the typed
    /// [`ProviderErrorKind::MissingApiKey`] case with status/message
    /// heuristics for upstream rejections.
    pub fn is_configuration(&self) -> bool {
        let LlmError::Provider(p) = self else {
            return false;
        };
        match &p.kind {
            ProviderErrorKind::MissingApiKey => true,
            ProviderErrorKind::HttpStatus { status, snippet, .. } => {
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN {
                    return true;
                }
                let lower = snippet.to_lowercase();
                lower.contains("api key") || lower.contains("invalid_api_key")
            }
            _ => false,
        }
    }
}

/// A failure attributed to a specific provider.
#[derive(Debug, Error)]
#[error("[LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    /// Which provider produced the failure.
    pub provider: crate::config::llm_provider::LlmProvider,
    /// What went wrong.
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: crate::config::llm_provider::LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/// Provider failure categories shared by all backends.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// The profile requires an API key and none was configured.
    #[error("API key not configured")]
    MissingApiKey,

    /// The endpoint is empty or does not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream returned a non-successful HTTP status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Chat completion succeeded but contained no choices.
    #[error("completion contained no choices")]
    EmptyChoices,

    /// Embedding call succeeded but returned no vectors.
    #[error("embedding response was empty")]
    EmptyEmbedding,
}

/// Clamp an upstream error body to a log-friendly snippet.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 300;
    let trimmed = text.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while end > 0 && !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}
