//! Shared LLM access layer with two logical profiles: **chat** and **embedding**.
//!
//! Providers (OpenAI, Ollama) sit behind thin non-streaming HTTP clients with
//! unified error types. Construct [`service_profiles::LlmServiceProfiles`]
//! once, wrap it in `Arc`, and pass clones to dependents.
//!
//! Credentials are validated lazily, when a profile is first used, so a
//! misconfigured deployment boots fine and reports the problem per request.

pub mod config;
pub mod error_handler;
pub mod message;
pub mod service_profiles;
pub mod services;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{LlmError, ProviderError, ProviderErrorKind};
pub use message::{ChatMessage, ChatRole};
pub use service_profiles::LlmServiceProfiles;
