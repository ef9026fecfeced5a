//! LLM module - Language Model integrations
//!
//! Provides the provider abstraction plus Anthropic, OpenAI-compatible and
//! Ollama backends.

pub mod ollama;
pub mod provider;
pub mod traits;

pub use ollama::OllamaClient;
pub use provider::anthropic::AnthropicClient;
pub use provider::openai::OpenAIClient;
pub use provider::{create_provider, ModelId, ProviderType};
pub use traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};
