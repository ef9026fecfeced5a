//! LLM Provider implementations and factory
//!
//! The provider is chosen from the `provider/model` identifier in the config.

pub mod anthropic;
pub mod openai;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::{Config, CounselError, Result};
use crate::llm::traits::LLMProvider;
use crate::llm::OllamaClient;

use self::anthropic::AnthropicClient;
use self::openai::OpenAIClient;

/// Supported model backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Anthropic,
    OpenAI,
    Ollama,
}

impl FromStr for ProviderType {
    type Err = CounselError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderType::Anthropic),
            "openai" => Ok(ProviderType::OpenAI),
            "ollama" => Ok(ProviderType::Ollama),
            other => Err(CounselError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Anthropic => write!(f, "anthropic"),
            ProviderType::OpenAI => write!(f, "openai"),
            ProviderType::Ollama => write!(f, "ollama"),
        }
    }
}

/// A fully specified model name such as `anthropic/claude-3-5-haiku-latest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    pub provider: ProviderType,
    pub model: String,
}

impl ModelId {
    /// Split on the first `/`; the model part may itself contain slashes
    pub fn parse(fully_specified: &str) -> Result<Self> {
        let (provider, model) = fully_specified.split_once('/').ok_or_else(|| {
            CounselError::config(format!(
                "model '{}' must be written as provider/model",
                fully_specified
            ))
        })?;

        if model.is_empty() {
            return Err(CounselError::config(format!(
                "model '{}' has an empty model name",
                fully_specified
            )));
        }

        Ok(Self {
            provider: provider.parse()?,
            model: model.to_string(),
        })
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Create a new LLM provider for the configured model
pub fn create_provider(config: &Config) -> Result<(Arc<dyn LLMProvider>, ModelId)> {
    let model_id = ModelId::parse(&config.model.model)?;
    let provider: Arc<dyn LLMProvider> = match model_id.provider {
        ProviderType::Anthropic => Arc::new(AnthropicClient::from_config(config)?),
        ProviderType::OpenAI => Arc::new(OpenAIClient::from_config(config)?),
        ProviderType::Ollama => Arc::new(OllamaClient::from_config(config)?),
    };
    tracing::debug!(provider = provider.name(), model = %model_id.model, "created provider");
    Ok((provider, model_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_id() {
        let id = ModelId::parse("anthropic/claude-3-5-haiku-latest").unwrap();
        assert_eq!(id.provider, ProviderType::Anthropic);
        assert_eq!(id.model, "claude-3-5-haiku-latest");
        assert_eq!(id.to_string(), "anthropic/claude-3-5-haiku-latest");
    }

    #[test]
    fn test_model_part_keeps_slashes() {
        let id = ModelId::parse("openai/meta-llama/Llama-3-70b").unwrap();
        assert_eq!(id.provider, ProviderType::OpenAI);
        assert_eq!(id.model, "meta-llama/Llama-3-70b");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ModelId::parse("claude"),
            Err(CounselError::Config(_))
        ));
        assert!(matches!(
            ModelId::parse("mistral/large"),
            Err(CounselError::UnknownProvider(p)) if p == "mistral"
        ));
        assert!(ModelId::parse("ollama/").is_err());
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let mut config = Config::default();
        config.model.model = "ollama/qwen3:8b".to_string();
        let (provider, id) = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(id.model, "qwen3:8b");
    }
}
