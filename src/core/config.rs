//! Configuration management for Counsel
//!
//! Supports environment variables, config files, and runtime overrides.
//! The model is selected with a `provider/model` identifier.
//!
//! Config file location: ~/.config/counsel/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::agent::prompts::{PromptKind, SystemPrompt};
use crate::core::error::{CounselError, Result};

/// Main configuration for Counsel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model selection
    pub model: ModelConfig,
    /// Per-provider connection settings
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Agent behavior configuration
    pub agent: AgentConfig,
    /// Document output configuration
    #[serde(default)]
    pub documents: DocumentConfig,
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Fully specified model name, `provider/model`
    /// Default: anthropic/claude-3-5-haiku-latest
    pub model: String,
}

/// Connection settings for every supported provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    #[serde(default)]
    pub openai: OpenAIConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Anthropic Messages API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Upper bound on generated tokens per turn
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

/// OpenAI-compatible Chat Completions settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

/// Ollama server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Host address (default: localhost)
    pub host: String,
    /// Port number (default: 11434)
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of results returned per query
    /// Default: 10
    pub max_search_results: usize,
    /// Search API endpoint
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of graph steps (model and tool turns) per request
    /// Default: 25
    pub max_steps: usize,
    /// Built-in prompt template to start from
    #[serde(default)]
    pub prompt_template: PromptKind,
    /// Custom system prompt; overrides `prompt_template` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Sampling temperature passed to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Document output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Directory generated documents are written to
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            providers: ProvidersConfig::default(),
            search: SearchConfig::default(),
            agent: AgentConfig::default(),
            documents: DocumentConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: env::var("COUNSEL_MODEL")
                .unwrap_or_else(|_| "anthropic/claude-3-5-haiku-latest".to_string()),
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(11434),
            timeout_secs: 120,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_search_results: env::var("COUNSEL_MAX_SEARCH_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            base_url: env::var("TAVILY_BASE_URL")
                .unwrap_or_else(|_| "https://api.tavily.com".to_string()),
            api_key_env: "TAVILY_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: env::var("COUNSEL_MAX_STEPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(25),
            prompt_template: PromptKind::Default,
            system_prompt: None,
            temperature: None,
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// Per-conversation settings, fixed for the lifetime of one conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    /// Fully specified `provider/model` name
    pub model: String,
    pub max_search_results: usize,
    pub system_prompt: SystemPrompt,
    pub max_steps: usize,
    pub temperature: Option<f32>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("counsel")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        match Self::load_from_file() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(CounselError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| CounselError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CounselError::config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to file and return the path
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| CounselError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CounselError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| CounselError::config(format!("Failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Check the values that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        if !self.model.model.contains('/') {
            return Err(CounselError::config(format!(
                "model '{}' must be written as provider/model",
                self.model.model
            )));
        }
        if self.agent.max_steps == 0 {
            return Err(CounselError::config("max_steps must be at least 1"));
        }
        if self.search.max_search_results == 0 {
            return Err(CounselError::config(
                "max_search_results must be at least 1",
            ));
        }
        Ok(())
    }

    /// Resolve the effective system prompt
    pub fn system_prompt(&self) -> SystemPrompt {
        match &self.agent.system_prompt {
            Some(custom) => SystemPrompt::Custom(custom.clone()),
            None => SystemPrompt::Template(self.agent.prompt_template),
        }
    }

    /// Snapshot the settings a single conversation runs with
    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            model: self.model.model.clone(),
            max_search_results: self.search.max_search_results,
            system_prompt: self.system_prompt(),
            max_steps: self.agent.max_steps,
            temperature: self.agent.temperature,
        }
    }

    /// Get the full Ollama API URL
    pub fn ollama_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.providers.ollama.host, self.providers.ollama.port
        )
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        toml::to_string_pretty(&Config::default())
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.documents.output_dir, PathBuf::from("."));
        assert_eq!(config.agent.prompt_template, PromptKind::Default);
        assert!(config.agent.system_prompt.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let toml_str = Config::default_config_toml();
        assert!(toml_str.contains("max_steps"));
        assert!(toml_str.contains("max_search_results"));

        let parsed = Config::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.agent.prompt_template, PromptKind::Default);
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [model]
            model = "openai/gpt-4o"

            [agent]
            max_steps = 5
            prompt_template = "contract"
            "#,
        )
        .unwrap();

        assert_eq!(config.model.model, "openai/gpt-4o");
        assert_eq!(config.agent.max_steps, 5);
        assert_eq!(
            config.system_prompt(),
            SystemPrompt::Template(PromptKind::Contract)
        );
        assert_eq!(config.providers.ollama.timeout_secs, 120);
    }

    #[test]
    fn test_custom_prompt_overrides_template() {
        let mut config = Config::default();
        config.agent.prompt_template = PromptKind::LegalResearch;
        config.agent.system_prompt = Some("Be brief. Time: {system_time}".to_string());

        let settings = config.agent_settings();
        assert_eq!(
            settings.system_prompt,
            SystemPrompt::Custom("Be brief. Time: {system_time}".to_string())
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.model.model = "gpt-4o".to_string();
        assert!(matches!(config.validate(), Err(CounselError::Config(_))));

        let mut config = Config::default();
        config.model.model = "anthropic/claude".to_string();
        config.agent.max_steps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ollama_url() {
        let mut config = Config::default();
        config.providers.ollama.host = "localhost".to_string();
        config.providers.ollama.port = 11434;
        assert_eq!(config.ollama_url(), "http://localhost:11434");
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("counsel"));
    }
}
