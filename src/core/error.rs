//! Custom error types for Counsel
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Counsel operations
#[derive(Error, Debug)]
pub enum CounselError {
    /// Model provider connection or API errors
    #[error("Provider error: {0}")]
    Provider(String),

    /// Tool execution errors
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A message of the wrong role was found where the graph needed another
    #[error("Expected {expected} message in output edges, but got {found}")]
    UnexpectedMessage {
        expected: &'static str,
        found: String,
    },

    /// Model identifier names a provider we do not support
    #[error("Unsupported model provider '{0}'. Use one of: anthropic, openai, ollama")]
    UnknownProvider(String),

    /// API key required by a provider is not set
    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for Counsel operations
pub type Result<T> = std::result::Result<T, CounselError>;

impl CounselError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
