//! Counsel - Legal Drafting Assistant
//!
//! A ReAct-style agent for legal drafting: it picks a system prompt from the
//! user's request, calls a chat model with two tools bound (web search and
//! `.docx` creation), and loops until the model answers without tool calls or
//! the step budget runs out.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Provider abstraction with Anthropic, OpenAI-compatible and Ollama clients
//! - **Tools**: Web search and Word document creation
//! - **Agent**: Prompt bank, intent classification, the model/tool graph
//! - **CLI**: Command-line interface and REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use counsel::{Agent, Config};
//!
//! #[tokio::main]
//! async fn main() -> counsel::Result<()> {
//!     let mut agent = Agent::with_config(&Config::load())?;
//!     let response = agent.process("What is a force majeure clause?").await?;
//!     println!("{}", response);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
pub mod tools;

// Re-export commonly used items
pub use agent::Agent;
pub use cli::Repl;
pub use core::{Config, CounselError, Result};
