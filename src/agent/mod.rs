//! Agent module - the ReAct cycle and conversation management
//!
//! A conversation is driven through a two-node graph: a model turn, then
//! (if the model asked for them) tool execution, then back to the model.

pub mod conversation;
pub mod graph;
pub mod intent;
pub mod loop_state;
pub mod orchestrator;
pub mod prompts;
pub mod router;
pub mod turn;

pub use conversation::Conversation;
pub use graph::{Node, ReactGraph};
pub use intent::{classify, Intent};
pub use loop_state::AgentState;
pub use orchestrator::Agent;
pub use prompts::{PromptKind, SystemPrompt};
pub use router::{route_model_output, Route};
