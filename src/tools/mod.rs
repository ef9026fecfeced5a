//! Tools module - Tool implementations for the agent
//!
//! Contains web search, Word document generation, and the tool registry.

pub mod document;
pub mod registry;
pub mod search;

pub use document::DocumentWriter;
pub use registry::{ToolRegistry, CREATE_DOCUMENT_TOOL, SEARCH_TOOL};
pub use search::{SearchResult, WebSearch};
