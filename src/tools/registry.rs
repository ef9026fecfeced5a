//! Tool registry - manages and dispatches tool calls
//!
//! Holds the tool definitions bound to the model and routes each tool call
//! to its handler. Tool failures are returned as failed [`ToolResult`]s so the
//! model can see them; they never abort the agent loop.

use serde::Deserialize;
use serde_json::json;

use crate::core::{Config, Result, ToolCall, ToolDefinition, ToolResult};
use crate::tools::document::DocumentWriter;
use crate::tools::search::WebSearch;

/// Name of the web search tool
pub const SEARCH_TOOL: &str = "search";

/// Name of the document creation tool
pub const CREATE_DOCUMENT_TOOL: &str = "create_word_doc";

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct CreateDocumentArgs {
    content: String,
    #[serde(default)]
    file_name: Option<String>,
}

/// Registry of available tools
pub struct ToolRegistry {
    /// Tool definitions in the order they are bound to the model
    definitions: Vec<ToolDefinition>,
    search: WebSearch,
    documents: DocumentWriter,
}

impl ToolRegistry {
    /// Create a registry with both tools
    pub fn new(search: WebSearch, documents: DocumentWriter) -> Self {
        Self {
            definitions: vec![Self::document_definition(), Self::search_definition()],
            search,
            documents,
        }
    }

    /// Create a registry from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            WebSearch::from_config(config)?,
            DocumentWriter::new(config.documents.output_dir.clone()),
        ))
    }

    fn document_definition() -> ToolDefinition {
        ToolDefinition::function(
            CREATE_DOCUMENT_TOOL,
            "Create a Word document with the given content and formatting.",
            json!({
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "Full body text of the document"
                    },
                    "file_name": {
                        "type": "string",
                        "description": "Output file name (default: draft.docx)"
                    }
                },
                "required": ["content"]
            }),
        )
    }

    fn search_definition() -> ToolDefinition {
        ToolDefinition::function(
            SEARCH_TOOL,
            "Search for general web results. Useful for finding statutes, case law, \
             legal precedents and answering questions about current events.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn documents(&self) -> &DocumentWriter {
        &self.documents
    }

    /// Execute a tool call
    pub async fn execute(&self, tool_call: &ToolCall) -> ToolResult {
        match tool_call.name.as_str() {
            SEARCH_TOOL => self.execute_search(tool_call).await,
            CREATE_DOCUMENT_TOOL => self.execute_create_document(tool_call),
            _ => ToolResult::failure(
                &tool_call.name,
                format!("Unknown tool: {}", tool_call.name),
            ),
        }
    }

    async fn execute_search(&self, tool_call: &ToolCall) -> ToolResult {
        let args: SearchArgs = match serde_json::from_value(tool_call.arguments.clone()) {
            Ok(args) => args,
            Err(e) => {
                return ToolResult::failure(SEARCH_TOOL, format!("Invalid arguments: {}", e))
            }
        };

        match self.search.search(&args.query).await {
            Some(results) => match serde_json::to_string(&results) {
                Ok(output) => ToolResult::success(SEARCH_TOOL, output),
                Err(e) => ToolResult::failure(SEARCH_TOOL, e.to_string()),
            },
            None => ToolResult::failure(SEARCH_TOOL, "Search returned no results."),
        }
    }

    fn execute_create_document(&self, tool_call: &ToolCall) -> ToolResult {
        let args: CreateDocumentArgs = match serde_json::from_value(tool_call.arguments.clone())
        {
            Ok(args) => args,
            Err(e) => {
                return ToolResult::failure(
                    CREATE_DOCUMENT_TOOL,
                    format!("Invalid arguments: {}", e),
                )
            }
        };

        match self
            .documents
            .create_word_doc(&args.content, args.file_name.as_deref())
        {
            Some(path) => ToolResult::success(CREATE_DOCUMENT_TOOL, path.display().to_string()),
            None => ToolResult::failure(CREATE_DOCUMENT_TOOL, "Error creating Word document."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn registry(output_dir: &std::path::Path) -> ToolRegistry {
        let search =
            WebSearch::new("http://127.0.0.1:9", None, 3, Duration::from_secs(1)).unwrap();
        ToolRegistry::new(search, DocumentWriter::new(output_dir))
    }

    #[test]
    fn test_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        let names: Vec<&str> = registry.definitions().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec![CREATE_DOCUMENT_TOOL, SEARCH_TOOL]);
    }

    #[tokio::test]
    async fn test_create_document_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let result = registry
            .execute(&ToolCall::new(
                CREATE_DOCUMENT_TOOL,
                json!({"content": "Body"}),
            ))
            .await;

        assert!(result.success);
        assert_eq!(
            result.output,
            dir.path().join("draft.docx").display().to_string()
        );
        assert!(dir.path().join("draft.docx").exists());
    }

    #[test]
    fn test_invalid_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let result = tokio_test::block_on(
            registry.execute(&ToolCall::new(CREATE_DOCUMENT_TOOL, json!({"file_name": "x"}))),
        );
        assert!(!result.success);
        assert!(result.output.contains("Invalid arguments"));
    }

    #[test]
    fn test_unknown_tool() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        let result = tokio_test::block_on(registry.execute(&ToolCall::new("send_email", json!({}))));
        assert!(!result.success);
        assert_eq!(result.output, "Unknown tool: send_email");
    }

    #[tokio::test]
    async fn test_search_failure_is_a_failed_result() {
        let dir = tempfile::tempdir().unwrap();
        let result = registry(dir.path())
            .execute(&ToolCall::new(SEARCH_TOOL, json!({"query": "lease law"})))
            .await;
        assert!(!result.success);
        assert_eq!(result.tool_name, SEARCH_TOOL);
    }
}
