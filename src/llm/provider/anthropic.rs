//! Anthropic Messages API client
//!
//! System messages are lifted into the top-level `system` field, tool calls
//! map to `tool_use` blocks and tool results to `tool_result` blocks.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::core::{Config, CounselError, Message, Result, Role, ToolCall, ToolDefinition};
use crate::llm::traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<AnthropicTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct AnthropicTool<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    id: String,
    model: String,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicClient {
    /// Create a client from configuration, reading the API key from the environment
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = &config.providers.anthropic;
        let api_key = std::env::var(&settings.api_key_env)
            .map_err(|_| CounselError::MissingApiKey(settings.api_key_env.clone()))?;

        Self::new(
            settings.base_url.clone(),
            api_key,
            settings.max_tokens,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_tokens,
        })
    }

    /// Split out the system prompt and convert the rest of the history.
    /// Consecutive messages that map to the same role are merged, since the
    /// API requires user and assistant turns to alternate.
    fn to_anthropic_messages(messages: &[Message]) -> (Option<String>, Vec<AnthropicMessage>) {
        let mut system_parts = Vec::new();
        let mut converted: Vec<AnthropicMessage> = Vec::new();

        for msg in messages {
            let (role, blocks) = match msg.role {
                Role::System => {
                    system_parts.push(msg.content.clone());
                    continue;
                }
                Role::User => ("user", vec![json!({"type": "text", "text": msg.content})]),
                Role::Assistant => {
                    let mut blocks = Vec::new();
                    if !msg.content.is_empty() {
                        blocks.push(json!({"type": "text", "text": msg.content}));
                    }
                    for tc in &msg.tool_calls {
                        blocks.push(json!({
                            "type": "tool_use",
                            "id": tc.id.clone().unwrap_or_default(),
                            "name": tc.name,
                            "input": tc.arguments,
                        }));
                    }
                    // The API rejects empty content; an empty reply carries nothing to resend
                    if blocks.is_empty() {
                        continue;
                    }
                    ("assistant", blocks)
                }
                Role::Tool => (
                    "user",
                    vec![json!({
                        "type": "tool_result",
                        "tool_use_id": msg.tool_call_id.clone().unwrap_or_default(),
                        "content": msg.content,
                    })],
                ),
            };

            match converted.last_mut() {
                Some(last) if last.role == role => last.content.extend(blocks),
                _ => converted.push(AnthropicMessage {
                    role,
                    content: blocks,
                }),
            }
        }

        let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));
        (system, converted)
    }

    fn to_llm_response(response: MessagesResponse) -> LLMResponse {
        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for block in response.content {
            match block {
                ContentBlock::Text { text } => content.push_str(&text),
                ContentBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall::new(name, input).with_id(id));
                }
                ContentBlock::Other => {}
            }
        }

        LLMResponse {
            id: Some(response.id),
            content,
            tool_calls,
            usage: response
                .usage
                .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens)),
            model: response.model,
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicClient {
    async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let (system, anthropic_messages) = Self::to_anthropic_messages(messages);
        let options = options.unwrap_or_default();

        let request = MessagesRequest {
            model,
            max_tokens: options.max_tokens.unwrap_or(self.max_tokens),
            system,
            messages: anthropic_messages,
            tools: tools
                .iter()
                .map(|t| AnthropicTool {
                    name: &t.function.name,
                    description: &t.function.description,
                    input_schema: &t.function.parameters,
                })
                .collect(),
            temperature: options.temperature,
        };

        tracing::debug!(
            provider = "anthropic",
            model,
            messages = messages.len(),
            tools = tools.len(),
            "sending chat request"
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    CounselError::provider(format!(
                        "Cannot connect to Anthropic at {}",
                        self.base_url
                    ))
                } else {
                    CounselError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CounselError::provider(format!(
                "Anthropic API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        let parsed: MessagesResponse = serde_json::from_str(&response_text)
            .map_err(|e| CounselError::provider(format!("Failed to parse response: {}", e)))?;

        Ok(Self::to_llm_response(parsed))
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_messages_are_lifted() {
        let messages = vec![Message::system("Be precise."), Message::user("Hello")];
        let (system, converted) = AnthropicClient::to_anthropic_messages(&messages);

        assert_eq!(system.as_deref(), Some("Be precise."));
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].role, "user");
    }

    #[test]
    fn test_tool_round_trip_blocks() {
        let messages = vec![
            Message::user("Find the statute"),
            Message::assistant("Searching.").with_tool_calls(vec![ToolCall::new(
                "search",
                json!({"query": "statute of frauds"}),
            )
            .with_id("toolu_01")]),
            Message::tool("[]", Some("toolu_01".to_string())),
        ];
        let (system, converted) = AnthropicClient::to_anthropic_messages(&messages);

        assert!(system.is_none());
        assert_eq!(converted.len(), 3);
        assert_eq!(converted[1].content[1]["type"], "tool_use");
        assert_eq!(converted[1].content[1]["id"], "toolu_01");
        assert_eq!(converted[2].role, "user");
        assert_eq!(converted[2].content[0]["tool_use_id"], "toolu_01");
    }

    #[test]
    fn test_consecutive_tool_results_merge_into_one_turn() {
        let messages = vec![
            Message::tool("a", Some("t1".to_string())),
            Message::tool("b", Some("t2".to_string())),
        ];
        let (_, converted) = AnthropicClient::to_anthropic_messages(&messages);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].content.len(), 2);
    }

    #[test]
    fn test_empty_assistant_reply_is_skipped() {
        let messages = vec![
            Message::user("Hello"),
            Message::assistant(""),
            Message::user("Are you there?"),
        ];
        let (_, converted) = AnthropicClient::to_anthropic_messages(&messages);

        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].role, "user");
        assert_eq!(converted[0].content.len(), 2);
        assert!(converted.iter().all(|m| !m.content.is_empty()));
    }

    #[test]
    fn test_response_conversion() {
        let response: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_123",
            "model": "claude-3-5-haiku-latest",
            "content": [
                {"type": "text", "text": "Let me draft that."},
                {"type": "tool_use", "id": "toolu_9", "name": "create_word_doc",
                 "input": {"content": "NDA"}}
            ],
            "usage": {"input_tokens": 7, "output_tokens": 3}
        }))
        .unwrap();

        let llm = AnthropicClient::to_llm_response(response);
        assert_eq!(llm.id.as_deref(), Some("msg_123"));
        assert_eq!(llm.content, "Let me draft that.");
        assert_eq!(llm.tool_calls[0].id.as_deref(), Some("toolu_9"));
        assert_eq!(llm.usage.map(|u| u.total_tokens), Some(10));
    }
}
