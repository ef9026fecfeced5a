//! The model/tool cycle
//!
//! `CallModel` runs a model turn and routes on its output; `Tools` executes
//! the requested tool calls one after another and hands control back to the
//! model. Every node execution consumes one step of the budget.

use std::sync::Arc;

use crate::agent::loop_state::AgentState;
use crate::agent::router::{route_model_output, Route};
use crate::agent::turn::call_model;
use crate::core::config::AgentSettings;
use crate::core::{CounselError, Message, Result};
use crate::llm::LLMProvider;
use crate::tools::ToolRegistry;

/// Graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    CallModel,
    Tools,
    End,
}

/// The ReAct graph for one conversation
pub struct ReactGraph {
    settings: Arc<AgentSettings>,
    model: String,
    llm: Arc<dyn LLMProvider>,
    tools: Arc<ToolRegistry>,
}

impl ReactGraph {
    /// `model` is the provider-local model name, without the `provider/` prefix
    pub fn new(
        settings: Arc<AgentSettings>,
        model: impl Into<String>,
        llm: Arc<dyn LLMProvider>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            settings,
            model: model.into(),
            llm,
            tools,
        }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Run `node` against `state` and return the node to run next
    pub async fn step(&self, node: Node, state: &mut AgentState) -> Result<Node> {
        match node {
            Node::CallModel => {
                let reply = call_model(
                    state,
                    &self.settings,
                    &self.model,
                    self.llm.as_ref(),
                    self.tools.definitions(),
                )
                .await?;
                state.push(reply);

                Ok(match route_model_output(&state.messages)? {
                    Route::Tools => Node::Tools,
                    Route::End => Node::End,
                })
            }
            Node::Tools => {
                self.run_tools(state).await?;
                Ok(Node::CallModel)
            }
            Node::End => Ok(Node::End),
        }
    }

    /// Execute every tool call on the last assistant message, in order
    async fn run_tools(&self, state: &mut AgentState) -> Result<()> {
        let tool_calls = match state.last_message() {
            Some(last) if last.is_assistant() => last.tool_calls.clone(),
            Some(last) => {
                return Err(CounselError::UnexpectedMessage {
                    expected: "assistant",
                    found: last.role.to_string(),
                })
            }
            None => return Ok(()),
        };

        for tool_call in &tool_calls {
            tracing::info!(tool = %tool_call.name, "executing tool");
            let result = self.tools.execute(tool_call).await;
            if !result.success {
                tracing::warn!(tool = %result.tool_name, "tool failed: {}", result.output);
            }
            state.push(Message::tool(result.output, tool_call.id.clone()));
        }
        Ok(())
    }

    /// Run the cycle from `CallModel` until the model stops calling tools or
    /// the step budget runs out
    pub async fn invoke(&self, mut state: AgentState) -> Result<AgentState> {
        self.run(&mut state).await?;
        Ok(state)
    }

    /// Same as [`ReactGraph::invoke`], but works on `state` in place so the
    /// messages produced before a failure stay with the caller
    pub async fn run(&self, state: &mut AgentState) -> Result<()> {
        let mut node = Node::CallModel;

        while node != Node::End {
            if state.is_exhausted() {
                tracing::warn!("step budget exhausted before {:?}", node);
                break;
            }
            state.next_step();
            tracing::debug!(?node, remaining = state.remaining_steps, "running node");
            node = self.step(node, state).await?;
        }

        Ok(())
    }
}
