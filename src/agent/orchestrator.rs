//! Agent orchestrator
//!
//! Owns one conversation and runs each user message through the ReAct graph
//! (model turn → tools → model turn …) until a final answer is produced.

use std::sync::Arc;

use crate::agent::conversation::Conversation;
use crate::agent::graph::ReactGraph;
use crate::agent::loop_state::AgentState;
use crate::agent::prompts::SystemPrompt;
use crate::core::config::AgentSettings;
use crate::core::{Config, Message, Result};
use crate::llm::{create_provider, LLMProvider};
use crate::tools::ToolRegistry;

/// Returned when a run ends without any assistant message
const NO_RESPONSE_MESSAGE: &str = "I apologize, but I couldn't generate a response.";

/// Main agent that orchestrates the model and tools
pub struct Agent {
    /// Settings fixed for the current conversation
    settings: Arc<AgentSettings>,
    /// Provider-local model name
    model: String,
    llm: Arc<dyn LLMProvider>,
    tools: Arc<ToolRegistry>,
    graph: ReactGraph,
    conversation: Conversation,
}

impl Agent {
    /// Create an agent from configuration
    pub fn with_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let (llm, model_id) = create_provider(config)?;
        let tools = ToolRegistry::from_config(config)?;
        Ok(Self::from_parts(
            config.agent_settings(),
            model_id.model,
            llm,
            Arc::new(tools),
        ))
    }

    /// Assemble an agent from already-built collaborators
    pub fn from_parts(
        settings: AgentSettings,
        model: impl Into<String>,
        llm: Arc<dyn LLMProvider>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        let settings = Arc::new(settings);
        let model = model.into();
        let graph = ReactGraph::new(settings.clone(), model.clone(), llm.clone(), tools.clone());

        Self {
            settings,
            model,
            llm,
            tools,
            graph,
            conversation: Conversation::new(),
        }
    }

    /// One-shot run: a fresh conversation holding only `query`
    pub async fn run_once(query: &str, config: &Config) -> Result<AgentState> {
        let agent = Self::with_config(config)?;
        agent
            .graph
            .invoke(AgentState::new(
                vec![Message::user(query)],
                agent.settings.max_steps,
            ))
            .await
    }

    /// Process a user message and return the agent's final answer.
    ///
    /// The user message is committed together with whatever the run produced.
    /// If the run fails after producing messages (a tool already ran, for
    /// example), those are kept before the error is returned; if it fails
    /// before producing anything, the conversation is left untouched.
    pub async fn process(&mut self, user_input: &str) -> Result<String> {
        let mut messages = self.conversation.messages().to_vec();
        messages.push(Message::user(user_input));
        let pending = messages.len();

        let mut state = AgentState::new(messages, self.settings.max_steps);
        tracing::info!(
            max_steps = self.settings.max_steps,
            history = pending,
            "starting agent run"
        );

        let outcome = self.graph.run(&mut state).await;
        let steps_used = self.settings.max_steps - state.remaining_steps;

        if let Err(e) = outcome {
            if state.messages.len() > pending {
                tracing::warn!(
                    kept = state.messages.len() - pending,
                    "agent run failed; keeping the messages it produced"
                );
                self.conversation.absorb(state.messages);
            }
            return Err(e);
        }
        self.conversation.absorb(state.messages);

        let answer = match self.conversation.last_message() {
            Some(last) if last.is_assistant() => last.content.clone(),
            _ => NO_RESPONSE_MESSAGE.to_string(),
        };

        tracing::info!(steps = steps_used, "agent run complete");
        Ok(answer)
    }

    /// Start a new conversation with the same settings
    pub fn clear_history(&mut self) {
        self.conversation = Conversation::new();
    }

    /// Start a new conversation using `prompt`
    pub fn set_system_prompt(&mut self, prompt: SystemPrompt) {
        let settings = Arc::new(AgentSettings {
            system_prompt: prompt,
            ..(*self.settings).clone()
        });
        self.graph = ReactGraph::new(
            settings.clone(),
            self.model.clone(),
            self.llm.clone(),
            self.tools.clone(),
        );
        self.settings = settings;
        self.clear_history();
    }

    /// Get current settings
    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Get the conversation so far
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Get conversation length
    pub fn conversation_length(&self) -> usize {
        self.conversation.len()
    }

    /// Name of the active provider
    pub fn provider_name(&self) -> &str {
        self.llm.name()
    }

    /// Tools bound to the model
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }
}
