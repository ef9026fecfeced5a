//! Model turn
//!
//! Builds the system message for the current intent, calls the model once
//! with the tools bound, and applies the two reply overrides: no document
//! before the first clarifying exchange, and no tool calls on the last step.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::agent::intent::{classify, Intent};
use crate::agent::loop_state::AgentState;
use crate::core::config::AgentSettings;
use crate::core::{Message, Result, ToolDefinition};
use crate::llm::{GenerateOptions, LLMProvider};
use crate::tools::CREATE_DOCUMENT_TOOL;

/// Appended to the system prompt on the first turn of a document request
pub const GATHER_FIRST_INSTRUCTION: &str = r#"

IMPORTANT INSTRUCTION: The user has requested a document to be created.
DO NOT create the document yet. First, ask the user for all necessary information
needed to customize the document to their specific needs. Ask about parties involved,
dates, terms, jurisdiction, and other relevant details.
"#;

/// Replaces a first-turn reply that tried to create the document straight away
pub const CLARIFICATION_MESSAGE: &str = "I'd be happy to help you draft that document. To make it properly tailored to your needs, I'll need to ask you a few questions first:\n\n\
1. Who are the parties involved in this document?\n\
2. What specific terms or conditions should be included?\n\
3. What is the effective date and duration?\n\
4. Is there a specific jurisdiction this should be governed by?\n\
5. Are there any special clauses or provisions you'd like to include?\n\n\
Once I have this information, I can create a customized document for you.";

/// Replaces a reply that still wants tools when the step budget is spent
pub const STEP_LIMIT_MESSAGE: &str =
    "Sorry, I could not complete the legal drafting task in the specified number of steps.";

/// Format a timestamp the way it appears in the system prompt
pub fn format_system_time(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Render the system message for this turn
pub fn system_message(intent: &Intent, messages: &[Message], now: DateTime<Utc>) -> String {
    let mut system = intent.prompt.render(&format_system_time(now));

    let user_turns = messages.iter().filter(|m| m.is_user()).count();
    if intent.document_requested && !intent.information_gathering && user_turns == 1 {
        system.push_str(GATHER_FIRST_INSTRUCTION);
    }
    system
}

/// Apply the reply overrides to the model's message
pub fn post_process(
    intent: &Intent,
    history: &[Message],
    is_last_step: bool,
    reply: Message,
) -> Message {
    let first_reply = !history.iter().any(|m| m.is_assistant());

    if intent.document_requested && first_reply && reply.requests_tool(CREATE_DOCUMENT_TOOL) {
        tracing::info!("document requested before details were gathered; asking questions first");
        return substitute(reply, CLARIFICATION_MESSAGE);
    }

    if is_last_step && reply.has_tool_calls() {
        tracing::info!("step budget exhausted with pending tool calls");
        return substitute(reply, STEP_LIMIT_MESSAGE);
    }

    reply
}

fn substitute(reply: Message, content: &str) -> Message {
    Message {
        id: reply.id,
        ..Message::assistant(content)
    }
}

/// Give the reply and each of its tool calls an id if the provider left one out.
///
/// Tool results echo the call id, so every call needs one before the tools run.
pub fn assign_ids(reply: &mut Message) {
    if reply.id.is_none() {
        reply.id = Some(Uuid::new_v4().to_string());
    }
    for tool_call in reply.tool_calls.iter_mut().filter(|tc| tc.id.is_none()) {
        tool_call.id = Some(format!("call_{}", Uuid::new_v4().simple()));
    }
}

/// Run one model turn and return the assistant message to append
pub async fn call_model(
    state: &AgentState,
    settings: &AgentSettings,
    model: &str,
    llm: &dyn LLMProvider,
    tools: &[ToolDefinition],
) -> Result<Message> {
    let intent = classify(&state.messages, &settings.system_prompt);
    tracing::debug!(
        prompt = %intent.prompt,
        document_requested = intent.document_requested,
        information_gathering = intent.information_gathering,
        "classified conversation"
    );

    let mut messages = Vec::with_capacity(state.messages.len() + 1);
    messages.push(Message::system(system_message(
        &intent,
        &state.messages,
        Utc::now(),
    )));
    messages.extend(state.messages.iter().cloned());

    let options = GenerateOptions {
        temperature: settings.temperature,
        ..Default::default()
    };
    let response = llm
        .chat_with_tools(model, &messages, tools, Some(options))
        .await?;

    let mut reply = response.into_message();
    assign_ids(&mut reply);

    Ok(post_process(
        &intent,
        &state.messages,
        state.is_last_step(),
        reply,
    ))
}
