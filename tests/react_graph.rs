//! End-to-end runs of the model/tool cycle against a scripted model
//!
//! The model is replaced by a provider that replays canned replies and
//! records every request it receives, so the tests can check both what the
//! agent answers and what it sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use counsel::agent::graph::{Node, ReactGraph};
use counsel::agent::turn::{CLARIFICATION_MESSAGE, STEP_LIMIT_MESSAGE};
use counsel::agent::{Agent, AgentState, PromptKind, SystemPrompt};
use counsel::core::config::AgentSettings;
use counsel::core::{CounselError, Message, Result, Role, ToolCall, ToolDefinition};
use counsel::llm::{GenerateOptions, LLMProvider, LLMResponse};
use counsel::tools::{DocumentWriter, ToolRegistry, WebSearch, CREATE_DOCUMENT_TOOL, SEARCH_TOOL};

/// Replays scripted replies in order
#[derive(Default)]
struct ScriptedModel {
    replies: Mutex<VecDeque<LLMResponse>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    fn new(replies: Vec<LLMResponse>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn push_reply(&self, reply: LLMResponse) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    fn system_prompt(&self, call: usize) -> String {
        let requests = self.requests();
        let first = &requests[call][0];
        assert_eq!(first.role, Role::System);
        first.content.clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedModel {
    async fn chat_with_tools(
        &self,
        _model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        _options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        assert_eq!(tools.len(), 2, "both tools are bound on every turn");
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CounselError::provider("script exhausted"))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn text(id: &str, content: &str) -> LLMResponse {
    LLMResponse {
        id: Some(id.to_string()),
        content: content.to_string(),
        model: "scripted".to_string(),
        ..Default::default()
    }
}

fn calling(id: &str, call: ToolCall) -> LLMResponse {
    LLMResponse {
        tool_calls: vec![call],
        ..text(id, "")
    }
}

fn settings(max_steps: usize) -> AgentSettings {
    AgentSettings {
        model: "scripted/test".to_string(),
        max_search_results: 3,
        system_prompt: SystemPrompt::default(),
        max_steps,
        temperature: None,
    }
}

fn tools(output_dir: &std::path::Path) -> Arc<ToolRegistry> {
    // Nothing listens on the discard port; searches fail and come back empty.
    let search = WebSearch::new("http://127.0.0.1:9", None, 3, Duration::from_secs(1)).unwrap();
    Arc::new(ToolRegistry::new(search, DocumentWriter::new(output_dir)))
}

fn agent(model: Arc<ScriptedModel>, settings: AgentSettings, dir: &std::path::Path) -> Agent {
    Agent::from_parts(settings, "test", model, tools(dir))
}

#[tokio::test]
async fn test_nda_first_turn_asks_questions_instead_of_drafting() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![calling(
        "msg_1",
        ToolCall::new(CREATE_DOCUMENT_TOOL, json!({"content": "MUTUAL NDA ..."})).with_id("toolu_1"),
    )]);
    let mut agent = agent(model.clone(), settings(25), dir.path());

    let answer = agent
        .process("Draft an NDA for a 2-year software project")
        .await
        .unwrap();

    assert_eq!(answer, CLARIFICATION_MESSAGE);
    assert_eq!(agent.conversation_length(), 2);

    let reply = agent.conversation().last_message().unwrap();
    assert_eq!(reply.id.as_deref(), Some("msg_1"));
    assert!(reply.tool_calls.is_empty());

    let system = model.system_prompt(0);
    assert!(system.starts_with("You are a contract drafting assistant"));
    assert!(system.contains("DO NOT create the document yet."));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_document_is_written_once_details_are_gathered() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![
        text("msg_1", "Happy to help. What are the parties involved, and what term?"),
        calling(
            "msg_2",
            ToolCall::new(
                CREATE_DOCUMENT_TOOL,
                json!({"content": "MUTUAL NON-DISCLOSURE AGREEMENT\nBetween Acme Corp and Beta LLC", "file_name": "nda.docx"}),
            )
            .with_id("toolu_2"),
        ),
        text("msg_3", "Your NDA has been saved."),
    ]);
    let mut agent = agent(model.clone(), settings(25), dir.path());

    agent.process("Draft an NDA").await.unwrap();
    let answer = agent
        .process("Acme Corp and Beta LLC, two years, California law")
        .await
        .unwrap();

    assert_eq!(answer, "Your NDA has been saved.");
    assert!(dir.path().join("nda.docx").exists());

    // user, assistant, user, assistant(tool call), tool, assistant
    let messages = agent.conversation().messages();
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[4].role, Role::Tool);
    assert_eq!(messages[4].tool_call_id.as_deref(), Some("toolu_2"));
    assert_eq!(
        messages[4].content,
        dir.path().join("nda.docx").display().to_string()
    );

    assert_eq!(model.requests().len(), 3);
    assert!(!model.system_prompt(1).contains("IMPORTANT INSTRUCTION"));
}

#[tokio::test]
async fn test_search_failure_is_reported_to_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![
        calling(
            "msg_1",
            ToolCall::new(SEARCH_TOOL, json!({"query": "statute of frauds California"}))
                .with_id("toolu_1"),
        ),
        text("msg_2", "The statute of frauds requires certain contracts to be in writing."),
    ]);
    let mut agent = agent(model.clone(), settings(25), dir.path());

    let answer = agent
        .process("Research the statute of frauds in California")
        .await
        .unwrap();

    assert!(answer.starts_with("The statute of frauds"));
    assert!(model.system_prompt(0).starts_with("You are a legal research assistant"));

    // The second request carries the tool result after the tool call.
    let second = &model.requests()[1];
    let tool_message = second.last().unwrap();
    assert_eq!(tool_message.role, Role::Tool);
    assert_eq!(tool_message.content, "Search returned no results.");
    assert_eq!(tool_message.tool_call_id.as_deref(), Some("toolu_1"));
}

#[tokio::test]
async fn test_step_budget_ends_with_apology() {
    let dir = tempfile::tempdir().unwrap();
    let search = || ToolCall::new(SEARCH_TOOL, json!({"query": "lease law"}));
    let model = ScriptedModel::new(vec![
        calling("msg_1", search().with_id("toolu_1")),
        calling("msg_2", search().with_id("toolu_2")),
        calling("msg_3", search().with_id("toolu_3")),
    ]);
    let mut agent = agent(model.clone(), settings(3), dir.path());

    let answer = agent.process("What does lease law say?").await.unwrap();

    assert_eq!(answer, STEP_LIMIT_MESSAGE);
    assert_eq!(model.requests().len(), 2);
    let last = agent.conversation().last_message().unwrap();
    assert_eq!(last.id.as_deref(), Some("msg_2"));
    assert!(last.tool_calls.is_empty());
}

#[tokio::test]
async fn test_custom_prompt_disables_template_selection() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![text("msg_1", "ok")]);
    let settings = AgentSettings {
        system_prompt: SystemPrompt::Custom("Answer tersely. Time: {system_time}".to_string()),
        ..settings(25)
    };
    let mut agent = agent(model.clone(), settings, dir.path());

    agent.process("Research case law on NDAs").await.unwrap();

    let system = model.system_prompt(0);
    assert!(system.starts_with("Answer tersely. Time: "));
    assert!(!system.contains("{system_time}"));
}

#[tokio::test]
async fn test_template_switch_starts_new_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![text("msg_1", "hello"), text("msg_2", "hello again")]);
    let mut agent = agent(model.clone(), settings(25), dir.path());

    agent.process("hi").await.unwrap();
    agent.set_system_prompt(SystemPrompt::Template(PromptKind::LegalResearch));
    assert_eq!(agent.conversation_length(), 0);

    agent.process("hi").await.unwrap();
    assert_eq!(model.requests()[1].len(), 2);
    assert!(model.system_prompt(1).starts_with("You are a legal research assistant"));
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(Vec::new());
    let mut agent = agent(model, settings(25), dir.path());

    let err = agent.process("hi").await.unwrap_err();
    assert!(matches!(err, CounselError::Provider(_)));
}

#[tokio::test]
async fn test_failed_run_keeps_tool_work() {
    let dir = tempfile::tempdir().unwrap();
    // The second model call finds the script empty and fails.
    let model = ScriptedModel::new(vec![calling(
        "msg_1",
        ToolCall::new(SEARCH_TOOL, json!({"query": "lease termination"})).with_id("toolu_1"),
    )]);
    let mut agent = agent(model.clone(), settings(25), dir.path());

    let err = agent.process("How do I end a lease early?").await.unwrap_err();
    assert!(matches!(err, CounselError::Provider(_)));

    let roles: Vec<Role> = agent.conversation().messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Tool]);

    model.push_reply(text("msg_2", "Here is what the law says."));
    let answer = agent.process("Please try again").await.unwrap();
    assert_eq!(answer, "Here is what the law says.");

    let retry: Vec<Role> = model.requests()[2].iter().map(|m| m.role).collect();
    assert_eq!(
        retry,
        vec![Role::System, Role::User, Role::Assistant, Role::Tool, Role::User]
    );
}

#[tokio::test]
async fn test_failed_first_call_leaves_conversation_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(Vec::new());
    let mut agent = agent(model.clone(), settings(25), dir.path());

    assert!(agent.process("Draft an NDA").await.is_err());
    assert_eq!(agent.conversation_length(), 0);

    // The retry is still the first turn, so the gather-first instruction applies.
    model.push_reply(text("msg_1", "What are the parties involved?"));
    agent.process("Draft an NDA").await.unwrap();
    assert!(model.system_prompt(1).contains("DO NOT create the document yet."));
    assert_eq!(model.requests()[1].len(), 2);
}

#[tokio::test]
async fn test_tool_calls_without_ids_are_paired() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![
        LLMResponse {
            id: None,
            ..calling("unused", ToolCall::new(SEARCH_TOOL, json!({"query": "easements"})))
        },
        text("msg_2", "Easements grant limited use of land."),
    ]);
    let mut agent = agent(model.clone(), settings(25), dir.path());

    agent.process("What is an easement?").await.unwrap();

    let messages = agent.conversation().messages();
    assert!(messages[1].id.is_some());
    let call_id = messages[1].tool_calls[0].id.clone();
    assert!(call_id.is_some());
    assert_eq!(messages[2].role, Role::Tool);
    assert_eq!(messages[2].tool_call_id, call_id);
}

#[tokio::test]
async fn test_tools_node_requires_assistant_message() {
    let dir = tempfile::tempdir().unwrap();
    let graph = ReactGraph::new(
        Arc::new(settings(25)),
        "test",
        ScriptedModel::new(Vec::new()),
        tools(dir.path()),
    );

    let mut state = AgentState::new(vec![Message::user("hi")], 25);
    let err = graph.step(Node::Tools, &mut state).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Expected assistant message in output edges, but got user"
    );
}

#[tokio::test]
async fn test_zero_budget_runs_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![text("msg_1", "unused")]);
    let graph = ReactGraph::new(Arc::new(settings(0)), "test", model.clone(), tools(dir.path()));

    let state = graph
        .invoke(AgentState::new(vec![Message::user("hi")], 0))
        .await
        .unwrap();

    assert_eq!(state.messages.len(), 1);
    assert!(model.requests().is_empty());
}
