//! Intent classification over conversation history
//!
//! Case-insensitive keyword matching decides which prompt template to use,
//! whether a document was requested, and whether the agent is still
//! gathering details for it.

use crate::agent::prompts::{PromptKind, SystemPrompt};
use crate::core::Message;

/// Any of these in a user message marks the conversation as a document request
pub const DOCUMENT_REQUEST_TERMS: &[&str] = &[
    "draft",
    "create document",
    "write a",
    "document",
    "contract",
    "agreement",
    "nda",
    "license",
    "lease",
    "letter",
];

/// Phrases an assistant uses when asking for document details
pub const CLARIFYING_PHRASES: &[&str] = &[
    "what is the name",
    "what are the parties",
    "could you provide",
    "what term",
    "what jurisdiction",
    "need some information",
    "need to know",
    "please provide",
    "can you tell me",
    "would you like",
    "do you want",
    "should i include",
];

/// Template selection rules, evaluated in order against the latest user message.
/// The first rule with a matching keyword wins.
pub const PROMPT_RULES: &[(&[&str], PromptKind)] = &[
    (
        &["contract", "agreement", "nda", "license"],
        PromptKind::Contract,
    ),
    (
        &["draft", "create document", "write a", "document"],
        PromptKind::LegalDocument,
    ),
    (
        &["research", "find cases", "legal precedent", "statute"],
        PromptKind::LegalResearch,
    ),
];

/// What the history says about the user's intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    /// Some user message asked for a document
    pub document_requested: bool,
    /// A document was requested and the assistant has already asked for details
    pub information_gathering: bool,
    /// Prompt to use for the next turn
    pub prompt: SystemPrompt,
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    let text = text.to_lowercase();
    terms.iter().any(|term| text.contains(term))
}

/// Pick a template for `text` from [`PROMPT_RULES`]
pub fn select_template(text: &str) -> PromptKind {
    let text = text.to_lowercase();
    PROMPT_RULES
        .iter()
        .find(|(terms, _)| terms.iter().any(|term| text.contains(term)))
        .map(|(_, kind)| *kind)
        .unwrap_or(PromptKind::Default)
}

/// Classify the conversation so far.
///
/// Keyword selection only applies when `configured` is the default template;
/// any other configured prompt is returned as-is.
pub fn classify(messages: &[Message], configured: &SystemPrompt) -> Intent {
    let mut user_messages = messages.iter().filter(|m| m.is_user());
    let document_requested = user_messages
        .clone()
        .any(|m| contains_any(&m.content, DOCUMENT_REQUEST_TERMS));

    let information_gathering = document_requested
        && messages
            .iter()
            .filter(|m| m.is_assistant())
            .any(|m| contains_any(&m.content, CLARIFYING_PHRASES));

    let prompt = if configured.is_default() {
        let last_user = user_messages.next_back().map(|m| m.content.as_str());
        SystemPrompt::Template(select_template(last_user.unwrap_or("")))
    } else {
        configured.clone()
    };

    Intent {
        document_requested,
        information_gathering,
        prompt,
    }
}
