//! Agent loop state
//!
//! The ordered message history plus the remaining step budget.

use crate::core::Message;

/// State carried through the model/tool cycle
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    /// Conversation history, append-only
    pub messages: Vec<Message>,
    /// Node executions left before the run is cut off
    pub remaining_steps: usize,
}

impl AgentState {
    /// Create a new state with the given history and step budget
    pub fn new(messages: Vec<Message>, max_steps: usize) -> Self {
        Self {
            messages,
            remaining_steps: max_steps,
        }
    }

    /// True when a tool turn requested now could not be followed by another
    /// model turn within the budget
    pub fn is_last_step(&self) -> bool {
        self.remaining_steps < 2
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_steps == 0
    }

    /// Consume one step
    pub fn next_step(&mut self) {
        self.remaining_steps = self.remaining_steps.saturating_sub(1);
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Content of the most recent assistant message
    pub fn final_answer(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_assistant())
            .map(|m| m.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_new() {
        let state = AgentState::new(vec![Message::user("hi")], 10);
        assert_eq!(state.remaining_steps, 10);
        assert_eq!(state.messages.len(), 1);
        assert!(!state.is_last_step());
    }

    #[test]
    fn test_step_budget() {
        let mut state = AgentState::new(Vec::new(), 3);
        assert!(!state.is_last_step());

        state.next_step();
        assert!(!state.is_last_step());

        state.next_step();
        assert!(state.is_last_step());
        assert!(!state.is_exhausted());

        state.next_step();
        state.next_step();
        assert!(state.is_exhausted());
        assert_eq!(state.remaining_steps, 0);
    }

    #[test]
    fn test_final_answer_skips_tool_messages() {
        let mut state = AgentState::new(vec![Message::user("q")], 5);
        state.push(Message::assistant("answer"));
        state.push(Message::tool("[]", None));
        assert_eq!(state.final_answer(), Some("answer"));
    }
}
