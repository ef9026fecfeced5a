//! Routing after a model turn

use crate::core::{CounselError, Message, Result};

/// Where the graph goes after a model turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Execute the requested tools
    Tools,
    /// The model produced its final answer
    End,
}

/// Decide the next step from the model's latest message.
///
/// The last message must come from the assistant.
pub fn route_model_output(messages: &[Message]) -> Result<Route> {
    let last = messages
        .last()
        .ok_or_else(|| CounselError::UnexpectedMessage {
            expected: "assistant",
            found: "empty history".to_string(),
        })?;

    if !last.is_assistant() {
        return Err(CounselError::UnexpectedMessage {
            expected: "assistant",
            found: last.role.to_string(),
        });
    }

    if last.has_tool_calls() {
        Ok(Route::Tools)
    } else {
        Ok(Route::End)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ToolCall;
    use serde_json::json;

    #[test]
    fn test_no_tool_calls_ends() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        assert_eq!(route_model_output(&messages).unwrap(), Route::End);
    }

    #[test]
    fn test_tool_calls_route_to_tools() {
        let messages = vec![
            Message::user("find it"),
            Message::assistant("")
                .with_tool_calls(vec![ToolCall::new("search", json!({"query": "it"}))]),
        ];
        assert_eq!(route_model_output(&messages).unwrap(), Route::Tools);
    }

    #[test]
    fn test_trailing_user_message_is_a_type_mismatch() {
        let messages = vec![Message::user("hi")];
        let err = route_model_output(&messages).unwrap_err();
        assert!(matches!(
            err,
            CounselError::UnexpectedMessage { expected: "assistant", ref found } if found == "user"
        ));
    }

    #[test]
    fn test_empty_history_is_an_error() {
        assert!(route_model_output(&[]).is_err());
    }
}
