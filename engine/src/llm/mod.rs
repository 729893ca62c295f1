//! LLM client abstraction layer
//!
//! Defines the contract between the agent loop and whatever model backs
//! it: a conversation of role-tagged messages goes in, a `ModelTurn`
//! comes out. The production client speaks the OpenAI chat-completions
//! protocol with native tool calling; tests drive the loop with scripted
//! clients behind the same trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub mod openai;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    Parse(String),
}

impl LlmError {
    /// Whether the same call can sensibly be attempted again.
    ///
    /// Retryable failures burn an iteration of the agent's budget;
    /// non-retryable ones abort the ticket.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Unavailable(_)
                | LlmError::RateLimitExceeded
                | LlmError::Network(_)
                | LlmError::Timeout
        )
    }
}

/// Message in a conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender (user, assistant, system, tool)
    pub role: MessageRole,

    /// Content of the message
    pub content: String,

    /// Tool call ID for tool result messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Raw tool-call block for assistant turns that requested tools
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Value>,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    /// Create a new tool result message
    pub fn tool_result(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: None,
        }
    }

    /// Create the assistant message echoing requested tool calls.
    ///
    /// The chat-completions protocol requires the requesting assistant
    /// turn in history before the matching tool results.
    pub fn assistant_tool_calls(requests: &[ToolCallRequest]) -> Self {
        let raw: Vec<Value> = requests.iter().map(ToolCallRequest::to_wire).collect();
        Self {
            role: MessageRole::Assistant,
            content: String::new(),
            tool_call_id: None,
            tool_calls: Some(Value::Array(raw)),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    Tool,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

/// One tool invocation requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    /// Unique identifier for this tool call
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Parsed argument bag; non-JSON argument text survives as a string
    pub arguments: Value,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Render back into the chat-completions `tool_calls` wire shape
    pub fn to_wire(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "type": "function",
            "function": {
                "name": self.name,
                "arguments": self.arguments.to_string(),
            },
        })
    }
}

/// One turn of model output
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    /// The model wants one or more tools dispatched
    ToolCalls(Vec<ToolCallRequest>),

    /// The model proposed a final answer
    Final(String),
}

/// Client trait the agent loop runs against
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier used in logs
    fn model(&self) -> &str;

    /// Run one completion over the conversation so far.
    ///
    /// `tools` is the list of function schemas advertised to the model.
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<ModelTurn>;
}

/// Pull a JSON object out of free-form model output.
///
/// Tries, in order: the whole trimmed content as JSON, the body of the
/// first markdown code fence, and a balanced-brace scan from the first
/// `{`. Returns the raw candidate text; the caller owns deserialization
/// so its error can name the missing field.
pub fn extract_json_object(content: &str) -> Option<&str> {
    let trimmed = content.trim();

    if trimmed.starts_with('{') && serde_json::from_str::<Value>(trimmed).is_ok() {
        return Some(trimmed);
    }

    if let Some(inner) = extract_fenced_block(trimmed) {
        let inner = inner.trim();
        if serde_json::from_str::<Value>(inner).is_ok() {
            return Some(inner);
        }
    }

    if let Some(pos) = trimmed.find('{') {
        if let Some(candidate) = extract_balanced_json(&trimmed[pos..]) {
            if serde_json::from_str::<Value>(candidate).is_ok() {
                return Some(candidate);
            }
        }
    }

    None
}

/// Extract the body of the first markdown code fence in the text.
///
/// Works even when there is trailing prose after the closing ```.
fn extract_fenced_block(content: &str) -> Option<&str> {
    let fence_start = content.find("```")?;
    let after_opening = &content[fence_start + 3..];

    // Skip the language tag line (e.g. "json\n")
    let body_start_rel = after_opening.find('\n')? + 1;
    let body_start = fence_start + 3 + body_start_rel;

    let closing = content[body_start..].find("```")?;
    let body_end = body_start + closing;

    if body_start >= body_end {
        return None;
    }

    Some(&content[body_start..body_end])
}

/// Extract a balanced JSON object starting at position 0 of `s`.
///
/// Counts `{` / `}` depth, respecting string literals, to find the
/// matching close brace.
fn extract_balanced_json(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_constructors() {
        let user_msg = Message::user("Hello");
        assert_eq!(user_msg.role, MessageRole::User);
        assert_eq!(user_msg.tool_call_id, None);

        let system_msg = Message::system("You are a triage agent");
        assert_eq!(system_msg.role, MessageRole::System);

        let tool_msg = Message::tool_result("{\"success\":true}", "call_123");
        assert_eq!(tool_msg.role, MessageRole::Tool);
        assert_eq!(tool_msg.tool_call_id, Some("call_123".to_string()));
    }

    #[test]
    fn assistant_tool_call_echo_has_wire_shape() {
        let request = ToolCallRequest::new(
            "call_1",
            "search_knowledge_base",
            json!({"query": "error 500"}),
        );
        let msg = Message::assistant_tool_calls(std::slice::from_ref(&request));
        assert_eq!(msg.role, MessageRole::Assistant);
        let calls = msg.tool_calls.expect("tool calls set");
        assert_eq!(calls[0]["id"], "call_1");
        assert_eq!(calls[0]["function"]["name"], "search_knowledge_base");
        // arguments travel as a JSON-encoded string on the wire
        assert_eq!(
            calls[0]["function"]["arguments"],
            "{\"query\":\"error 500\"}"
        );
    }

    #[test]
    fn retryable_classification() {
        assert!(LlmError::Timeout.is_retryable());
        assert!(LlmError::RateLimitExceeded.is_retryable());
        assert!(LlmError::Unavailable("503".to_string()).is_retryable());
        assert!(LlmError::Network("reset".to_string()).is_retryable());
        assert!(!LlmError::AuthenticationFailed("401".to_string()).is_retryable());
        assert!(!LlmError::InvalidRequest("bad".to_string()).is_retryable());
        assert!(!LlmError::Parse("empty".to_string()).is_retryable());
    }

    #[test]
    fn extract_raw_json() {
        let content = r#"{"ticket_id": "TKT-1001"}"#;
        assert_eq!(extract_json_object(content), Some(content));
    }

    #[test]
    fn extract_fenced_json_with_trailing_prose() {
        let content = "Here is the result:\n```json\n{\"ticket_id\": \"TKT-1001\"}\n```\nLet me know!";
        assert_eq!(
            extract_json_object(content),
            Some("{\"ticket_id\": \"TKT-1001\"}")
        );
    }

    #[test]
    fn extract_json_embedded_in_prose() {
        let content = "Sure! The triage result is {\"ticket_id\": \"TKT-1001\", \"note\": \"{braces} in strings are fine\"} as requested.";
        let extracted = extract_json_object(content).expect("embedded object");
        assert!(extracted.starts_with("{\"ticket_id\""));
        assert!(extracted.ends_with('}'));
        serde_json::from_str::<Value>(extracted).expect("valid json");
    }

    #[test]
    fn extract_rejects_plain_prose() {
        assert_eq!(extract_json_object("I could not produce a result."), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn extract_rejects_unbalanced_json() {
        assert_eq!(extract_json_object("{\"ticket_id\": \"TKT-1"), None);
    }
}
