//! Tool input/output types

use serde::{Deserialize, Serialize};

/// Output from a tool dispatch, fed back to the model verbatim.
///
/// Every dispatch produces exactly one `ToolOutput`, success or not.
/// Failures carry a message the model can act on (correct the tool name,
/// fix the arguments, pick another customer id) — they are never raised
/// as errors to the agent loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub payload: serde_json::Value,
    pub error: Option<String>,
}

impl ToolOutput {
    /// Create a successful output with JSON payload
    pub fn json(payload: serde_json::Value) -> Self {
        Self {
            success: true,
            payload,
            error: None,
        }
    }

    /// Create a failed output with an error message for the model
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: serde_json::Value::Null,
            error: Some(error.into()),
        }
    }

    /// Serialize for the conversation context.
    ///
    /// The model sees the same envelope for success and failure, so it can
    /// distinguish a lookup miss from a real answer.
    pub fn to_feedback(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Tool-level errors, converted to failed `ToolOutput`s by the registry
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("invalid parameter '{0}': {1}")]
    InvalidParameter(String, String),

    #[error("unexpected parameter '{0}'")]
    UnexpectedParameter(String),

    #[error("{0}")]
    NotFound(String),

    #[error("tool execution failed: {0}")]
    Execution(String),
}
