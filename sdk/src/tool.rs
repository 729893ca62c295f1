//! Tool trait and capability descriptors
//!
//! This module defines the `TriageTool` trait that all tools implement,
//! plus the descriptor types the engine uses both to advertise tools to
//! the model (as chat-completions function schemas) and to validate
//! incoming argument bags before a handler ever runs.

use crate::types::ToolError;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Declared type of a single tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    String,
    Integer,
    Boolean,
}

impl ParameterKind {
    fn json_type(&self) -> &'static str {
        match self {
            ParameterKind::String => "string",
            ParameterKind::Integer => "integer",
            ParameterKind::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            ParameterKind::String => value.is_string(),
            ParameterKind::Integer => value.is_i64() || value.is_u64(),
            ParameterKind::Boolean => value.is_boolean(),
        }
    }
}

/// A single declared parameter of a tool
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub description: String,
    pub required: bool,
}

impl ParameterSpec {
    /// Create a required parameter
    pub fn required(
        name: impl Into<String>,
        kind: ParameterKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        }
    }

    /// Create an optional parameter
    pub fn optional(
        name: impl Into<String>,
        kind: ParameterKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: false,
        }
    }
}

/// Capability descriptor advertised to the model
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    /// Render as a chat-completions function schema.
    ///
    /// The shape matches the OpenAI `tools` parameter:
    /// `{"type": "function", "function": {"name", "description", "parameters"}}`.
    pub fn to_function_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for spec in &self.parameters {
            properties.insert(
                spec.name.clone(),
                json!({
                    "type": spec.kind.json_type(),
                    "description": spec.description,
                }),
            );
            if spec.required {
                required.push(Value::String(spec.name.clone()));
            }
        }
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": Value::Object(properties),
                    "required": Value::Array(required),
                    "additionalProperties": false,
                },
            },
        })
    }

    /// Validate an argument bag against this descriptor.
    ///
    /// Checks run in order: the bag must be a JSON object, every required
    /// parameter must be present, every present parameter must have the
    /// declared type, and no undeclared parameters are accepted. Rejects
    /// rather than coercing.
    pub fn validate(&self, arguments: &Value) -> Result<(), ToolError> {
        let Some(object) = arguments.as_object() else {
            return Err(ToolError::InvalidParameter(
                "arguments".to_string(),
                "expected a JSON object".to_string(),
            ));
        };

        for spec in &self.parameters {
            match object.get(&spec.name) {
                Some(value) => {
                    if !spec.kind.matches(value) {
                        return Err(ToolError::InvalidParameter(
                            spec.name.clone(),
                            format!("expected a {}", spec.kind.json_type()),
                        ));
                    }
                }
                None if spec.required => {
                    return Err(ToolError::MissingParameter(spec.name.clone()));
                }
                None => {}
            }
        }

        for key in object.keys() {
            if !self.parameters.iter().any(|spec| &spec.name == key) {
                return Err(ToolError::UnexpectedParameter(key.clone()));
            }
        }

        Ok(())
    }
}

/// Trait that all triage tools implement.
///
/// Handlers must be deterministic and side-effect-free: they are read-only
/// lookups dispatched mid-conversation, and the same arguments must always
/// produce the same payload within a run.
#[async_trait]
pub trait TriageTool: Send + Sync {
    /// The tool's capability descriptor (name, description, schema)
    fn descriptor(&self) -> ToolDescriptor;

    /// Handle an invocation with pre-validated arguments
    async fn call(&self, arguments: &Value) -> Result<Value, ToolError>;
}
