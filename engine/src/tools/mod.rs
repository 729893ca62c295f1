//! Built-in triage tools and the dispatch registry
//!
//! The registry owns every tool the model may call. Dispatch never
//! fails from the loop's point of view: unknown names, bad arguments,
//! and handler errors all come back as failed `ToolOutput`s whose
//! message tells the model how to correct itself.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use triage_sdk::{ToolOutput, TriageTool};

pub mod customer;
pub mod knowledge_base;

pub use customer::CustomerHistoryTool;
pub use knowledge_base::KnowledgeSearchTool;

use crate::llm::ToolCallRequest;

/// Registry of tools available to the model during a run
pub struct ToolRegistry {
    tools: Vec<Arc<dyn TriageTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool; registration order is the advertisement order
    pub fn register(&mut self, tool: Arc<dyn TriageTool>) {
        self.tools.push(tool);
    }

    /// Function schemas advertised to the model
    pub fn function_schemas(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|tool| tool.descriptor().to_function_schema())
            .collect()
    }

    /// Names of all registered tools
    pub fn tool_names(&self) -> Vec<String> {
        self.tools
            .iter()
            .map(|tool| tool.descriptor().name)
            .collect()
    }

    /// Dispatch one tool call, producing exactly one output.
    ///
    /// Validation runs against the descriptor before the handler sees
    /// the arguments.
    pub async fn dispatch(&self, request: &ToolCallRequest) -> ToolOutput {
        let Some(tool) = self
            .tools
            .iter()
            .find(|tool| tool.descriptor().name == request.name)
        else {
            warn!(tool = %request.name, "model requested unknown tool");
            return ToolOutput::failure(format!(
                "Unknown tool: '{}'. Available tools: {}",
                request.name,
                self.tool_names().join(", ")
            ));
        };

        let descriptor = tool.descriptor();
        let arguments = unwrap_nested_parameters(&request.arguments, &descriptor);

        if let Err(err) = descriptor.validate(arguments) {
            debug!(tool = %request.name, error = %err, "rejecting tool arguments");
            return ToolOutput::failure(format!(
                "{}. Please correct your arguments and try again.",
                err
            ));
        }

        match tool.call(arguments).await {
            Ok(payload) => ToolOutput::json(payload),
            Err(err) => ToolOutput::failure(err.to_string()),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Tolerate the common model slip of nesting the real arguments inside a
/// `"parameters"` key.
///
/// Only unwraps when the outer bag declares none of the tool's actual
/// parameters, so a legitimate parameter named `parameters` would win.
fn unwrap_nested_parameters<'a>(
    arguments: &'a Value,
    descriptor: &triage_sdk::ToolDescriptor,
) -> &'a Value {
    let Some(object) = arguments.as_object() else {
        return arguments;
    };
    let declares_real_parameter = descriptor
        .parameters
        .iter()
        .any(|spec| object.contains_key(&spec.name));
    match object.get("parameters") {
        Some(inner @ Value::Object(_)) if !declares_real_parameter => inner,
        _ => arguments,
    }
}
