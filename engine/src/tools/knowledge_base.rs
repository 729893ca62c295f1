//! Knowledge base search tool

use crate::data::KnowledgeBase;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use triage_sdk::{ParameterKind, ParameterSpec, ToolDescriptor, ToolError, TriageTool};

/// Tool exposing the internal FAQ / docs search to the model
pub struct KnowledgeSearchTool {
    knowledge_base: Arc<dyn KnowledgeBase>,
}

impl KnowledgeSearchTool {
    pub fn new(knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }
}

#[async_trait]
impl TriageTool for KnowledgeSearchTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "search_knowledge_base",
            "Search the internal knowledge base (FAQ & docs) for articles relevant \
             to a customer's issue. Returns matching articles ranked by relevance. \
             Use this to find solutions, workarounds, or relevant documentation \
             before composing a response.",
        )
        .with_parameter(ParameterSpec::required(
            "query",
            ParameterKind::String,
            "Search query describing the issue, e.g. \
             'payment failed duplicate charges' or 'error 500 asia region'",
        ))
    }

    async fn call(&self, arguments: &Value) -> Result<Value, ToolError> {
        let query = arguments
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::MissingParameter("query".to_string()))?;

        let articles = self.knowledge_base.search(query);
        serde_json::to_value(articles).map_err(|e| ToolError::Execution(e.to_string()))
    }
}
