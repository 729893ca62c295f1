//! Customer history lookup tool

use crate::data::{customer_payload, CustomerDirectory};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use triage_sdk::{ParameterKind, ParameterSpec, ToolDescriptor, ToolError, TriageTool};

/// Tool exposing the customer directory to the model
pub struct CustomerHistoryTool {
    directory: Arc<dyn CustomerDirectory>,
}

impl CustomerHistoryTool {
    pub fn new(directory: Arc<dyn CustomerDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl TriageTool for CustomerHistoryTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "lookup_customer_history",
            "Look up a customer's full context including plan, MRR, usage stats, \
             past support history, CSAT scores, escalation history, and any \
             active incidents. Use this to understand customer value and context \
             before scoring urgency.",
        )
        .with_parameter(ParameterSpec::required(
            "customer_id",
            ParameterKind::String,
            "The unique customer identifier, e.g. 'cust_001'",
        ))
    }

    async fn call(&self, arguments: &Value) -> Result<Value, ToolError> {
        let customer_id = arguments
            .get("customer_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::MissingParameter("customer_id".to_string()))?;

        match self.directory.find(customer_id) {
            Some(customer) => Ok(customer_payload(&customer)),
            None => Err(ToolError::NotFound(format!(
                "Customer '{}' not found in database.",
                customer_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryCustomerDirectory;
    use serde_json::json;

    fn tool() -> CustomerHistoryTool {
        CustomerHistoryTool::new(Arc::new(InMemoryCustomerDirectory::with_fixtures()))
    }

    #[tokio::test]
    async fn lookup_strips_empty_fields() {
        let payload = tool()
            .call(&json!({"customer_id": "cust_001"}))
            .await
            .expect("seeded customer");
        let object = payload.as_object().expect("object");
        assert_eq!(object["plan"], "free");
        // free customer: null csat and empty incidents are dropped
        assert!(!object.contains_key("last_csat_score"));
        assert!(!object.contains_key("active_incidents"));
    }

    #[tokio::test]
    async fn lookup_keeps_incidents_when_present() {
        let payload = tool()
            .call(&json!({"customer_id": "cust_002"}))
            .await
            .expect("seeded customer");
        let incidents = payload["active_incidents"].as_array().expect("incidents");
        assert_eq!(incidents.len(), 1);
    }

    #[tokio::test]
    async fn lookup_unknown_customer_is_not_found() {
        let err = tool()
            .call(&json!({"customer_id": "cust_404"}))
            .await
            .expect_err("must miss");
        assert!(matches!(err, ToolError::NotFound(_)));
    }
}
