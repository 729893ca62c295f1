//! OpenAI chat-completions client with native tool calling

use super::{LlmClient, LlmError, Message, ModelTurn, ToolCallRequest};
use crate::config::LlmConfig;
use crate::secrets::SecretString;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

pub struct OpenAiClient {
    config: LlmConfig,
    api_key: SecretString,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig, api_key: SecretString) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn wire_messages(messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                let mut entry = json!({
                    "role": msg.role.to_string(),
                    "content": msg.content,
                });
                if let Some(id) = &msg.tool_call_id {
                    entry["tool_call_id"] = json!(id);
                }
                if let Some(calls) = &msg.tool_calls {
                    entry["tool_calls"] = calls.clone();
                }
                entry
            })
            .collect()
    }

    /// Decode one entry of the response `tool_calls` array.
    ///
    /// Argument text that is not valid JSON is passed through as a string
    /// so registry validation can describe the problem to the model.
    fn decode_tool_call(entry: &Value) -> Result<ToolCallRequest, LlmError> {
        let id = entry
            .get("id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4()));
        let function = entry
            .get("function")
            .ok_or_else(|| LlmError::Parse("tool call without function".to_string()))?;
        let name = function
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LlmError::Parse("tool call without name".to_string()))?;
        let raw_arguments = function
            .get("arguments")
            .and_then(|v| v.as_str())
            .unwrap_or("{}");
        let arguments = serde_json::from_str(raw_arguments)
            .unwrap_or_else(|_| Value::String(raw_arguments.to_string()));
        Ok(ToolCallRequest::new(id, name, arguments))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, messages: &[Message], tools: &[Value]) -> super::Result<ModelTurn> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut payload = json!({
            "model": self.config.model,
            "messages": Self::wire_messages(messages),
            "temperature": self.config.temperature,
        });
        if !tools.is_empty() {
            payload["tools"] = Value::Array(tools.to_vec());
            payload["tool_choice"] = json!("auto");
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.unsecure()))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed(text),
                429 => LlmError::RateLimitExceeded,
                500..=599 => LlmError::Unavailable(format!("{}: {}", status, text)),
                _ => LlmError::InvalidRequest(text),
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let message = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| LlmError::Parse("No message in response".to_string()))?;

        if let Some(calls) = message.get("tool_calls").and_then(|v| v.as_array()) {
            if !calls.is_empty() {
                let requests = calls
                    .iter()
                    .map(Self::decode_tool_call)
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(ModelTurn::ToolCalls(requests));
            }
        }

        match message.get("content").and_then(|c| c.as_str()) {
            Some(content) if !content.trim().is_empty() => {
                Ok(ModelTurn::Final(content.to_string()))
            }
            _ => Err(LlmError::Parse("Empty content".to_string())),
        }
    }
}
