//! The triage loop
//!
//! One call to [`TriageAgent::triage`] runs a full conversation for one
//! ticket:
//!
//! 1. Seed the transcript with the system prompt and the ticket payload
//! 2. Call the model (with a per-call timeout)
//! 3. If it requests tools: dispatch each in order, feed every result back
//! 4. If it proposes a final answer: parse and validate it
//! 5. On malformed output: append corrective feedback and retry
//!
//! Retryable model errors and timeouts burn the iteration budget;
//! malformed final answers burn the separate retry budget. When real
//! customer context was captured during the run, the deterministic rubric
//! recomputes the score so the model cannot wander from it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use triage_sdk::{ToolOutput, TriageError};

use crate::config::{AgentConfig, ScoringConfig};
use crate::llm::{extract_json_object, LlmClient, LlmError, Message, ModelTurn, ToolCallRequest};
use crate::scoring;
use crate::ticket::{CustomerContext, Ticket, TriageResult};
use crate::tools::ToolRegistry;

use super::prompt;
use super::Transcript;

/// Tool whose successful payload doubles as rubric input
const CUSTOMER_LOOKUP_TOOL: &str = "lookup_customer_history";

/// Observer hooks for streaming run progress (verbose CLI output)
pub trait TriageObserver: Send + Sync {
    fn on_tool_call(&self, _request: &ToolCallRequest) {}
    fn on_tool_result(&self, _tool: &str, _output: &ToolOutput) {}
    fn on_parse_retry(&self, _attempt: usize, _detail: &str) {}
    fn on_model_retry(&self, _iteration: usize, _error: &LlmError) {}
}

/// Observer that ignores everything
pub struct NoopObserver;

impl TriageObserver for NoopObserver {}

/// A completed triage run
#[derive(Debug, Clone)]
pub struct TriageRun {
    /// The validated, normalized triage decision
    pub result: TriageResult,

    /// Iterations consumed, including retried model calls
    pub iterations: usize,

    /// Malformed final answers that were corrected
    pub retries: usize,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// Full conversation for inspection
    pub transcript: Transcript,
}

/// Agent that triages tickets through the tool-calling loop
pub struct TriageAgent {
    client: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    agent_config: AgentConfig,
    scoring_config: ScoringConfig,
    shutdown: Arc<AtomicBool>,
}

impl TriageAgent {
    pub fn new(
        client: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        agent_config: AgentConfig,
        scoring_config: ScoringConfig,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            client,
            tools,
            agent_config,
            scoring_config,
            shutdown,
        }
    }

    /// Run the triage loop for one ticket.
    ///
    /// The ticket is consumed exactly once; a failure here never affects
    /// other tickets in a batch.
    pub async fn triage(
        &self,
        ticket: &Ticket,
        observer: &dyn TriageObserver,
    ) -> Result<TriageRun, TriageError> {
        let start = Instant::now();
        let schemas = self.tools.function_schemas();

        let mut transcript = Transcript::new();
        transcript.push(Message::system(prompt::SYSTEM_PROMPT));
        transcript.push(Message::user(prompt::user_message(ticket)?));

        let mut iterations: usize = 0;
        let mut retries: usize = 0;
        let mut customer_context: Option<CustomerContext> = None;

        while iterations < self.agent_config.max_iterations {
            if self.shutdown.load(Ordering::SeqCst) {
                info!(ticket = %ticket.ticket_id, "shutdown requested, abandoning run");
                return Err(TriageError::Cancelled);
            }
            iterations += 1;
            debug!(
                ticket = %ticket.ticket_id,
                iteration = iterations,
                max = self.agent_config.max_iterations,
                "model turn"
            );

            let call = self.client.complete(transcript.messages(), &schemas);
            let turn = match timeout(
                Duration::from_secs(self.agent_config.llm_timeout_secs),
                call,
            )
            .await
            {
                Ok(Ok(turn)) => turn,
                Ok(Err(err)) if err.is_retryable() => {
                    warn!(ticket = %ticket.ticket_id, error = %err, "retryable model error");
                    observer.on_model_retry(iterations, &err);
                    continue;
                }
                Ok(Err(LlmError::Parse(detail))) => {
                    // Unusable model output without content to correct;
                    // still burns the retry budget
                    if retries >= self.agent_config.max_parse_retries {
                        return Err(TriageError::RetryBudgetExhausted {
                            retries,
                            last_error: detail,
                        });
                    }
                    retries += 1;
                    observer.on_parse_retry(retries, &detail);
                    transcript.push(Message::user(prompt::correction_message(&detail)));
                    continue;
                }
                Ok(Err(err)) => return Err(map_llm_error(err)),
                Err(_) => {
                    warn!(
                        ticket = %ticket.ticket_id,
                        timeout_secs = self.agent_config.llm_timeout_secs,
                        "model call timed out"
                    );
                    observer.on_model_retry(iterations, &LlmError::Timeout);
                    continue;
                }
            };

            match turn {
                ModelTurn::ToolCalls(requests) => {
                    transcript.push(Message::assistant_tool_calls(&requests));
                    for request in &requests {
                        observer.on_tool_call(request);
                        let output = self.tools.dispatch(request).await;
                        observer.on_tool_result(&request.name, &output);

                        if request.name == CUSTOMER_LOOKUP_TOOL && output.success {
                            match serde_json::from_value(output.payload.clone()) {
                                Ok(context) => customer_context = Some(context),
                                Err(err) => {
                                    debug!(error = %err, "customer payload did not parse")
                                }
                            }
                        }

                        transcript.push(Message::tool_result(output.to_feedback(), &request.id));
                    }
                }
                ModelTurn::Final(content) => {
                    match parse_result(&content, &ticket.ticket_id) {
                        Ok(result) => {
                            transcript.push(Message::assistant(content));
                            let result =
                                self.finalize(ticket, result, customer_context.as_ref());
                            info!(
                                ticket = %ticket.ticket_id,
                                tier = %result.urgency_level,
                                score = result.urgency_score,
                                iterations,
                                retries,
                                "triage complete"
                            );
                            return Ok(TriageRun {
                                result,
                                iterations,
                                retries,
                                duration_ms: start.elapsed().as_millis() as u64,
                                transcript,
                            });
                        }
                        Err(detail) => {
                            if retries >= self.agent_config.max_parse_retries {
                                return Err(TriageError::RetryBudgetExhausted {
                                    retries,
                                    last_error: detail,
                                });
                            }
                            retries += 1;
                            debug!(
                                ticket = %ticket.ticket_id,
                                attempt = retries,
                                error = %detail,
                                "malformed final answer"
                            );
                            observer.on_parse_retry(retries, &detail);
                            transcript.push(Message::assistant(content));
                            transcript.push(Message::user(prompt::correction_message(&detail)));
                        }
                    }
                }
            }
        }

        Err(TriageError::IterationBudgetExhausted { iterations })
    }

    /// Normalize a parsed result before it leaves the agent.
    ///
    /// When the run captured real customer context, the deterministic
    /// rubric recomputes the breakdown outright. Otherwise the model's
    /// breakdown is kept, clamped into range. Either way the engine owns
    /// the final arithmetic: total, tier, and the action floor.
    fn finalize(
        &self,
        ticket: &Ticket,
        mut result: TriageResult,
        customer: Option<&CustomerContext>,
    ) -> TriageResult {
        result.score_breakdown = match customer {
            Some(customer) => scoring::score_ticket(
                &ticket.thread_text(),
                Some(customer),
                &self.scoring_config,
            ),
            None => result.score_breakdown.clamped(),
        };
        let total = i64::from(result.score_breakdown.total());
        result.urgency_score = total;
        result.urgency_level = scoring::tier_for(total, &self.scoring_config);
        result.next_action = scoring::floor_action(result.urgency_level, result.next_action);
        result
    }
}

/// Parse and validate a final answer, reporting the exact defect
fn parse_result(content: &str, ticket_id: &str) -> Result<TriageResult, String> {
    let candidate = extract_json_object(content)
        .ok_or_else(|| "no JSON object found in response".to_string())?;
    let result: TriageResult = serde_json::from_str(candidate)
        .map_err(|err| format!("response did not match the triage schema: {}", err))?;
    result.validate(ticket_id)?;
    Ok(result)
}

fn map_llm_error(err: LlmError) -> TriageError {
    match err {
        LlmError::AuthenticationFailed(detail) => TriageError::Authentication(detail),
        LlmError::RateLimitExceeded => TriageError::RateLimited,
        LlmError::InvalidRequest(detail) => TriageError::InvalidRequest(detail),
        LlmError::Timeout => TriageError::Timeout,
        LlmError::Unavailable(detail) | LlmError::Network(detail) => {
            TriageError::Unavailable(detail)
        }
        LlmError::Parse(detail) => TriageError::OutputParse(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::{NextAction, UrgencyTier};
    use serde_json::json;

    fn valid_payload(ticket_id: &str) -> String {
        json!({
            "ticket_id": ticket_id,
            "urgency_level": "medium",
            "urgency_score": 26,
            "score_breakdown": {
                "customer_value": 0,
                "impact": 6,
                "urgency_signals": 20,
                "repeat_issue": 0,
                "outage_boost": 0
            },
            "extracted_info": {
                "product_area": "billing",
                "issue_type": "payment_failure",
                "sentiment": "angry",
                "language": "en",
                "summary": "Triple-charged during upgrade"
            },
            "next_action": "route_specialist",
            "routing_queue": "billing",
            "suggested_response": "We're on it.",
            "reasoning": "Monetary impact, escalating tone.",
            "knowledge_articles_used": ["KB-001"]
        })
        .to_string()
    }

    #[test]
    fn parse_result_accepts_clean_json() {
        let result = parse_result(&valid_payload("TKT-1001"), "TKT-1001").expect("valid");
        assert_eq!(result.urgency_level, UrgencyTier::Medium);
        assert_eq!(result.next_action, NextAction::RouteSpecialist);
    }

    #[test]
    fn parse_result_accepts_fenced_json() {
        let content = format!("```json\n{}\n```", valid_payload("TKT-1001"));
        assert!(parse_result(&content, "TKT-1001").is_ok());
    }

    #[test]
    fn parse_result_rejects_prose() {
        let err = parse_result("I think this is medium urgency.", "TKT-1001")
            .expect_err("must fail");
        assert!(err.contains("no JSON object"));
    }

    #[test]
    fn parse_result_rejects_schema_mismatch() {
        let err =
            parse_result(r#"{"ticket_id": "TKT-1001"}"#, "TKT-1001").expect_err("must fail");
        assert!(err.contains("schema"));
    }

    #[test]
    fn parse_result_rejects_wrong_ticket() {
        let err = parse_result(&valid_payload("TKT-9999"), "TKT-1001").expect_err("must fail");
        assert!(err.contains("TKT-1001"));
    }

    #[test]
    fn llm_errors_map_onto_triage_errors() {
        assert!(matches!(
            map_llm_error(LlmError::RateLimitExceeded),
            TriageError::RateLimited
        ));
        assert!(matches!(
            map_llm_error(LlmError::AuthenticationFailed("401".into())),
            TriageError::Authentication(_)
        ));
        assert!(matches!(
            map_llm_error(LlmError::Network("reset".into())),
            TriageError::Unavailable(_)
        ));
    }
}
