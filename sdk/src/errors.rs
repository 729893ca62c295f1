//! Error types and handling
//!
//! This module provides the error taxonomy used throughout the triage
//! engine. All errors implement the `TriageErrorExt` trait which provides
//! user-friendly hints and indicates whether errors are recoverable.
//!
//! Recoverable errors are converted into conversational feedback for the
//! model (unknown tools, bad arguments, malformed output); only budget
//! exhaustion and startup errors escalate to the caller.

use thiserror::Error;

/// Trait for triage error extensions
///
/// Provides additional context for errors: a hint that is safe to show to
/// end users, and whether the error can be recovered inside a triage run.
pub trait TriageErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable within the current run
    ///
    /// Recoverable errors are fed back to the model as corrective context
    /// or retried against the iteration budget. Non-recoverable errors
    /// terminate the run (or, for startup errors, the process).
    fn is_recoverable(&self) -> bool;
}

/// Main triage error type
///
/// # Error categories
///
/// - **Configuration / credentials**: startup failures, fatal
/// - **Tool dispatch**: unknown tool, bad arguments, lookup misses —
///   recovered locally as failed tool outputs
/// - **Model output**: schema violations — recovered by corrective retry
/// - **Transport**: timeouts and upstream failures — retried against the
///   iteration budget
/// - **Budgets**: retry or iteration budget exhausted — terminal per ticket
#[derive(Debug, Error)]
pub enum TriageError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    // Tool dispatch errors
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for tool '{tool}': {detail}")]
    InvalidArguments { tool: String, detail: String },

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    // Model output errors
    #[error("Output parse error: {0}")]
    OutputParse(String),

    // Transport errors
    #[error("LLM call timed out")]
    Timeout,

    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Budget errors
    #[error("Retry budget exhausted after {retries} parse attempts: {last_error}")]
    RetryBudgetExhausted { retries: usize, last_error: String },

    #[error("Iteration budget exhausted after {iterations} iterations")]
    IterationBudgetExhausted { iterations: usize },

    // Cancellation
    #[error("Triage run cancelled")]
    Cancelled,

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TriageErrorExt for TriageError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::MissingCredential(_) => "Export the API key before running",

            Self::UnknownTool(_) => "The model requested a tool that is not registered",
            Self::InvalidArguments { .. } => "The model sent malformed tool arguments",
            Self::CustomerNotFound(_) => "No customer record matches this id",

            Self::OutputParse(_) => "The model's final answer did not match the triage schema",

            Self::Timeout => "LLM provider took too long to respond. Try again",
            Self::Unavailable(_) => "LLM provider unavailable. Check your network",
            Self::Authentication(_) => "Authentication failed. Check your API key",
            Self::RateLimited => "Rate limit exceeded. Please wait before trying again",
            Self::InvalidRequest(_) => "The provider rejected the request",

            Self::RetryBudgetExhausted { .. } => {
                "The model never produced a valid triage result for this ticket"
            }
            Self::IterationBudgetExhausted { .. } => {
                "The run exceeded its iteration budget. The ticket was not triaged"
            }

            Self::Cancelled => "The run was cancelled before completion",

            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Terminal errors: budgets, startup, auth
            Self::Config(_)
            | Self::MissingCredential(_)
            | Self::Authentication(_)
            | Self::RetryBudgetExhausted { .. }
            | Self::IterationBudgetExhausted { .. }
            | Self::Cancelled => false,

            // All other errors are recovered inside the loop
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_errors_are_recoverable() {
        assert!(TriageError::UnknownTool("frobnicate".into()).is_recoverable());
        assert!(TriageError::CustomerNotFound("cust_999".into()).is_recoverable());
        assert!(TriageError::OutputParse("missing field".into()).is_recoverable());
        assert!(TriageError::Timeout.is_recoverable());
    }

    #[test]
    fn budget_and_startup_errors_are_terminal() {
        let budget = TriageError::RetryBudgetExhausted {
            retries: 10,
            last_error: "invalid json".into(),
        };
        assert!(!budget.is_recoverable());
        assert!(!TriageError::MissingCredential("OPENAI_API_KEY".into()).is_recoverable());
        assert!(!TriageError::Cancelled.is_recoverable());
    }

    #[test]
    fn error_messages_name_the_offender() {
        let err = TriageError::InvalidArguments {
            tool: "search_knowledge_base".into(),
            detail: "missing required parameter 'query'".into(),
        };
        let text = err.to_string();
        assert!(text.contains("search_knowledge_base"));
        assert!(text.contains("query"));
    }

    #[test]
    fn every_error_has_a_hint() {
        let errors = [
            TriageError::Config("bad".into()),
            TriageError::UnknownTool("x".into()),
            TriageError::RateLimited,
            TriageError::IterationBudgetExhausted { iterations: 24 },
        ];
        for err in errors {
            assert!(!err.user_hint().is_empty());
        }
    }
}
