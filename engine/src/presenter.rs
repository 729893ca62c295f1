//! Terminal output
//!
//! Renders triage runs for the console: a per-ticket report with the
//! score breakdown, extracted info, action, and drafted response, plus a
//! verbose observer that streams tool calls and retries as they happen.

use crate::agent::{TriageObserver, TriageRun};
use crate::llm::{LlmError, ToolCallRequest};
use crate::ticket::{NextAction, Ticket, UrgencyTier};
use triage_sdk::{ToolOutput, TriageError, TriageErrorExt};

/// Longest tool payload echoed in verbose mode
const VERBOSE_RESULT_PREVIEW: usize = 200;

fn tier_badge(tier: UrgencyTier) -> &'static str {
    match tier {
        UrgencyTier::Critical => "CRITICAL",
        UrgencyTier::High => "HIGH",
        UrgencyTier::Medium => "MEDIUM",
        UrgencyTier::Low => "LOW",
    }
}

fn action_label(action: NextAction) -> &'static str {
    match action {
        NextAction::AutoRespond => "Auto-Respond",
        NextAction::RouteSpecialist => "Route to Specialist",
        NextAction::EscalateHuman => "Escalate to Human",
    }
}

/// Opening banner for a batch run
pub fn banner(model: &str) {
    println!();
    println!("Support Ticket Triage Agent");
    println!("model: {}", model);
    println!("{}", "=".repeat(60));
}

/// Per-ticket progress line
pub fn processing_header(index: usize, total: usize, ticket: &Ticket) {
    println!();
    println!(
        "Processing ticket {}/{}: {} — {}",
        index, total, ticket.ticket_id, ticket.subject
    );
}

/// Full report for a completed run
pub fn display_result(run: &TriageRun, ticket: &Ticket) {
    let result = &run.result;

    println!();
    println!(
        "[{}]  Score: {}/100  —  Ticket {} ({})",
        tier_badge(result.urgency_level),
        result.urgency_score,
        result.ticket_id,
        ticket.subject
    );

    println!();
    println!("  Score Breakdown");
    for (name, value) in result.score_breakdown.components() {
        println!("    {:<16} {:>3} / 20", name, value);
    }
    println!("    {:<16} {:>3} / 100", "total", result.urgency_score);

    let info = &result.extracted_info;
    println!();
    println!("  Extracted Information");
    println!("    product area:  {}", info.product_area);
    println!("    issue type:    {}", info.issue_type);
    println!("    sentiment:     {}", info.sentiment);
    println!("    language:      {}", info.language);
    println!("    summary:       {}", info.summary);

    println!();
    println!("  Action:  {}", action_label(result.next_action));
    println!("  Queue:   {}", result.routing_queue);

    println!();
    println!("  Reasoning");
    println!("    {}", result.reasoning);

    println!();
    println!("  Suggested Response");
    for line in result.suggested_response.lines() {
        println!("    {}", line);
    }

    if !result.knowledge_articles_used.is_empty() {
        println!();
        println!(
            "  KB articles referenced: {}",
            result.knowledge_articles_used.join(", ")
        );
    }

    println!();
    println!(
        "  ({} iterations, {} retries, {}ms)",
        run.iterations, run.retries, run.duration_ms
    );
    println!("{}", "-".repeat(60));
}

/// Failure report for a ticket that could not be triaged
pub fn display_failure(ticket: &Ticket, error: &TriageError) {
    println!();
    println!("  ✗ Error processing {}: {}", ticket.ticket_id, error);
    println!("    {}", error.user_hint());
    println!("{}", "-".repeat(60));
}

/// Closing summary for a batch run
pub fn summary(succeeded: usize, failed: usize) {
    println!();
    if failed == 0 {
        println!("✓ All {} tickets processed.", succeeded);
    } else {
        println!("{} tickets processed, {} failed.", succeeded, failed);
    }
    println!();
}

/// Observer that streams run progress to the console (`--verbose`)
pub struct ConsoleObserver;

impl TriageObserver for ConsoleObserver {
    fn on_tool_call(&self, request: &ToolCallRequest) {
        println!("  Tool call: {}({})", request.name, request.arguments);
    }

    fn on_tool_result(&self, tool: &str, output: &ToolOutput) {
        let feedback = output.to_feedback();
        let preview: String = feedback.chars().take(VERBOSE_RESULT_PREVIEW).collect();
        let ellipsis = if feedback.chars().count() > VERBOSE_RESULT_PREVIEW {
            "..."
        } else {
            ""
        };
        println!("  Result ({}): {}{}", tool, preview, ellipsis);
    }

    fn on_parse_retry(&self, attempt: usize, detail: &str) {
        println!("  Retry {}: {}", attempt, detail);
    }

    fn on_model_retry(&self, iteration: usize, error: &LlmError) {
        println!("  Model error on iteration {}: {} (retrying)", iteration, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges_cover_every_tier() {
        assert_eq!(tier_badge(UrgencyTier::Critical), "CRITICAL");
        assert_eq!(tier_badge(UrgencyTier::Low), "LOW");
    }

    #[test]
    fn action_labels_are_human_readable() {
        assert_eq!(action_label(NextAction::EscalateHuman), "Escalate to Human");
        assert_eq!(action_label(NextAction::AutoRespond), "Auto-Respond");
    }
}
