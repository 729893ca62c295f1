//! Ticket domain model
//!
//! Structured schemas for tickets, customer context, knowledge base
//! entries, and the triage result the agent must produce. The
//! `TriageResult` schema doubles as the validation contract for the
//! model's final answer: `validate()` reports the exact violation so the
//! agent can feed it back as corrective context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket urgency classification, most urgent first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Critical,
    High,
    Medium,
    Low,
}

impl UrgencyTier {
    /// Ordering rank: higher means more urgent.
    ///
    /// Used by tests to assert the tier mapping is monotonic over scores.
    pub fn rank(&self) -> u8 {
        match self {
            UrgencyTier::Critical => 3,
            UrgencyTier::High => 2,
            UrgencyTier::Medium => 1,
            UrgencyTier::Low => 0,
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyTier::Critical => write!(f, "critical"),
            UrgencyTier::High => write!(f, "high"),
            UrgencyTier::Medium => write!(f, "medium"),
            UrgencyTier::Low => write!(f, "low"),
        }
    }
}

/// Recommended next action for a triaged ticket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    AutoRespond,
    RouteSpecialist,
    EscalateHuman,
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextAction::AutoRespond => write!(f, "auto_respond"),
            NextAction::RouteSpecialist => write!(f, "route_specialist"),
            NextAction::EscalateHuman => write!(f, "escalate_human"),
        }
    }
}

/// Customer sentiment detected in the ticket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Frustrated,
    Angry,
    Neutral,
    Positive,
    Anxious,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Frustrated => write!(f, "frustrated"),
            Sentiment::Angry => write!(f, "angry"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Anxious => write!(f, "anxious"),
        }
    }
}

/// Customer plan tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
    Enterprise,
}

/// A single message in a support ticket thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketMessage {
    /// The message content
    pub body: String,

    /// Relative or absolute timestamp
    pub timestamp: String,
}

/// An incoming customer support ticket with full thread.
///
/// Immutable once received; consumed once per triage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub customer_id: String,

    #[serde(default = "default_channel")]
    pub channel: String,

    #[serde(default)]
    pub subject: String,

    /// Ordered list of messages in the thread
    #[serde(default)]
    pub messages: Vec<TicketMessage>,

    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_channel() -> String {
    "email".to_string()
}

impl Ticket {
    /// The full thread concatenated, subject first.
    ///
    /// The scoring rubric runs its lexical cues over this text.
    pub fn thread_text(&self) -> String {
        let mut text = self.subject.clone();
        for message in &self.messages {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&message.body);
        }
        text
    }
}

/// Enriched customer context from CRM / billing / usage systems.
///
/// Looked up by tool call; read-only; lifetime = one triage run.
/// Defaults on the optional fields let this round-trip through tool
/// payloads that strip empty values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerContext {
    pub customer_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    /// Current plan: free / pro / enterprise
    pub plan: PlanTier,

    /// Monthly recurring revenue (USD)
    #[serde(default)]
    pub mrr: f64,

    /// How long they've been a customer
    #[serde(default)]
    pub tenure_months: u32,

    /// Number of seats / licenses
    #[serde(default)]
    pub seats: u32,

    /// Active days in last 7 days
    #[serde(default)]
    pub usage_last_7d: u32,

    /// Active days in last 30 days
    #[serde(default)]
    pub usage_last_30d: u32,

    /// Lifetime support tickets
    #[serde(default)]
    pub total_tickets: u32,

    /// Currently open tickets
    #[serde(default)]
    pub open_tickets: u32,

    /// Last CSAT score (1-5)
    #[serde(default)]
    pub last_csat_score: Option<f64>,

    /// Number of past escalations
    #[serde(default)]
    pub previous_escalations: u32,

    /// Any ongoing incidents affecting this customer
    #[serde(default)]
    pub active_incidents: Vec<String>,
}

/// An article from the internal knowledge base / FAQ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseEntry {
    pub article_id: String,
    pub title: String,
    pub content: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub category: String,
}

/// Maximum contribution of a single score component
pub const COMPONENT_MAX: i64 = 20;

/// Named sub-scores explaining the urgency score.
///
/// Each component contributes 0-20 points; the total is the clamped sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Score component from customer tier/MRR (0-20)
    pub customer_value: i64,

    /// Score component from issue severity (0-20)
    pub impact: i64,

    /// Score component from language / intent (0-20)
    pub urgency_signals: i64,

    /// Score component from repeat issues (0-20)
    pub repeat_issue: i64,

    /// Score boost from active incident (0-20)
    pub outage_boost: i64,
}

impl ScoreBreakdown {
    /// Ordered (component name, contribution) pairs for display
    pub fn components(&self) -> [(&'static str, i64); 5] {
        [
            ("customer_value", self.customer_value),
            ("impact", self.impact),
            ("urgency_signals", self.urgency_signals),
            ("repeat_issue", self.repeat_issue),
            ("outage_boost", self.outage_boost),
        ]
    }

    /// Clamp every component to [0, COMPONENT_MAX]
    pub fn clamped(&self) -> Self {
        Self {
            customer_value: self.customer_value.clamp(0, COMPONENT_MAX),
            impact: self.impact.clamp(0, COMPONENT_MAX),
            urgency_signals: self.urgency_signals.clamp(0, COMPONENT_MAX),
            repeat_issue: self.repeat_issue.clamp(0, COMPONENT_MAX),
            outage_boost: self.outage_boost.clamp(0, COMPONENT_MAX),
        }
    }

    /// Sum of components, clamped to [0, 100]
    pub fn total(&self) -> u8 {
        let sum: i64 = self.components().iter().map(|(_, value)| value).sum();
        sum.clamp(0, 100) as u8
    }
}

/// Key information extracted from the ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInfo {
    /// Product area affected (e.g. billing, auth)
    pub product_area: String,

    /// Type of issue (e.g. bug, feature_request)
    pub issue_type: String,

    pub sentiment: Sentiment,

    /// Detected language of the ticket (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,

    /// One-line summary of the customer's issue
    pub summary: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// The complete triage output produced by the agent.
///
/// Created exactly once per successful run; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub ticket_id: String,
    pub urgency_level: UrgencyTier,

    /// Numeric priority score 0-100
    pub urgency_score: i64,

    pub score_breakdown: ScoreBreakdown,
    pub extracted_info: ExtractedInfo,
    pub next_action: NextAction,

    /// Team/queue to route the ticket to (e.g. billing, engineering)
    pub routing_queue: String,

    /// Draft response the agent would send to the customer
    pub suggested_response: String,

    /// Brief explanation of why this triage decision was made
    pub reasoning: String,

    /// IDs of KB articles referenced during triage
    #[serde(default)]
    pub knowledge_articles_used: Vec<String>,
}

impl TriageResult {
    /// Validate ranges and identity, returning the exact violation.
    ///
    /// The returned message is fed back to the model verbatim as
    /// corrective context, so it names the offending field and bound.
    pub fn validate(&self, expected_ticket_id: &str) -> Result<(), String> {
        if self.ticket_id != expected_ticket_id {
            return Err(format!(
                "ticket_id must be '{}', got '{}'",
                expected_ticket_id, self.ticket_id
            ));
        }
        if !(0..=100).contains(&self.urgency_score) {
            return Err(format!(
                "urgency_score must be within 0-100, got {}",
                self.urgency_score
            ));
        }
        for (name, value) in self.score_breakdown.components() {
            if !(0..=COMPONENT_MAX).contains(&value) {
                return Err(format!(
                    "score_breakdown.{} must be within 0-{}, got {}",
                    name, COMPONENT_MAX, value
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn breakdown(values: [i64; 5]) -> ScoreBreakdown {
        ScoreBreakdown {
            customer_value: values[0],
            impact: values[1],
            urgency_signals: values[2],
            repeat_issue: values[3],
            outage_boost: values[4],
        }
    }

    fn sample_result() -> TriageResult {
        TriageResult {
            ticket_id: "TKT-1001".to_string(),
            urgency_level: UrgencyTier::Medium,
            urgency_score: 32,
            score_breakdown: breakdown([0, 8, 14, 0, 0]),
            extracted_info: ExtractedInfo {
                product_area: "billing".to_string(),
                issue_type: "payment_failure".to_string(),
                sentiment: Sentiment::Angry,
                language: "en".to_string(),
                summary: "Triple-charged during Pro upgrade, no Pro access".to_string(),
            },
            next_action: NextAction::RouteSpecialist,
            routing_queue: "billing".to_string(),
            suggested_response: "We're refunding the duplicate charges now.".to_string(),
            reasoning: "Monetary impact and escalating tone.".to_string(),
            knowledge_articles_used: vec!["KB-001".to_string()],
        }
    }

    #[test]
    fn thread_text_concatenates_subject_and_messages() {
        let ticket = Ticket {
            ticket_id: "TKT-1".to_string(),
            customer_id: "cust_001".to_string(),
            channel: "email".to_string(),
            subject: "System down".to_string(),
            messages: vec![
                TicketMessage {
                    body: "Error 500 everywhere".to_string(),
                    timestamp: "2 hours ago".to_string(),
                },
                TicketMessage {
                    body: "Still broken".to_string(),
                    timestamp: "just now".to_string(),
                },
            ],
            tags: vec![],
        };
        let text = ticket.thread_text();
        assert!(text.starts_with("System down"));
        assert!(text.contains("Error 500 everywhere"));
        assert!(text.ends_with("Still broken"));
    }

    #[test]
    fn breakdown_total_clamps_to_100() {
        assert_eq!(breakdown([20, 20, 20, 20, 20]).total(), 100);
        assert_eq!(breakdown([0, 0, 0, 0, 0]).total(), 0);
        assert_eq!(breakdown([10, 5, 0, 0, 0]).total(), 15);
    }

    #[test]
    fn breakdown_clamped_fixes_out_of_range_components() {
        let clamped = breakdown([25, -3, 20, 0, 7]).clamped();
        assert_eq!(clamped.customer_value, 20);
        assert_eq!(clamped.impact, 0);
        assert_eq!(clamped.outage_boost, 7);
    }

    #[test]
    fn tier_ranks_are_ordered() {
        assert!(UrgencyTier::Critical.rank() > UrgencyTier::High.rank());
        assert!(UrgencyTier::High.rank() > UrgencyTier::Medium.rank());
        assert!(UrgencyTier::Medium.rank() > UrgencyTier::Low.rank());
    }

    #[test]
    fn validate_accepts_well_formed_result() {
        assert!(sample_result().validate("TKT-1001").is_ok());
    }

    #[test]
    fn validate_reports_wrong_ticket_id() {
        let err = sample_result().validate("TKT-9999").expect_err("must fail");
        assert!(err.contains("TKT-9999"));
        assert!(err.contains("TKT-1001"));
    }

    #[test]
    fn validate_reports_out_of_range_component() {
        let mut result = sample_result();
        result.score_breakdown.impact = 35;
        let err = result.validate("TKT-1001").expect_err("must fail");
        assert!(err.contains("score_breakdown.impact"));
        assert!(err.contains("35"));
    }

    #[test]
    fn validate_reports_out_of_range_total() {
        let mut result = sample_result();
        result.urgency_score = 150;
        let err = result.validate("TKT-1001").expect_err("must fail");
        assert!(err.contains("urgency_score"));
    }

    #[test]
    fn result_deserializes_from_model_output_shape() {
        let raw = json!({
            "ticket_id": "TKT-1002",
            "urgency_level": "critical",
            "urgency_score": 72,
            "score_breakdown": {
                "customer_value": 17,
                "impact": 20,
                "urgency_signals": 15,
                "repeat_issue": 0,
                "outage_boost": 20
            },
            "extracted_info": {
                "product_area": "infrastructure",
                "issue_type": "outage",
                "sentiment": "anxious",
                "language": "th",
                "summary": "Enterprise customer blocked by regional 500 errors"
            },
            "next_action": "escalate_human",
            "routing_queue": "sre-oncall",
            "suggested_response": "...",
            "reasoning": "Active incident, enterprise plan, demo at risk",
            "knowledge_articles_used": ["KB-003", "KB-004"]
        });
        let result: TriageResult = serde_json::from_value(raw).expect("valid schema");
        assert_eq!(result.urgency_level, UrgencyTier::Critical);
        assert_eq!(result.next_action, NextAction::EscalateHuman);
        assert_eq!(result.score_breakdown.total(), 72);
        assert!(result.validate("TKT-1002").is_ok());
    }

    #[test]
    fn customer_context_tolerates_stripped_fields() {
        // Tool payloads drop empty strings, zeroes stay, lists may vanish
        let raw = json!({
            "customer_id": "cust_002",
            "plan": "enterprise",
            "mrr": 4500.0,
            "seats": 45,
            "previous_escalations": 0
        });
        let context: CustomerContext = serde_json::from_value(raw).expect("defaults fill in");
        assert_eq!(context.plan, PlanTier::Enterprise);
        assert!(context.active_incidents.is_empty());
        assert_eq!(context.name, "");
    }
}
