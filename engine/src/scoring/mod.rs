//! Urgency scoring rubric
//!
//! Deterministic rubric behind the agent's urgency score. The model
//! proposes a breakdown, but when a run captured real customer context the
//! engine recomputes the components here so the same ticket always lands
//! in the same tier. Each component contributes 0-20 points; the total is
//! clamped to 0-100 and mapped onto tiers by configured thresholds.

use crate::config::ScoringConfig;
use crate::ticket::{
    CustomerContext, NextAction, PlanTier, ScoreBreakdown, UrgencyTier, COMPONENT_MAX,
};

/// Phrases that mark a service as unreachable
const OUTAGE_CUES: &[&str] = &[
    "system down",
    "is down",
    "outage",
    "can't access",
    "cannot access",
    "unable to access",
    "เข้าไม่ได้", // "can't get in"
];

/// Server error codes reported verbatim by customers
const ERROR_CODE_CUES: &[&str] = &["error 500", "http 500", "500 error", "5xx", "internal server error"];

/// Revenue at stake for the customer's own business
const REVENUE_CUES: &[&str] = &["lose this deal", "losing revenue", "major client", "demo with"];

/// Money already moved or threatened to move
const MONETARY_CUES: &[&str] = &["charge", "charged", "refund", "disputing", "chargeback", "invoice"];

/// Explicit urgency language
const URGENT_CUES: &[&str] = &["urgent", "asap", "immediately", "emergency", "right now", "fixed now"];

/// A concrete event the customer is working toward
const DEADLINE_CUES: &[&str] = &["presentation", "demo", "deadline", "end of day", "launch", "this afternoon"];

/// A stated countdown
const TIME_PRESSURE_CUES: &[&str] = &["in 1 hour", "in 2 hours", "in an hour", "within the hour", "today"];

/// Frustration markers beyond plain caps-lock
const TONE_CUES: &[&str] = &["ridiculous", "unacceptable", "disputing", "anyone there"];

/// Requests that do not block work
const COSMETIC_CUES: &[&str] = &["dark mode", "feature request", "would be cool", "nice to have", "cosmetic"];

/// Deprioritization language that overrides other urgency cues
const NO_RUSH_CUES: &[&str] = &["no rush", "whenever you get a chance", "not urgent", "no hurry"];

fn contains_any(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}

/// Count words of 3+ letters written entirely in capitals
fn shouted_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|word| {
            let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
            letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase())
        })
        .count()
}

/// Customer value component: plan tier plus MRR (0-20)
fn customer_value(customer: Option<&CustomerContext>) -> i64 {
    let Some(customer) = customer else { return 0 };
    let plan_points = match customer.plan {
        PlanTier::Enterprise => 12,
        PlanTier::Pro => 6,
        PlanTier::Free => 0,
    };
    let mrr_points = if customer.mrr >= 10_000.0 {
        8
    } else if customer.mrr >= 1_000.0 {
        5
    } else if customer.mrr >= 100.0 {
        3
    } else if customer.mrr >= 1.0 {
        1
    } else {
        0
    };
    (plan_points + mrr_points).min(COMPONENT_MAX)
}

/// Impact component: how badly work is blocked (0-20)
fn impact(text: &str, customer: Option<&CustomerContext>, config: &ScoringConfig) -> i64 {
    let mut points: i64 = 0;
    let outage = contains_any(text, OUTAGE_CUES);
    let error_code = contains_any(text, ERROR_CODE_CUES);
    let monetary = contains_any(text, MONETARY_CUES);

    if outage {
        points += 8;
    }
    if error_code {
        points += 8;
    }
    if monetary {
        points += 6;
    }
    if contains_any(text, REVENUE_CUES) {
        points += 4;
    }
    if let Some(customer) = customer {
        if customer.seats >= 10 {
            points += 6;
        } else if customer.seats >= 2 {
            points += 3;
        }
    }

    // A cosmetic issue stays low-impact unless something is actually broken
    if contains_any(text, COSMETIC_CUES) && !(outage || error_code || monetary) {
        points = points.min(config.cosmetic_impact_cap);
    }

    points.min(COMPONENT_MAX)
}

/// Urgency-signals component: language and intent (0-20)
///
/// Takes the lowercased text for cue matching plus the original text,
/// where capitalization still carries tone.
fn urgency_signals(text: &str, original: &str) -> i64 {
    if contains_any(text, NO_RUSH_CUES) {
        return 0;
    }
    let shouting = shouted_words(original);
    let mut points: i64 = 0;
    if contains_any(text, URGENT_CUES) || (text.contains("now") && shouting > 0) {
        points += 6;
    }
    if contains_any(text, DEADLINE_CUES) {
        points += 5;
    }
    if contains_any(text, TIME_PRESSURE_CUES) {
        points += 5;
    }
    if shouting >= 2 || contains_any(text, TONE_CUES) {
        points += 4;
    }
    points.min(COMPONENT_MAX)
}

/// Repeat-issue component: escalation and ticket history (0-20)
fn repeat_issue(customer: Option<&CustomerContext>, config: &ScoringConfig) -> i64 {
    let Some(customer) = customer else { return 0 };
    if customer.previous_escalations >= config.repeat_escalation_threshold {
        (8 + 4 * i64::from(customer.previous_escalations)).min(COMPONENT_MAX)
    } else if customer.total_tickets >= 3 && customer.open_tickets >= 1 {
        3
    } else {
        0
    }
}

/// Outage-boost component: active incident or live error reports (0-20)
fn outage_boost(text: &str, customer: Option<&CustomerContext>, config: &ScoringConfig) -> i64 {
    let has_incident = customer
        .map(|c| !c.active_incidents.is_empty())
        .unwrap_or(false);
    if has_incident || contains_any(text, ERROR_CODE_CUES) {
        config.outage_boost_points.clamp(0, COMPONENT_MAX)
    } else {
        0
    }
}

/// Score a ticket thread against the rubric.
///
/// `customer` is whatever context the run captured; scoring degrades
/// gracefully when the lookup never happened or missed.
pub fn score_ticket(
    thread_text: &str,
    customer: Option<&CustomerContext>,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let text = thread_text.to_lowercase();
    ScoreBreakdown {
        customer_value: customer_value(customer),
        impact: impact(&text, customer, config),
        urgency_signals: urgency_signals(&text, thread_text),
        repeat_issue: repeat_issue(customer, config),
        outage_boost: outage_boost(&text, customer, config),
    }
}

/// Map a total score onto an urgency tier
pub fn tier_for(score: i64, config: &ScoringConfig) -> UrgencyTier {
    if score >= config.critical_threshold {
        UrgencyTier::Critical
    } else if score >= config.high_threshold {
        UrgencyTier::High
    } else if score >= config.medium_threshold {
        UrgencyTier::Medium
    } else {
        UrgencyTier::Low
    }
}

/// Raise the proposed action to the floor its tier demands.
///
/// Critical tickets always reach a human; high tickets never get an
/// automated reply.
pub fn floor_action(tier: UrgencyTier, proposed: NextAction) -> NextAction {
    match (tier, proposed) {
        (UrgencyTier::Critical, _) => NextAction::EscalateHuman,
        (UrgencyTier::High, NextAction::AutoRespond) => NextAction::RouteSpecialist,
        (_, action) => action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_tickets, CustomerDirectory, InMemoryCustomerDirectory};

    fn config() -> ScoringConfig {
        ScoringConfig::default()
    }

    fn seeded(customer_id: &str) -> CustomerContext {
        InMemoryCustomerDirectory::with_fixtures()
            .find(customer_id)
            .expect("seeded customer")
    }

    fn ticket_text(ticket_id: &str) -> String {
        sample_tickets()
            .iter()
            .find(|t| t.ticket_id == ticket_id)
            .expect("seeded ticket")
            .thread_text()
    }

    #[test]
    fn enterprise_outage_scores_critical() {
        let customer = seeded("cust_002");
        let breakdown = score_ticket(&ticket_text("TKT-1002"), Some(&customer), &config());

        assert_eq!(breakdown.outage_boost, 20);
        assert!(breakdown.customer_value >= 15);
        assert!(breakdown.impact >= 16);

        let total = i64::from(breakdown.total());
        assert!(total >= 60, "expected critical, got {}", total);
        assert_eq!(tier_for(total, &config()), UrgencyTier::Critical);
    }

    #[test]
    fn cosmetic_pro_request_scores_low() {
        let customer = seeded("cust_003");
        let breakdown = score_ticket(&ticket_text("TKT-1003"), Some(&customer), &config());

        // "no rush" zeroes the urgency signals outright
        assert_eq!(breakdown.urgency_signals, 0);
        assert!(breakdown.impact <= config().cosmetic_impact_cap);
        assert_eq!(breakdown.outage_boost, 0);

        let total = i64::from(breakdown.total());
        assert!(total < 20, "expected low, got {}", total);
        assert_eq!(tier_for(total, &config()), UrgencyTier::Low);
    }

    #[test]
    fn angry_billing_free_customer_is_not_critical() {
        let customer = seeded("cust_001");
        let breakdown = score_ticket(&ticket_text("TKT-1001"), Some(&customer), &config());

        // All the anger in the world earns zero customer value on a free plan
        assert_eq!(breakdown.customer_value, 0);
        assert!(breakdown.urgency_signals >= 15);

        let total = i64::from(breakdown.total());
        assert!(total < 60, "free-plan billing must stay below critical, got {}", total);
        assert!(total >= 20, "triple charges are at least medium, got {}", total);
    }

    #[test]
    fn missing_context_still_scores_the_thread() {
        let breakdown = score_ticket(&ticket_text("TKT-1002"), None, &config());
        assert_eq!(breakdown.customer_value, 0);
        assert_eq!(breakdown.repeat_issue, 0);
        // live error reports alone still trigger the boost
        assert_eq!(breakdown.outage_boost, 20);
    }

    #[test]
    fn repeat_escalations_accumulate() {
        let mut customer = seeded("cust_001");
        customer.previous_escalations = 2;
        let breakdown = score_ticket("minor question", Some(&customer), &config());
        assert_eq!(breakdown.repeat_issue, 16);

        customer.previous_escalations = 5;
        let breakdown = score_ticket("minor question", Some(&customer), &config());
        assert_eq!(breakdown.repeat_issue, 20);
    }

    #[test]
    fn tier_thresholds_partition_the_range() {
        let config = config();
        assert_eq!(tier_for(0, &config), UrgencyTier::Low);
        assert_eq!(tier_for(19, &config), UrgencyTier::Low);
        assert_eq!(tier_for(20, &config), UrgencyTier::Medium);
        assert_eq!(tier_for(39, &config), UrgencyTier::Medium);
        assert_eq!(tier_for(40, &config), UrgencyTier::High);
        assert_eq!(tier_for(59, &config), UrgencyTier::High);
        assert_eq!(tier_for(60, &config), UrgencyTier::Critical);
        assert_eq!(tier_for(100, &config), UrgencyTier::Critical);
    }

    #[test]
    fn tier_is_monotonic_over_scores() {
        let config = config();
        let mut previous = tier_for(0, &config).rank();
        for score in 1..=100 {
            let rank = tier_for(score, &config).rank();
            assert!(rank >= previous);
            previous = rank;
        }
    }

    #[test]
    fn action_floor_blocks_auto_respond_on_hot_tickets() {
        assert_eq!(
            floor_action(UrgencyTier::Critical, NextAction::AutoRespond),
            NextAction::EscalateHuman
        );
        assert_eq!(
            floor_action(UrgencyTier::Critical, NextAction::RouteSpecialist),
            NextAction::EscalateHuman
        );
        assert_eq!(
            floor_action(UrgencyTier::High, NextAction::AutoRespond),
            NextAction::RouteSpecialist
        );
        assert_eq!(
            floor_action(UrgencyTier::High, NextAction::EscalateHuman),
            NextAction::EscalateHuman
        );
        assert_eq!(
            floor_action(UrgencyTier::Low, NextAction::AutoRespond),
            NextAction::AutoRespond
        );
    }

    #[test]
    fn shouting_detection_needs_real_words() {
        assert_eq!(shouted_words("HELLO?? I need this NOW"), 2);
        assert_eq!(shouted_words("ok I am fine"), 0);
        // short tokens like "I" or "OK" don't count
        assert_eq!(shouted_words("OK I see"), 0);
    }
}
