//! Read-only data repositories
//!
//! Trait seams for the systems the triage tools read from: the customer
//! directory (CRM / billing / usage) and the knowledge base. The in-memory
//! implementations ship with seeded fixtures so the agent runs end-to-end
//! without external services; production backends would implement the same
//! traits.

use crate::ticket::{CustomerContext, KnowledgeBaseEntry, Ticket};
use serde_json::Value;

mod fixtures;

/// Number of articles a knowledge base search returns at most
pub const SEARCH_RESULT_LIMIT: usize = 3;

/// Enriched customer context lookup
pub trait CustomerDirectory: Send + Sync {
    /// Find a customer by id; `None` when unknown
    fn find(&self, customer_id: &str) -> Option<CustomerContext>;
}

/// Keyword search over internal FAQ / docs
pub trait KnowledgeBase: Send + Sync {
    /// Return matching articles ranked by relevance, best first
    fn search(&self, query: &str) -> Vec<KnowledgeBaseEntry>;
}

/// In-memory customer directory seeded with fixture records
pub struct InMemoryCustomerDirectory {
    customers: Vec<CustomerContext>,
}

impl InMemoryCustomerDirectory {
    pub fn with_fixtures() -> Self {
        Self {
            customers: fixtures::customers(),
        }
    }

    pub fn new(customers: Vec<CustomerContext>) -> Self {
        Self { customers }
    }
}

impl CustomerDirectory for InMemoryCustomerDirectory {
    fn find(&self, customer_id: &str) -> Option<CustomerContext> {
        self.customers
            .iter()
            .find(|customer| customer.customer_id == customer_id)
            .cloned()
    }
}

/// In-memory knowledge base with keyword-overlap ranking
pub struct InMemoryKnowledgeBase {
    articles: Vec<KnowledgeBaseEntry>,
}

impl InMemoryKnowledgeBase {
    pub fn with_fixtures() -> Self {
        Self {
            articles: fixtures::knowledge_base(),
        }
    }

    pub fn new(articles: Vec<KnowledgeBaseEntry>) -> Self {
        Self { articles }
    }
}

impl KnowledgeBase for InMemoryKnowledgeBase {
    /// Keyword-overlap search.
    ///
    /// Relevance = |query tokens ∩ article tokens| / |query tokens|, over
    /// lowercased whitespace tokens of title, content, and tags. Articles
    /// with zero overlap are dropped; ties keep insertion order (stable
    /// sort), and at most `SEARCH_RESULT_LIMIT` articles are returned.
    fn search(&self, query: &str) -> Vec<KnowledgeBaseEntry> {
        let query_tokens: Vec<String> = tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &KnowledgeBaseEntry)> = Vec::new();
        for article in &self.articles {
            let mut article_tokens = tokenize(&article.title);
            article_tokens.extend(tokenize(&article.content));
            for tag in &article.tags {
                article_tokens.extend(tokenize(tag));
            }

            let overlap = query_tokens
                .iter()
                .filter(|token| article_tokens.contains(token))
                .count();
            if overlap > 0 {
                let score = overlap as f64 / query_tokens.len() as f64;
                scored.push((score, article));
            }
        }

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(SEARCH_RESULT_LIMIT)
            .map(|(_, article)| article.clone())
            .collect()
    }
}

/// Lowercased, deduplicated whitespace tokens
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in text.to_lowercase().split_whitespace() {
        if !tokens.iter().any(|existing| existing == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// The seeded sample tickets processed by `triage run`
pub fn sample_tickets() -> Vec<Ticket> {
    fixtures::sample_tickets()
}

/// Serialize a customer record for a tool payload, dropping empty fields.
///
/// Nulls, empty strings, and empty arrays are removed so the model is not
/// distracted by absent data. `CustomerContext`'s serde defaults accept the
/// stripped shape back.
pub fn customer_payload(customer: &CustomerContext) -> Value {
    let value = serde_json::to_value(customer).unwrap_or(Value::Null);
    let Value::Object(map) = value else {
        return value;
    };
    let stripped: serde_json::Map<String, Value> = map
        .into_iter()
        .filter(|(_, value)| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        })
        .collect();
    Value::Object(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::PlanTier;

    #[test]
    fn directory_finds_known_customer() {
        let directory = InMemoryCustomerDirectory::with_fixtures();
        let customer = directory.find("cust_002").expect("seeded");
        assert_eq!(customer.plan, PlanTier::Enterprise);
        assert_eq!(customer.seats, 45);
        assert!(!customer.active_incidents.is_empty());
    }

    #[test]
    fn directory_misses_unknown_customer() {
        let directory = InMemoryCustomerDirectory::with_fixtures();
        assert!(directory.find("cust_999").is_none());
    }

    #[test]
    fn search_ranks_by_overlap_fraction() {
        let kb = InMemoryKnowledgeBase::with_fixtures();
        let results = kb.search("payment failed duplicate charges");
        assert!(!results.is_empty());
        assert_eq!(results[0].article_id, "KB-001");
    }

    #[test]
    fn search_caps_result_count() {
        let kb = InMemoryKnowledgeBase::with_fixtures();
        let results = kb.search("enterprise plan upgrade billing error region");
        assert!(results.len() <= SEARCH_RESULT_LIMIT);
    }

    #[test]
    fn search_with_no_overlap_is_empty() {
        let kb = InMemoryKnowledgeBase::with_fixtures();
        assert!(kb.search("zzzz qqqq").is_empty());
        assert!(kb.search("").is_empty());
    }

    #[test]
    fn search_finds_outage_article_for_error_500() {
        let kb = InMemoryKnowledgeBase::with_fixtures();
        let results = kb.search("error 500 asia region");
        let ids: Vec<&str> = results.iter().map(|a| a.article_id.as_str()).collect();
        assert!(ids.contains(&"KB-003"));
    }

    #[test]
    fn customer_payload_strips_empty_fields() {
        let mut customer = InMemoryCustomerDirectory::with_fixtures()
            .find("cust_001")
            .expect("seeded");
        customer.email = String::new();

        let payload = customer_payload(&customer);
        let object = payload.as_object().expect("object payload");
        // null csat, empty incidents list, blanked email all dropped
        assert!(!object.contains_key("last_csat_score"));
        assert!(!object.contains_key("active_incidents"));
        assert!(!object.contains_key("email"));
        assert_eq!(object["customer_id"], "cust_001");

        // stripped payload still parses back into a context
        let parsed: CustomerContext = serde_json::from_value(payload).expect("defaults fill in");
        assert_eq!(parsed.customer_id, "cust_001");
    }

    #[test]
    fn sample_tickets_reference_seeded_customers() {
        let directory = InMemoryCustomerDirectory::with_fixtures();
        for ticket in sample_tickets() {
            assert!(
                directory.find(&ticket.customer_id).is_some(),
                "ticket {} references unknown customer {}",
                ticket.ticket_id,
                ticket.customer_id
            );
            assert!(!ticket.messages.is_empty());
        }
    }

    #[test]
    fn thread_text_covers_full_conversation() {
        let tickets = sample_tickets();
        let billing = tickets
            .iter()
            .find(|t| t.ticket_id == "TKT-1001")
            .expect("seeded");
        let text = billing.thread_text();
        assert!(text.contains("THREE charges"));
        assert!(text.contains("presentation in 2 hours"));
    }
}
