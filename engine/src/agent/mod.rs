//! Agent loop core
//!
//! Orchestrates one triage run per ticket: a think-act-observe cycle
//! where the model reads the ticket, calls tools for context, and must
//! finish with a schema-valid triage result. Malformed output burns a
//! retry budget with corrective feedback; every run is bounded by an
//! independent iteration budget.

mod core;
mod prompt;
mod transcript;

pub use core::{NoopObserver, TriageAgent, TriageObserver, TriageRun};
pub use prompt::SYSTEM_PROMPT;
pub use transcript::Transcript;
