//! Triage Engine Library
//!
//! This library provides the core functionality of the triage engine.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Secret handling module
pub mod secrets;

/// Ticket domain model module
pub mod ticket;

/// Read-only data repositories
pub mod data;

/// Urgency scoring rubric
pub mod scoring;

/// LLM client abstraction layer
pub mod llm;

/// Agent loop core module
pub mod agent;

/// Built-in triage tools
pub mod tools;

/// Terminal output module
pub mod presenter;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
