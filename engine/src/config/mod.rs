//! Configuration management
//!
//! This module handles loading, validation, and management of the triage
//! engine configuration. Configuration is stored in TOML format and loaded
//! from an explicit `--config` path when given; every field has a default
//! so running without a config file works out of the box.
//!
//! # Configuration Sections
//!
//! - **core**: Log level and data directory
//! - **llm**: OpenAI-compatible endpoint, model, sampling settings
//! - **agent**: Retry and iteration budgets, per-call timeout
//! - **scoring**: Rubric thresholds and point values
//!
//! # Environment Overrides
//!
//! `TRIAGE_MODEL` (or the legacy `OPENAI_MODEL`) overrides the configured
//! model name. The API key never lives in config; it is read from
//! `OPENAI_API_KEY` at startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use triage_sdk::TriageError;

/// Primary environment variable overriding the model name
pub const MODEL_VAR: &str = "TRIAGE_MODEL";

/// Legacy environment variable overriding the model name
pub const LEGACY_MODEL_VAR: &str = "OPENAI_MODEL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// LLM endpoint configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Agent loop budgets
    #[serde(default)]
    pub agent: AgentConfig,

    /// Urgency scoring rubric settings
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory holding ticket / customer / KB fixture files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

/// LLM endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the OpenAI-compatible chat completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature; kept low so triage output stays consistent
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    // Note: API key comes from OPENAI_API_KEY, never from config
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Agent loop budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum malformed-output retries per ticket
    #[serde(default = "default_max_parse_retries")]
    pub max_parse_retries: usize,

    /// Maximum conversation iterations per ticket
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Per-iteration LLM call timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub llm_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_parse_retries: default_max_parse_retries(),
            max_iterations: default_max_iterations(),
            llm_timeout_secs: default_llm_timeout(),
        }
    }
}

/// Urgency scoring rubric settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum score classified as critical
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: i64,

    /// Minimum score classified as high
    #[serde(default = "default_high_threshold")]
    pub high_threshold: i64,

    /// Minimum score classified as medium
    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: i64,

    /// Escalation count at which a customer counts as a repeat case
    #[serde(default = "default_repeat_escalation_threshold")]
    pub repeat_escalation_threshold: u32,

    /// Points granted when the customer has an active incident
    #[serde(default = "default_outage_boost_points")]
    pub outage_boost_points: i64,

    /// Impact cap for cosmetic issues and feature requests
    #[serde(default = "default_cosmetic_impact_cap")]
    pub cosmetic_impact_cap: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            critical_threshold: default_critical_threshold(),
            high_threshold: default_high_threshold(),
            medium_threshold: default_medium_threshold(),
            repeat_escalation_threshold: default_repeat_escalation_threshold(),
            outage_boost_points: default_outage_boost_points(),
            cosmetic_impact_cap: default_cosmetic_impact_cap(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-5-nano-2025-08-07".to_string()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_request_timeout() -> u64 {
    120
}

fn default_max_parse_retries() -> usize {
    10
}

fn default_max_iterations() -> usize {
    24
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_critical_threshold() -> i64 {
    60
}

fn default_high_threshold() -> i64 {
    40
}

fn default_medium_threshold() -> i64 {
    20
}

fn default_repeat_escalation_threshold() -> u32 {
    1
}

fn default_outage_boost_points() -> i64 {
    20
}

fn default_cosmetic_impact_cap() -> i64 {
    5
}

impl Config {
    /// Load configuration, with all defaults if no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path cannot be read, the TOML
    /// does not parse, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, TriageError> {
        let mut config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(
            std::env::var(MODEL_VAR).ok(),
            std::env::var(LEGACY_MODEL_VAR).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, TriageError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TriageError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| TriageError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Apply model-name environment overrides.
    ///
    /// `TRIAGE_MODEL` wins over the legacy `OPENAI_MODEL`; both win over
    /// the configured value.
    fn apply_env_overrides(&mut self, model: Option<String>, legacy_model: Option<String>) {
        if let Some(model) = model.or(legacy_model) {
            if !model.trim().is_empty() {
                self.llm.model = model;
            }
        }
    }

    /// Validate configuration invariants
    fn validate(&self) -> Result<(), TriageError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(TriageError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(TriageError::Config(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(TriageError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        let thresholds = &self.scoring;
        if !(thresholds.medium_threshold < thresholds.high_threshold
            && thresholds.high_threshold < thresholds.critical_threshold)
        {
            return Err(TriageError::Config(
                "scoring thresholds must satisfy medium < high < critical".to_string(),
            ));
        }

        Ok(())
    }
}
