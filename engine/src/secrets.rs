//! Secret handling
//!
//! Wraps sensitive values so they never leak through logs or error
//! messages, plus the credential loader for the OpenAI API key.

use std::fmt;
use triage_sdk::TriageError;

/// Environment variable holding the OpenAI API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// A wrapper for sensitive string data that prevents accidental logging.
///
/// It implements `Debug` and `Display` to always print `[REDACTED]`.
/// To access the actual secret value, use the `unsecure()` method.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new SecretString
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Access the raw underlying string
    pub fn unsecure(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Load the OpenAI API key from the environment.
///
/// A missing or empty key is a startup failure, reported before any
/// ticket is processed.
pub fn openai_api_key() -> Result<SecretString, TriageError> {
    match std::env::var(API_KEY_VAR) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::new(value)),
        _ => Err(TriageError::MissingCredential(API_KEY_VAR.to_string())),
    }
}
