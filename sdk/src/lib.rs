//! Triage SDK
//!
//! Shared library providing the tool contract and error taxonomy for the
//! triage engine. Tools implement the `TriageTool` trait; the engine's
//! registry validates arguments against each tool's declared schema before
//! dispatching, and converts every failure into a `ToolOutput` the model
//! can read and recover from.

/// Tool trait and capability descriptors
pub mod tool;

/// Error types and handling
pub mod errors;

/// Tool input/output types
pub mod types;

// Re-export commonly used types
pub use errors::{TriageError, TriageErrorExt};
pub use tool::{ParameterKind, ParameterSpec, ToolDescriptor, TriageTool};
pub use types::{ToolError, ToolOutput};
