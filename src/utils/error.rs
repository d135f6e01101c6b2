//! Error Handling
//!
//! Unified error types for the planner and conversation services.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use agent_relay_core::CoreError;
use agent_relay_llm::LlmError;

use crate::services::planner::parser::ResponseParseError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Core errors (routing misuse, template rendering, validation)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Completion gateway failures (transport, timeout, provider lookup)
    #[error("Completion error: {0}")]
    Llm(#[from] LlmError),

    /// Model output that does not match the expected schema
    #[error("Malformed model response: {0}")]
    MalformedResponse(#[from] ResponseParseError),

    /// A named template is missing from the agent definition
    #[error("Template '{template}' not found on agent '{agent_id}'")]
    TemplateNotFound { agent_id: String, template: String },

    /// Runaway delegation detected by the recursion counter
    #[error("Recursion limit reached: agent '{agent_id}' delegated {depth} times without handing back")]
    RecursionLimit { agent_id: String, depth: u32 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a template lookup error
    pub fn template_not_found(agent_id: impl Into<String>, template: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            agent_id: agent_id.into(),
            template: template.into(),
        }
    }
}
