//! Agent Relay LLM
//!
//! The boundary between the planner and model transports:
//! - `CompletionGateway` - one chat completion for an agent + dialog history
//! - `GatewayRegistry` - provider name -> gateway dispatch
//! - `TimeoutGateway` - deadline wrapper that reports `LlmError::Timeout`
//! - `TemplateRender` / `PlaceholderRenderer` - prompt template rendering
//!
//! Vendor transports implement `CompletionGateway` outside this workspace.

pub mod provider;
pub mod template;
pub mod timeout;
pub mod types;

// Re-export main types
pub use provider::{CompletionGateway, GatewayRegistry};
pub use template::{PlaceholderRenderer, TemplateRender};
pub use timeout::TimeoutGateway;
pub use types::*;
