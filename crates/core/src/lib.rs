//! Agent Relay Core
//!
//! Foundational data types for the Agent Relay workspace: agent definitions,
//! dialog turns, the per-conversation routing context and the core error
//! type. This crate has no dependency on LLM transports or planners.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `agent` - Agent definitions and named templates
//! - `dialog` - Dialog turns, roles and chat-sample parsing
//! - `context` - Routing context (agent call stack + recursion counter)
//! - `builders` - Validated agent construction

pub mod agent;
pub mod builders;
pub mod context;
pub mod dialog;
pub mod error;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Agents & Dialogs ───────────────────────────────────────────────────
pub use agent::{Agent, AgentLlmConfig, AgentTemplate, CONVERSATION_KEY};
pub use dialog::{parse_chat_samples, AgentRole, DialogTurn};

// ── Routing ────────────────────────────────────────────────────────────
pub use context::RoutingContext;

// ── Builders ───────────────────────────────────────────────────────────
pub use builders::AgentBuilder;
