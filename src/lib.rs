//! Agent Relay
//!
//! Routing and sequential task planning for multi-agent LLM conversations.
//! It includes:
//! - The sequential planner (decomposition analyzer, next-instruction
//!   selector and routing hooks)
//! - The conversation turn loop that drives a planner against an executor
//! - Settings model, JSON config storage and path utilities
//! - Logging setup and the application error type
//!
//! Agent/dialog data and the routing context live in `agent_relay_core`;
//! the completion gateway boundary lives in `agent_relay_llm`.

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::settings::{RelaySettings, SettingsUpdate};
pub use services::conversation::{AgentExecutor, ConversationSession, ExecutionOutcome, TurnOutcome};
pub use services::planner::{
    DecomposedStep, DecompositionResult, DecompositionStatus, FunctionCallFromLlm, PlannerDeps,
    PlannerRegistry, ResponseParseError, SequentialPlanner, TaskPlanner,
};
pub use storage::config::ConfigService;
pub use utils::error::{AppError, AppResult};
pub use utils::logging::init_tracing;
