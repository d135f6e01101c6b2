//! Conversation Service
//!
//! Drives a router agent through repeated planner decisions until a reply is
//! produced, the planner stops, or the loop budget runs out.

pub mod executor;
pub mod session;

pub use executor::{AgentExecutor, ExecutionOutcome};
pub use session::{ConversationSession, TurnOutcome};
