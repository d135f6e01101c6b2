//! Planner Service
//!
//! Per-turn planning for multi-agent conversations:
//! - Task decomposition into a remaining-step estimate with retry
//! - Next-instruction selection with cached replay
//! - Pre/post execution hooks that maintain the routing stack
//! - A registry resolving the configured planner by name

pub mod decomposer;
pub mod instruction;
pub mod parser;
pub mod planner;
pub mod registry;
pub mod sequential;
pub mod templates;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use decomposer::{decompose, MAX_DECOMPOSITION_ATTEMPTS, PLANNER_AGENT_NAME};
pub use instruction::next_instruction;
pub use parser::{parse_decomposed_step, parse_instruction, ResponseParseError};
pub use planner::TaskPlanner;
pub use registry::{PlannerDeps, PlannerFactory, PlannerRegistry};
pub use sequential::SequentialPlanner;
pub use templates::{NEXT_STEP_TEMPLATE, REMAINING_TASK_TEMPLATE};
pub use types::{DecomposedStep, DecompositionResult, DecompositionStatus, FunctionCallFromLlm};
