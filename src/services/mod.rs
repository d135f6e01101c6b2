//! Business Logic Services
//!
//! - `planner` - task decomposition, instruction selection and routing hooks
//! - `conversation` - the per-session turn loop driving a planner

pub mod conversation;
pub mod planner;
