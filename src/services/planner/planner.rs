//! Task Planner Trait
//!
//! The fixed method set every planner implementation provides to the
//! conversation turn loop.

use async_trait::async_trait;

use agent_relay_core::{Agent, DialogTurn, RoutingContext};

use crate::utils::error::AppResult;

use super::types::FunctionCallFromLlm;

/// Decides what happens next in a conversation and maintains the routing
/// stack around each execution.
///
/// A planner instance belongs to exactly one conversation; any state it
/// keeps between turns (such as a cached instruction) is session-scoped.
#[async_trait]
pub trait TaskPlanner: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// Whether task agents receive only the context built by
    /// `before_handle_context` instead of the full dialog history.
    fn hide_dialog_context(&self) -> bool;

    /// Planner iterations allowed within one user turn.
    fn max_loop_count(&self) -> u32;

    /// Decide the next instruction for `router`.
    async fn get_next_instruction(
        &mut self,
        router: &mut Agent,
        message_id: &str,
        dialogs: &mut Vec<DialogTurn>,
    ) -> AppResult<FunctionCallFromLlm>;

    /// Extra turns handed to the task agent when the dialog context is hidden.
    fn before_handle_context(
        &self,
        inst: &FunctionCallFromLlm,
        message: &DialogTurn,
        dialogs: &[DialogTurn],
    ) -> Vec<DialogTurn>;

    /// Merge the task agent's dialog back into the main history.
    ///
    /// `task_agent_dialogs` starts with the triggering message.
    fn after_handle_context(
        &self,
        dialogs: &mut Vec<DialogTurn>,
        task_agent_dialogs: &[DialogTurn],
    ) -> bool;

    /// Called before the instruction runs. Returning `false` cancels it.
    async fn agent_executing(
        &self,
        router: &Agent,
        inst: &FunctionCallFromLlm,
        message: &mut DialogTurn,
        dialogs: &[DialogTurn],
    ) -> bool;

    /// Called once after the instruction ran. Returning `false` ends the
    /// turn loop.
    async fn agent_executed(
        &self,
        router: &Agent,
        inst: &FunctionCallFromLlm,
        message: &DialogTurn,
        dialogs: &[DialogTurn],
        routing: &mut RoutingContext,
    ) -> bool;
}
