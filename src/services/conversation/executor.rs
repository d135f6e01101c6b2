//! Agent Executor
//!
//! The host-side collaborator that carries out planner instructions.

use async_trait::async_trait;

use agent_relay_core::{Agent, DialogTurn};

use crate::services::planner::FunctionCallFromLlm;
use crate::utils::error::AppResult;

/// Result of running one instruction on a task agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOutcome {
    /// Turns produced by the task agent, in order.
    pub dialogs: Vec<DialogTurn>,
    /// The executed function asked to end the turn loop.
    pub stop_completion: bool,
    /// The last turn in `dialogs` is the final reply for the user.
    pub responded: bool,
    /// Hand the same request on to another agent before returning.
    pub redirect_to: Option<String>,
}

impl ExecutionOutcome {
    /// Intermediate result: the planner should keep going.
    pub fn proceed(dialogs: Vec<DialogTurn>) -> Self {
        Self {
            dialogs,
            ..Default::default()
        }
    }

    /// Final reply for the user.
    pub fn respond(reply: DialogTurn) -> Self {
        Self {
            dialogs: vec![reply],
            responded: true,
            ..Default::default()
        }
    }

    /// End the conversation loop after these turns.
    pub fn stop(dialogs: Vec<DialogTurn>) -> Self {
        Self {
            dialogs,
            stop_completion: true,
            ..Default::default()
        }
    }

    pub fn redirect(agent_id: impl Into<String>, dialogs: Vec<DialogTurn>) -> Self {
        Self {
            dialogs,
            redirect_to: Some(agent_id.into()),
            ..Default::default()
        }
    }
}

/// Executes instructions chosen by a planner.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Agent that should carry out `inst`.
    fn resolve_target(&self, router: &Agent, inst: &FunctionCallFromLlm) -> AppResult<String>;

    /// Run `inst` on `agent_id`.
    ///
    /// `context` is the dialog the agent is allowed to see: the full history,
    /// or only the triggering message plus planner-provided turns when the
    /// planner hides dialog context.
    async fn execute(
        &self,
        agent_id: &str,
        inst: &FunctionCallFromLlm,
        message: &DialogTurn,
        context: &[DialogTurn],
    ) -> AppResult<ExecutionOutcome>;
}
