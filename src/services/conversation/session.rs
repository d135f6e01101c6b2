//! Conversation Session
//!
//! Owns one conversation's router agent, dialog history, routing context
//! and planner. Each user message runs the planner loop:
//!
//! 1. Ask the planner for the next instruction
//! 2. Run the pre-execution hooks
//! 3. Delegate to the target agent (following redirects)
//! 4. Merge the produced turns and run the post-execution hook
//!
//! `&mut self` on `run_turn` keeps a session to one active turn at a time.

use std::iter;

use uuid::Uuid;

use agent_relay_core::{Agent, CoreError, DialogTurn, RoutingContext};

use crate::models::settings::RelaySettings;
use crate::services::planner::{FunctionCallFromLlm, PlannerDeps, PlannerRegistry, TaskPlanner};
use crate::utils::error::{AppError, AppResult};

use super::executor::{AgentExecutor, ExecutionOutcome};

/// How a user turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// A task agent produced the final reply.
    Responded { reply: DialogTurn, iterations: u32 },
    /// The planner ended the loop; the routing context may be terminated.
    Stopped { reason: String, iterations: u32 },
    /// The planner's loop budget ran out without a reply.
    LoopLimitReached { iterations: u32 },
}

impl TurnOutcome {
    pub fn iterations(&self) -> u32 {
        match self {
            TurnOutcome::Responded { iterations, .. }
            | TurnOutcome::Stopped { iterations, .. }
            | TurnOutcome::LoopLimitReached { iterations } => *iterations,
        }
    }
}

pub struct ConversationSession {
    id: String,
    router: Agent,
    history: Vec<DialogTurn>,
    routing: RoutingContext,
    planner: Box<dyn TaskPlanner>,
    max_recursion_depth: u32,
}

impl ConversationSession {
    pub fn new(router: Agent, planner: Box<dyn TaskPlanner>, settings: &RelaySettings) -> Self {
        let routing = RoutingContext::new(router.id.clone());
        Self {
            id: Uuid::new_v4().to_string(),
            router,
            history: Vec::new(),
            routing,
            planner,
            max_recursion_depth: settings.max_recursion_depth,
        }
    }

    /// Create a session with the planner named in `deps.settings.planner`.
    pub fn from_registry(
        router: Agent,
        registry: &PlannerRegistry,
        deps: &PlannerDeps,
    ) -> AppResult<Self> {
        let planner = registry.create(&deps.settings.planner, deps)?;
        Ok(Self::new(router, planner, &deps.settings))
    }

    /// Seed the session with earlier dialog history.
    pub fn with_history(mut self, history: Vec<DialogTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn router(&self) -> &Agent {
        &self.router
    }

    pub fn history(&self) -> &[DialogTurn] {
        &self.history
    }

    pub fn routing(&self) -> &RoutingContext {
        &self.routing
    }

    pub fn planner_name(&self) -> &str {
        self.planner.name()
    }

    /// Start over with a fresh routing context after a stop.
    ///
    /// History and planner state are kept.
    pub fn reset(&mut self) {
        self.routing = RoutingContext::new(self.router.id.clone());
        tracing::info!("[Conversation] Session {} routing reset", self.id);
    }

    /// Handle one user message.
    pub async fn run_turn(
        &mut self,
        executor: &dyn AgentExecutor,
        user_text: &str,
    ) -> AppResult<TurnOutcome> {
        if self.routing.is_terminated() {
            return Err(CoreError::routing(format!(
                "session {} was stopped; reset it before sending more messages",
                self.id
            ))
            .into());
        }

        let mut message = DialogTurn::user(user_text).with_agent(self.router.id.clone());
        let message_id = message.message_id.clone();
        let message_index = self.history.len();
        self.history.push(message.clone());

        let max_loops = self.planner.max_loop_count();
        for iteration in 1..=max_loops {
            let inst = self
                .planner
                .get_next_instruction(&mut self.router, &message_id, &mut self.history)
                .await?;

            let extra_context = self
                .planner
                .before_handle_context(&inst, &message, &self.history);

            if !self
                .planner
                .agent_executing(&self.router, &inst, &mut message, &self.history)
                .await
            {
                tracing::info!(
                    "[Conversation] {} declined to execute '{}'",
                    self.planner.name(),
                    inst.function
                );
                return Ok(TurnOutcome::Stopped {
                    reason: format!(
                        "{} declined to execute '{}'",
                        self.planner.name(),
                        inst.function
                    ),
                    iterations: iteration,
                });
            }
            self.history[message_index] = message.clone();

            let (outcome, produced) = self
                .delegate(executor, &inst, &message, &extra_context)
                .await?;

            message.stop_completion = outcome.stop_completion;
            self.history[message_index] = message.clone();

            let reply = if outcome.responded {
                produced.last().cloned()
            } else {
                None
            };

            if self.planner.hide_dialog_context() {
                let task_agent_dialogs: Vec<DialogTurn> =
                    iter::once(message.clone()).chain(produced).collect();
                self.planner
                    .after_handle_context(&mut self.history, &task_agent_dialogs);
            } else {
                self.history.extend(produced);
            }

            if !self
                .planner
                .agent_executed(
                    &self.router,
                    &inst,
                    &message,
                    &self.history,
                    &mut self.routing,
                )
                .await
            {
                let reason = self
                    .routing
                    .cleared_reason()
                    .unwrap_or("planner ended the turn")
                    .to_string();
                return Ok(TurnOutcome::Stopped {
                    reason,
                    iterations: iteration,
                });
            }

            if outcome.responded {
                let reply = reply.ok_or_else(|| {
                    AppError::internal("executor reported a reply without producing a turn")
                })?;
                return Ok(TurnOutcome::Responded {
                    reply,
                    iterations: iteration,
                });
            }
        }

        tracing::warn!(
            "[Conversation] Session {} reached the loop limit of {} for message {}",
            self.id,
            max_loops,
            message_id
        );
        Ok(TurnOutcome::LoopLimitReached {
            iterations: max_loops,
        })
    }

    /// Push the target agent and execute, following redirects. Returns the
    /// final outcome plus every turn produced along the way.
    ///
    /// Task agents get the planner-built context when the planner hides the
    /// dialog history or tagged the instruction as planner-handled.
    async fn delegate(
        &mut self,
        executor: &dyn AgentExecutor,
        inst: &FunctionCallFromLlm,
        message: &DialogTurn,
        extra_context: &[DialogTurn],
    ) -> AppResult<(ExecutionOutcome, Vec<DialogTurn>)> {
        let planner_context = inst.handle_dialogs_by_planner || self.planner.hide_dialog_context();
        let mut target = executor.resolve_target(&self.router, inst)?;
        let mut produced: Vec<DialogTurn> = Vec::new();
        let mut frames = 0usize;

        let result = loop {
            let depth = self.routing.increment_recursive_counter();
            if depth > self.max_recursion_depth {
                tracing::warn!(
                    "[Conversation] Recursion limit hit delegating to {} (depth {})",
                    target,
                    depth
                );
                break Err(AppError::RecursionLimit {
                    agent_id: target,
                    depth,
                });
            }
            if let Err(e) = self.routing.push(target.clone()) {
                break Err(e.into());
            }
            frames += 1;
            tracing::info!(
                "[Conversation] Delegating '{}' to {} (depth {})",
                inst.function,
                target,
                depth
            );

            let context: Vec<DialogTurn> = if planner_context {
                iter::once(message)
                    .chain(extra_context)
                    .chain(produced.iter())
                    .cloned()
                    .collect()
            } else {
                self.history.iter().chain(produced.iter()).cloned().collect()
            };

            let outcome = match executor.execute(&target, inst, message, &context).await {
                Ok(outcome) => outcome,
                Err(e) => break Err(e),
            };
            produced.extend(outcome.dialogs.iter().cloned());

            target = match outcome.redirect_to.clone() {
                Some(next) if !outcome.stop_completion && !outcome.responded => next,
                _ => break Ok((outcome, produced)),
            };
        };

        // A redirect replaces the agent handling the instruction, so only the
        // first delegated frame is left for `agent_executed` to pop. A failed
        // delegation unwinds every frame it pushed.
        let keep = usize::from(result.is_ok());
        for _ in keep..frames {
            self.routing.pop();
        }
        if result.is_err() {
            self.routing.reset_recursive_counter();
        }
        result
    }
}
