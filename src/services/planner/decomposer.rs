//! Decomposition Analyzer
//!
//! Asks the model how many steps of the current task remain and whether the
//! planner should stop. Transport and parse failures are retried; once the
//! attempt budget is spent the analyzer degrades to a tagged default instead
//! of failing the turn.

use agent_relay_core::{Agent, DialogTurn};
use agent_relay_llm::{CompletionGateway, CompletionOptions, TemplateRender};

use crate::utils::error::AppResult;

use super::parser::parse_decomposed_step;
use super::templates::{render_agent_template, REMAINING_TASK_TEMPLATE};
use super::types::DecompositionResult;

/// Attempts made before the analyzer gives up.
pub const MAX_DECOMPOSITION_ATTEMPTS: u32 = 2;

/// Name of the synthetic agent that carries the decomposition prompt.
pub const PLANNER_AGENT_NAME: &str = "SequentialPlanner";

/// Estimate the remaining steps for `router`'s task from the dialog history.
///
/// The only error returned is a missing decomposition template; gateway and
/// parse failures end in `DecompositionStatus::Unavailable`.
pub async fn decompose(
    gateway: &dyn CompletionGateway,
    renderer: &dyn TemplateRender,
    options: &CompletionOptions,
    router: &Agent,
    message_id: &str,
    dialogs: &[DialogTurn],
) -> AppResult<DecompositionResult> {
    let system_prompt = render_agent_template(renderer, router, REMAINING_TASK_TEMPLATE)?;

    let mut planner_agent = Agent::new(router.id.clone(), PLANNER_AGENT_NAME);
    planner_agent.instruction = system_prompt;

    let mut last_error = String::new();
    for attempt in 1..=MAX_DECOMPOSITION_ATTEMPTS {
        let text = match gateway
            .get_chat_completions(&planner_agent, dialogs, options)
            .await
        {
            Ok(response) => response.content,
            Err(e) => {
                tracing::error!(
                    "[SequentialPlanner] Decomposition attempt {}/{} for message {} failed: {}",
                    attempt,
                    MAX_DECOMPOSITION_ATTEMPTS,
                    message_id,
                    e
                );
                last_error = e.to_string();
                continue;
            }
        };

        match parse_decomposed_step(&text) {
            Ok(step) => {
                tracing::debug!(
                    "[SequentialPlanner] {} steps remaining (stop: {}) for message {}",
                    step.total_remaining_steps,
                    step.should_stop,
                    message_id
                );
                return Ok(DecompositionResult::decomposed(step));
            }
            Err(e) => {
                tracing::error!(
                    "[SequentialPlanner] Decomposition attempt {}/{} for message {} failed: {}: {}",
                    attempt,
                    MAX_DECOMPOSITION_ATTEMPTS,
                    message_id,
                    e,
                    text
                );
                last_error = e.to_string();
            }
        }
    }

    tracing::warn!(
        "[SequentialPlanner] Decomposition unavailable for message {} after {} attempts",
        message_id,
        MAX_DECOMPOSITION_ATTEMPTS
    );
    Ok(DecompositionResult::unavailable(
        MAX_DECOMPOSITION_ATTEMPTS,
        last_error,
    ))
}
