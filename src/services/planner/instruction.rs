//! Next-Instruction Selector
//!
//! Turns a decomposition result into the next instruction:
//!
//! 1. Steps remain and an instruction is cached: replay the cache
//! 2. The task is complete with a stop reason: tell the router it is done
//! 3. Otherwise: ask the router's model for a fresh instruction
//!
//! Failures here are not retried.

use agent_relay_core::{Agent, DialogTurn};
use agent_relay_llm::{CompletionGateway, CompletionOptions, TemplateRender};

use crate::utils::error::AppResult;

use super::decomposer::PLANNER_AGENT_NAME;
use super::parser::parse_instruction;
use super::templates::{render_agent_template, NEXT_STEP_TEMPLATE};
use super::types::{DecompositionResult, FunctionCallFromLlm};

/// Choose the next instruction for `router`.
///
/// May append a stop-reason turn to `dialogs` and to the router's running
/// transcript. The caller owns the instruction cache and should store the
/// returned value.
pub async fn next_instruction(
    gateway: &dyn CompletionGateway,
    renderer: &dyn TemplateRender,
    router: &mut Agent,
    message_id: &str,
    dialogs: &mut Vec<DialogTurn>,
    decomposition: &DecompositionResult,
    last_instruction: Option<&FunctionCallFromLlm>,
) -> AppResult<FunctionCallFromLlm> {
    let remaining = decomposition.effective_remaining();

    if remaining > 0 {
        if let Some(cached) = last_instruction {
            tracing::debug!(
                "[SequentialPlanner] Replaying '{}' with {} steps left",
                cached.function,
                remaining
            );
            let mut inst = cached.clone();
            inst.next_action_reason = Some(format!("Having {} steps left.", remaining));
            return Ok(inst);
        }
    } else {
        if !decomposition.is_available() {
            tracing::warn!(
                "[SequentialPlanner] Decomposition unavailable, requesting a fresh instruction"
            );
        }
        if let Some(reason) = decomposition.step.stop_reason() {
            tracing::info!("[SequentialPlanner] Task complete: {}", reason);
            dialogs.push(
                DialogTurn::assistant(reason)
                    .with_agent(router.id.clone())
                    .with_message_id(message_id),
            );
            router.append_to_conversation(reason);
        }
    }

    let prompt = render_agent_template(renderer, router, NEXT_STEP_TEMPLATE)?;
    let request = vec![DialogTurn::user(prompt)
        .with_message_id(message_id)
        .with_function_name(PLANNER_AGENT_NAME)];

    let options = CompletionOptions::for_agent(router);
    let response = gateway
        .get_chat_completions(router, &request, &options)
        .await?;

    let mut inst = parse_instruction(&response.content).map_err(|e| {
        tracing::error!(
            "[SequentialPlanner] Unusable instruction for message {}: {}: {}",
            message_id,
            e,
            response.content
        );
        e
    })?;

    if remaining > 0 {
        inst.next_action_reason = Some(format!("{} steps left.", remaining));
        inst.handle_dialogs_by_planner = true;
    }

    tracing::debug!(
        "[SequentialPlanner] Next instruction: {} {}",
        inst.function,
        inst.arguments_json()
    );
    Ok(inst)
}
