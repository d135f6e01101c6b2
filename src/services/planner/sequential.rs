//! Sequential Planner
//!
//! Walks a multi-step task in order. Each turn it asks the model how many
//! steps remain; while steps remain it replays the last instruction, and
//! once the task is done it asks the router's model for a fresh one.

use std::sync::Arc;

use async_trait::async_trait;

use agent_relay_core::{Agent, DialogTurn, RoutingContext};
use agent_relay_llm::{CompletionGateway, CompletionOptions, TemplateRender};

use crate::models::settings::RelaySettings;
use crate::utils::error::AppResult;

use super::decomposer::{decompose, PLANNER_AGENT_NAME};
use super::instruction::next_instruction;
use super::planner::TaskPlanner;
use super::types::{DecompositionResult, FunctionCallFromLlm};

pub struct SequentialPlanner {
    gateway: Arc<dyn CompletionGateway>,
    renderer: Arc<dyn TemplateRender>,
    decomposition_options: CompletionOptions,
    max_loop_count: u32,
    last_instruction: Option<FunctionCallFromLlm>,
}

impl SequentialPlanner {
    pub const NAME: &'static str = "Sequential-Planner";

    /// Planner with the default decomposition model and loop budget.
    pub fn new(gateway: Arc<dyn CompletionGateway>, renderer: Arc<dyn TemplateRender>) -> Self {
        Self::from_settings(gateway, renderer, &RelaySettings::default())
    }

    pub fn from_settings(
        gateway: Arc<dyn CompletionGateway>,
        renderer: Arc<dyn TemplateRender>,
        settings: &RelaySettings,
    ) -> Self {
        Self {
            gateway,
            renderer,
            decomposition_options: CompletionOptions::with_provider(
                settings.decomposition_provider.clone(),
                settings.decomposition_model.clone(),
            ),
            max_loop_count: settings.max_loop_count,
            last_instruction: None,
        }
    }

    /// Instruction that will be replayed while steps remain.
    pub fn last_instruction(&self) -> Option<&FunctionCallFromLlm> {
        self.last_instruction.as_ref()
    }

    pub async fn get_decomposed_step(
        &self,
        router: &Agent,
        message_id: &str,
        dialogs: &[DialogTurn],
    ) -> AppResult<DecompositionResult> {
        decompose(
            self.gateway.as_ref(),
            self.renderer.as_ref(),
            &self.decomposition_options,
            router,
            message_id,
            dialogs,
        )
        .await
    }
}

#[async_trait]
impl TaskPlanner for SequentialPlanner {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn hide_dialog_context(&self) -> bool {
        true
    }

    fn max_loop_count(&self) -> u32 {
        self.max_loop_count
    }

    async fn get_next_instruction(
        &mut self,
        router: &mut Agent,
        message_id: &str,
        dialogs: &mut Vec<DialogTurn>,
    ) -> AppResult<FunctionCallFromLlm> {
        let decomposition = self.get_decomposed_step(router, message_id, dialogs).await?;

        let inst = next_instruction(
            self.gateway.as_ref(),
            self.renderer.as_ref(),
            router,
            message_id,
            dialogs,
            &decomposition,
            self.last_instruction.as_ref(),
        )
        .await?;

        self.last_instruction = Some(inst.clone());
        Ok(inst)
    }

    fn before_handle_context(
        &self,
        _inst: &FunctionCallFromLlm,
        _message: &DialogTurn,
        _dialogs: &[DialogTurn],
    ) -> Vec<DialogTurn> {
        Vec::new()
    }

    fn after_handle_context(
        &self,
        dialogs: &mut Vec<DialogTurn>,
        task_agent_dialogs: &[DialogTurn],
    ) -> bool {
        dialogs.extend(task_agent_dialogs.iter().skip(1).cloned());
        true
    }

    async fn agent_executing(
        &self,
        _router: &Agent,
        inst: &FunctionCallFromLlm,
        message: &mut DialogTurn,
        _dialogs: &[DialogTurn],
    ) -> bool {
        message.function_name = Some(inst.function.clone());
        message.function_args = Some(inst.arguments_json());
        true
    }

    async fn agent_executed(
        &self,
        router: &Agent,
        _inst: &FunctionCallFromLlm,
        message: &DialogTurn,
        _dialogs: &[DialogTurn],
        routing: &mut RoutingContext,
    ) -> bool {
        if message.stop_completion {
            routing.empty(format!("Agent queue is cleared by {}", PLANNER_AGENT_NAME));
            tracing::info!(
                "[SequentialPlanner] Stop requested by {}, routing cleared for router {}",
                message.function_name.as_deref().unwrap_or("agent"),
                router.id
            );
            return false;
        }

        let popped = routing.pop();
        routing.reset_recursive_counter();
        tracing::debug!(
            "[SequentialPlanner] Popped {:?}, current agent {:?}",
            popped,
            routing.current_agent_id()
        );
        true
    }
}
