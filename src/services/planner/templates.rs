//! Named prompt templates consumed by the sequential planner.

use std::collections::HashMap;

use agent_relay_core::Agent;
use agent_relay_llm::TemplateRender;

use crate::utils::error::{AppError, AppResult};

/// Next-step prompt sent to the router's model.
pub const NEXT_STEP_TEMPLATE: &str = "reasoner.sequential";

/// System prompt for the remaining-steps decomposition call.
pub const REMAINING_TASK_TEMPLATE: &str = "reasoner.sequential.get_remaining_task";

/// Render a template stored on `agent`, with no variables bound.
///
/// A missing template is a misconfigured agent and fails hard.
pub fn render_agent_template(
    renderer: &dyn TemplateRender,
    agent: &Agent,
    name: &str,
) -> AppResult<String> {
    let template = agent
        .template(name)
        .ok_or_else(|| AppError::template_not_found(&agent.id, name))?;
    Ok(renderer.render(&template.content, &HashMap::new())?)
}
