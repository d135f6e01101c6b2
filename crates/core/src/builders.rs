//! Builder Patterns
//!
//! Validated construction of agent definitions.
//!
//! Each builder follows the standard Rust builder pattern:
//! 1. Create with `::new()`
//! 2. Chain `.field(value)` calls
//! 3. Call `.build()` which validates and returns `CoreResult<T>`
//!
//! Validation happens at build time, so a misconfigured agent (missing id,
//! duplicate template names) is rejected when the conversation is set up
//! rather than halfway through a turn.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::agent::{Agent, AgentLlmConfig, AgentTemplate, CONVERSATION_KEY};
use crate::error::{CoreError, CoreResult};

// ============================================================================
// AgentBuilder
// ============================================================================

/// Builder for [`Agent`].
///
/// `id` and `name` are required.
///
/// # Example
/// ```ignore
/// let router = AgentBuilder::new()
///     .id("router-1")
///     .name("Router")
///     .template("reasoner.sequential", "What is the next step?")
///     .llm("openai", "gpt-4o")
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct AgentBuilder {
    id: Option<String>,
    name: Option<String>,
    instruction: Option<String>,
    templates: Vec<AgentTemplate>,
    template_dict: HashMap<String, Value>,
    llm_config: Option<AgentLlmConfig>,
}

impl AgentBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the agent id (required, non-empty).
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the display name (required, non-empty).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the instruction text.
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Add a named template (names must be unique).
    pub fn template(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.templates.push(AgentTemplate::new(name, content));
        self
    }

    /// Seed a template variable.
    pub fn variable(mut self, key: impl Into<String>, value: Value) -> Self {
        self.template_dict.insert(key.into(), value);
        self
    }

    /// Seed the running conversation transcript.
    pub fn conversation(self, transcript: impl Into<String>) -> Self {
        self.variable(CONVERSATION_KEY, Value::String(transcript.into()))
    }

    /// Set the preferred provider and model.
    pub fn llm(mut self, provider: impl Into<String>, model: impl Into<String>) -> Self {
        self.llm_config = Some(AgentLlmConfig::new(provider, model));
        self
    }

    /// Build and validate the agent.
    pub fn build(self) -> CoreResult<Agent> {
        let id = self
            .id
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| CoreError::validation("agent id is required"))?;
        let name = self
            .name
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| CoreError::validation("agent name is required"))?;

        let mut seen = HashSet::new();
        for template in &self.templates {
            if template.name.trim().is_empty() {
                return Err(CoreError::validation(format!(
                    "agent '{}' has a template without a name",
                    id
                )));
            }
            if !seen.insert(template.name.as_str()) {
                return Err(CoreError::validation(format!(
                    "agent '{}' defines template '{}' more than once",
                    id, template.name
                )));
            }
        }

        Ok(Agent {
            id,
            name,
            instruction: self.instruction.unwrap_or_default(),
            templates: self.templates,
            template_dict: self.template_dict,
            llm_config: self.llm_config,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
