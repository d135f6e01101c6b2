//! Agent Definitions
//!
//! An `Agent` is a callable task handler: identity, instruction text, a set of
//! named prompt templates and its preferred LLM provider/model. Agents are
//! loaded once per conversation and treated as read-only, except for
//! `template_dict`, the variable bag templates are rendered with (the planner
//! appends to its running `conversation` transcript).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of the running transcript inside `Agent::template_dict`.
pub const CONVERSATION_KEY: &str = "conversation";

/// A named prompt template owned by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTemplate {
    pub name: String,
    pub content: String,
}

impl AgentTemplate {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Provider/model preference of an agent. Either part may be left to the
/// gateway's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl AgentLlmConfig {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            model: Some(model.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub templates: Vec<AgentTemplate>,
    #[serde(default)]
    pub template_dict: HashMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_config: Option<AgentLlmConfig>,
}

impl Agent {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Look up a named template.
    pub fn template(&self, name: &str) -> Option<&AgentTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn provider(&self) -> Option<&str> {
        self.llm_config.as_ref().and_then(|c| c.provider.as_deref())
    }

    pub fn model(&self) -> Option<&str> {
        self.llm_config.as_ref().and_then(|c| c.model.as_deref())
    }

    /// Current running transcript (empty when never set).
    pub fn conversation(&self) -> String {
        match self.template_dict.get(CONVERSATION_KEY) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Append a `"{name}: {line}"` entry to the running transcript.
    pub fn append_to_conversation(&mut self, line: &str) {
        let transcript = format!(
            "{}\r\n{}: {}",
            self.conversation().trim_end(),
            self.name,
            line
        );
        self.template_dict
            .insert(CONVERSATION_KEY.to_string(), Value::String(transcript));
    }
}
