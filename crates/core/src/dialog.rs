//! Dialog Turns
//!
//! One exchange unit in a conversation: role, content and the routing
//! metadata the planner stamps onto it. A conversation history is an ordered,
//! append-only `Vec<DialogTurn>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Who produced a dialog turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    System,
    User,
    Assistant,
    Function,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::System => write!(f, "system"),
            AgentRole::User => write!(f, "user"),
            AgentRole::Assistant => write!(f, "assistant"),
            AgentRole::Function => write!(f, "function"),
        }
    }
}

impl std::str::FromStr for AgentRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(AgentRole::System),
            "user" => Ok(AgentRole::User),
            "assistant" => Ok(AgentRole::Assistant),
            "function" | "tool" => Ok(AgentRole::Function),
            other => Err(CoreError::validation(format!("unknown dialog role '{}'", other))),
        }
    }
}

/// A single message in the dialog history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogTurn {
    pub role: AgentRole,
    pub content: String,
    /// Agent that owned the conversation when this turn was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_agent_id: Option<String>,
    /// Identifier of the user message this turn belongs to
    pub message_id: String,
    /// Function the planner selected for this turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    /// Serialized JSON arguments for `function_name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_args: Option<String>,
    /// Set by an executed function to end the turn loop without further handoff
    #[serde(default)]
    pub stop_completion: bool,
    pub created_at: DateTime<Utc>,
}

impl DialogTurn {
    pub fn new(role: AgentRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            current_agent_id: None,
            message_id: Uuid::new_v4().to_string(),
            function_name: None,
            function_args: None,
            stop_completion: false,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(AgentRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(AgentRole::Assistant, content)
    }

    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        let mut turn = Self::new(AgentRole::Function, content);
        turn.function_name = Some(name.into());
        turn
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.current_agent_id = Some(agent_id.into());
        self
    }

    pub fn with_function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }
}

/// Parse few-shot chat samples written as `role: content` lines.
///
/// Blank lines and `##` comment lines are skipped, as are lines whose role
/// is not recognized.
pub fn parse_chat_samples<S: AsRef<str>>(lines: &[S]) -> Vec<DialogTurn> {
    lines
        .iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with("##") {
                return None;
            }
            let (role, content) = line.split_once(':')?;
            let role = role.parse::<AgentRole>().ok()?;
            Some(DialogTurn::new(role, content.trim()))
        })
        .collect()
}
