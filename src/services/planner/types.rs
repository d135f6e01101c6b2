//! Planner Core Types
//!
//! Structured records the planner exchanges with the model: the step status
//! produced by task decomposition and the next instruction handed to the
//! executing caller.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Decomposition
// ============================================================================

/// Remaining-work estimate returned by the decomposition prompt.
///
/// `total_remaining_steps` is required in model output; the other fields may
/// be missing or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecomposedStep {
    pub total_remaining_steps: u32,
    #[serde(default)]
    pub should_stop: bool,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl DecomposedStep {
    /// Remaining steps after applying the stop flag: a stop signal always
    /// wins over a positive count.
    pub fn effective_remaining(&self) -> u32 {
        if self.should_stop {
            0
        } else {
            self.total_remaining_steps
        }
    }

    /// True when no more steps remain or the model asked to stop.
    pub fn is_complete(&self) -> bool {
        self.effective_remaining() == 0
    }

    /// Stop reason exactly as the model wrote it, ignoring blank strings.
    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// Whether the decomposition call produced a real answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecompositionStatus {
    /// The model answered with a well-formed step record.
    Decomposed,
    /// Every attempt failed; the step is a default placeholder.
    Unavailable { attempts: u32, last_error: String },
}

/// Outcome of the decomposition analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionResult {
    pub step: DecomposedStep,
    pub status: DecompositionStatus,
}

impl DecompositionResult {
    pub fn decomposed(step: DecomposedStep) -> Self {
        Self {
            step,
            status: DecompositionStatus::Decomposed,
        }
    }

    pub fn unavailable(attempts: u32, last_error: impl Into<String>) -> Self {
        Self {
            step: DecomposedStep::default(),
            status: DecompositionStatus::Unavailable {
                attempts,
                last_error: last_error.into(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, DecompositionStatus::Decomposed)
    }

    /// Remaining steps the selector should act on. An unavailable
    /// decomposition counts as "nothing left to replay".
    pub fn effective_remaining(&self) -> u32 {
        match self.status {
            DecompositionStatus::Decomposed => self.step.effective_remaining(),
            DecompositionStatus::Unavailable { .. } => 0,
        }
    }
}

// ============================================================================
// Instruction
// ============================================================================

/// The next action chosen by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallFromLlm {
    pub function: String,
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
    #[serde(default)]
    pub next_action_reason: Option<String>,
    #[serde(default)]
    pub handle_dialogs_by_planner: bool,
}

impl FunctionCallFromLlm {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            arguments: None,
            next_action_reason: None,
            handle_dialogs_by_planner: false,
        }
    }

    /// Attach one argument, creating the argument map if needed.
    pub fn with_argument(mut self, key: impl Into<String>, value: Value) -> Self {
        self.arguments
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.next_action_reason = Some(reason.into());
        self
    }

    /// Arguments serialized as a JSON object, `{}` when absent.
    pub fn arguments_json(&self) -> String {
        match &self.arguments {
            Some(args) => Value::Object(args.clone()).to_string(),
            None => "{}".to_string(),
        }
    }
}
