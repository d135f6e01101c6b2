//! Settings Models
//!
//! Relay configuration stored in config.json.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound accepted for `max_loop_count`
pub const MAX_LOOP_COUNT_LIMIT: u32 = 1000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Relay configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Planner registered in the `PlannerRegistry` to drive conversations
    #[serde(default = "default_planner")]
    pub planner: String,
    /// Provider used for the task decomposition call
    #[serde(default = "default_decomposition_provider")]
    pub decomposition_provider: String,
    /// Model used for the task decomposition call
    #[serde(default = "default_decomposition_model")]
    pub decomposition_model: String,
    /// Planner iterations allowed within one user turn
    #[serde(default = "default_max_loop_count")]
    pub max_loop_count: u32,
    /// Delegations allowed before control must return to a caller
    #[serde(default = "default_max_recursion_depth")]
    pub max_recursion_depth: u32,
    /// Deadline for a single completion call, in seconds
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,
    /// Tracing filter level: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_planner() -> String {
    "sequential".to_string()
}

fn default_decomposition_provider() -> String {
    "openai".to_string()
}

fn default_decomposition_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_loop_count() -> u32 {
    100
}

fn default_max_recursion_depth() -> u32 {
    5
}

fn default_completion_timeout_secs() -> u64 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            planner: default_planner(),
            decomposition_provider: default_decomposition_provider(),
            decomposition_model: default_decomposition_model(),
            max_loop_count: default_max_loop_count(),
            max_recursion_depth: default_max_recursion_depth(),
            completion_timeout_secs: default_completion_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub planner: Option<String>,
    pub decomposition_provider: Option<String>,
    pub decomposition_model: Option<String>,
    pub max_loop_count: Option<u32>,
    pub max_recursion_depth: Option<u32>,
    pub completion_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl RelaySettings {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(planner) = update.planner {
            self.planner = planner;
        }
        if let Some(provider) = update.decomposition_provider {
            self.decomposition_provider = provider;
        }
        if let Some(model) = update.decomposition_model {
            self.decomposition_model = model;
        }
        if let Some(count) = update.max_loop_count {
            self.max_loop_count = count;
        }
        if let Some(depth) = update.max_recursion_depth {
            self.max_recursion_depth = depth;
        }
        if let Some(secs) = update.completion_timeout_secs {
            self.completion_timeout_secs = secs;
        }
        if let Some(level) = update.log_level {
            self.log_level = level;
        }
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.planner.trim().is_empty() {
            return Err("planner cannot be empty".to_string());
        }
        if self.decomposition_provider.trim().is_empty() {
            return Err("decomposition_provider cannot be empty".to_string());
        }
        if self.decomposition_model.trim().is_empty() {
            return Err("decomposition_model cannot be empty".to_string());
        }

        if self.max_loop_count == 0 {
            return Err("max_loop_count must be at least 1".to_string());
        }
        if self.max_loop_count > MAX_LOOP_COUNT_LIMIT {
            return Err(format!(
                "max_loop_count cannot exceed {}",
                MAX_LOOP_COUNT_LIMIT
            ));
        }

        if self.max_recursion_depth == 0 {
            return Err("max_recursion_depth must be at least 1".to_string());
        }

        if self.completion_timeout_secs == 0 {
            return Err("completion_timeout_secs must be at least 1 second".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level: {}. Must be one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }
}
