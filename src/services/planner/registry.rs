//! Planner Registry
//!
//! Maps a planner key (as configured in `RelaySettings::planner`) to a
//! factory. Planners are created once per conversation so their cached
//! state never leaks across sessions.

use std::collections::HashMap;
use std::sync::Arc;

use agent_relay_llm::{CompletionGateway, TemplateRender, TimeoutGateway};

use crate::models::settings::RelaySettings;
use crate::utils::error::{AppError, AppResult};

use super::planner::TaskPlanner;
use super::sequential::SequentialPlanner;

/// Shared collaborators handed to every planner factory.
#[derive(Clone)]
pub struct PlannerDeps {
    pub gateway: Arc<dyn CompletionGateway>,
    pub renderer: Arc<dyn TemplateRender>,
    pub settings: RelaySettings,
}

impl PlannerDeps {
    /// Bundle collaborators, bounding every gateway call by
    /// `settings.completion_timeout_secs`.
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        renderer: Arc<dyn TemplateRender>,
        settings: RelaySettings,
    ) -> Self {
        let gateway: Arc<dyn CompletionGateway> =
            Arc::new(TimeoutGateway::new(gateway, settings.completion_timeout()));
        Self {
            gateway,
            renderer,
            settings,
        }
    }
}

pub type PlannerFactory = Arc<dyn Fn(&PlannerDeps) -> Box<dyn TaskPlanner> + Send + Sync>;

/// Registry that stores planner factories keyed by name.
#[derive(Default)]
pub struct PlannerRegistry {
    factories: HashMap<String, PlannerFactory>,
}

impl PlannerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in planners pre-registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            "sequential",
            Arc::new(|deps: &PlannerDeps| {
                Box::new(SequentialPlanner::from_settings(
                    deps.gateway.clone(),
                    deps.renderer.clone(),
                    &deps.settings,
                )) as Box<dyn TaskPlanner>
            }),
        );
        registry
    }

    /// Register a factory, replacing any previous one with the same key.
    pub fn register(&mut self, key: impl Into<String>, factory: PlannerFactory) {
        self.factories.insert(key.into(), factory);
    }

    /// Build a fresh planner for one conversation.
    pub fn create(&self, key: &str, deps: &PlannerDeps) -> AppResult<Box<dyn TaskPlanner>> {
        let factory = self
            .factories
            .get(key)
            .ok_or_else(|| AppError::not_found(format!("planner '{}'", key)))?;
        Ok(factory(deps))
    }

    /// Registered planner keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.factories.keys().cloned().collect();
        keys.sort();
        keys
    }
}
