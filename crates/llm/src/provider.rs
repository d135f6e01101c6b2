//! Completion Gateway Trait
//!
//! Defines the common interface every LLM transport implements, plus the
//! registry that dispatches a call to the gateway registered for the
//! effective provider.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use agent_relay_core::{Agent, DialogTurn};

use super::types::{CompletionOptions, LlmError, LlmResult};

/// Trait that all completion gateways must implement.
///
/// A gateway receives the calling agent (whose `instruction` is the system
/// prompt) and the dialog history, and returns one dialog turn holding the
/// raw model text. Callers are responsible for structured parsing.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Returns the provider name this gateway serves.
    fn name(&self) -> &str;

    /// Model used when neither the options nor the agent name one.
    fn default_model(&self) -> Option<&str> {
        None
    }

    /// Request one chat completion.
    async fn get_chat_completions(
        &self,
        agent: &Agent,
        dialogs: &[DialogTurn],
        options: &CompletionOptions,
    ) -> LlmResult<DialogTurn>;
}

/// Registry mapping provider names to gateways, resolved per call.
///
/// The registry is itself a `CompletionGateway`: it picks the gateway for
/// the effective provider (options, then agent, then the registry default)
/// and forwards the call unchanged.
#[derive(Default)]
pub struct GatewayRegistry {
    gateways: HashMap<String, Arc<dyn CompletionGateway>>,
    default_provider: Option<String>,
}

impl GatewayRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gateway under its own provider name.
    pub fn register(&mut self, gateway: Arc<dyn CompletionGateway>) {
        if self.default_provider.is_none() {
            self.default_provider = Some(gateway.name().to_string());
        }
        self.gateways.insert(gateway.name().to_string(), gateway);
    }

    /// Set the provider used when neither options nor agent name one.
    pub fn with_default_provider(mut self, provider: impl Into<String>) -> Self {
        self.default_provider = Some(provider.into());
        self
    }

    /// Get a gateway by provider name.
    pub fn get(&self, provider: &str) -> Option<Arc<dyn CompletionGateway>> {
        self.gateways.get(provider).cloned()
    }

    /// Registered provider names, sorted.
    pub fn providers(&self) -> Vec<String> {
        let mut names: Vec<_> = self.gateways.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve the gateway for a call.
    pub fn resolve(
        &self,
        agent: &Agent,
        options: &CompletionOptions,
    ) -> LlmResult<Arc<dyn CompletionGateway>> {
        let provider = options
            .resolve_provider(agent)
            .or(self.default_provider.as_deref())
            .ok_or_else(|| LlmError::ProviderUnavailable {
                message: format!("no provider configured for agent '{}'", agent.id),
            })?;

        self.get(provider).ok_or_else(|| LlmError::ProviderUnavailable {
            message: format!("no gateway registered for provider '{}'", provider),
        })
    }
}

#[async_trait]
impl CompletionGateway for GatewayRegistry {
    fn name(&self) -> &str {
        "registry"
    }

    async fn get_chat_completions(
        &self,
        agent: &Agent,
        dialogs: &[DialogTurn],
        options: &CompletionOptions,
    ) -> LlmResult<DialogTurn> {
        let gateway = self.resolve(agent, options)?;
        tracing::debug!(
            "[GatewayRegistry] agent '{}' -> provider '{}' (model {:?})",
            agent.id,
            gateway.name(),
            options.resolve_model(agent).or(gateway.default_model())
        );
        gateway.get_chat_completions(agent, dialogs, options).await
    }
}

#[async_trait]
impl<T: CompletionGateway + ?Sized> CompletionGateway for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn default_model(&self) -> Option<&str> {
        (**self).default_model()
    }

    async fn get_chat_completions(
        &self,
        agent: &Agent,
        dialogs: &[DialogTurn],
        options: &CompletionOptions,
    ) -> LlmResult<DialogTurn> {
        (**self).get_chat_completions(agent, dialogs, options).await
    }
}
