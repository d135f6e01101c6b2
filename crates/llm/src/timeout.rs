//! Deadline wrapper for completion gateways.
//!
//! A gateway call that does not finish in time surfaces as
//! `LlmError::Timeout`, so callers treat it like any other transport failure.

use std::time::Duration;

use async_trait::async_trait;

use agent_relay_core::{Agent, DialogTurn};

use crate::provider::CompletionGateway;
use crate::types::{CompletionOptions, LlmError, LlmResult};

pub struct TimeoutGateway<G> {
    inner: G,
    timeout: Duration,
}

impl<G: CompletionGateway> TimeoutGateway<G> {
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: CompletionGateway> CompletionGateway for TimeoutGateway<G> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn default_model(&self) -> Option<&str> {
        self.inner.default_model()
    }

    async fn get_chat_completions(
        &self,
        agent: &Agent,
        dialogs: &[DialogTurn],
        options: &CompletionOptions,
    ) -> LlmResult<DialogTurn> {
        match tokio::time::timeout(
            self.timeout,
            self.inner.get_chat_completions(agent, dialogs, options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "[TimeoutGateway] {} call for agent '{}' exceeded {:?}",
                    self.inner.name(),
                    agent.id,
                    self.timeout
                );
                Err(LlmError::Timeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        }
    }
}
