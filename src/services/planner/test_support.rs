//! Shared fixtures for planner and conversation unit tests.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use agent_relay_core::{Agent, AgentBuilder, DialogTurn};
use agent_relay_llm::{CompletionGateway, CompletionOptions, LlmError, LlmResult};

use super::templates::{NEXT_STEP_TEMPLATE, REMAINING_TASK_TEMPLATE};

/// One recorded gateway invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub agent: Agent,
    pub dialogs: Vec<DialogTurn>,
    pub options: CompletionOptions,
}

/// Gateway that replays a queue of canned replies and records every call.
pub struct ScriptedGateway {
    responses: Mutex<Vec<LlmResult<DialogTurn>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<LlmResult<DialogTurn>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn get_chat_completions(
        &self,
        agent: &Agent,
        dialogs: &[DialogTurn],
        options: &CompletionOptions,
    ) -> LlmResult<DialogTurn> {
        self.calls.lock().unwrap().push(RecordedCall {
            agent: agent.clone(),
            dialogs: dialogs.to_vec(),
            options: options.clone(),
        });
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::Other {
                message: "No more mock responses available".to_string(),
            });
        }
        responses.remove(0)
    }
}

pub fn reply(text: &str) -> LlmResult<DialogTurn> {
    Ok(DialogTurn::assistant(text))
}

/// Router agent carrying both sequential planner templates.
pub fn router_agent() -> Agent {
    AgentBuilder::new()
        .id("router-1")
        .name("Router")
        .instruction("Route the user's request.")
        .template(REMAINING_TASK_TEMPLATE, "How many steps remain?")
        .template(NEXT_STEP_TEMPLATE, "What should we do next?")
        .conversation("User: book a trip")
        .llm("googleai", "gemini-pro")
        .build()
        .unwrap()
}

struct ErrorCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `fut` on the current thread and count the error-level events it emits.
pub async fn count_errors<F: Future>(fut: F) -> (usize, F::Output) {
    let counter = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(counter.clone()));
    let _guard = tracing::subscriber::set_default(subscriber);
    let output = fut.await;
    (counter.load(Ordering::SeqCst), output)
}
