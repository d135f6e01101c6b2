//! Shared test doubles for the integration suite.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use agent_relay::services::planner::{NEXT_STEP_TEMPLATE, REMAINING_TASK_TEMPLATE};
use agent_relay::{AgentExecutor, AppError, AppResult, ExecutionOutcome, FunctionCallFromLlm};
use agent_relay_core::{Agent, AgentBuilder, DialogTurn};
use agent_relay_llm::{CompletionGateway, CompletionOptions, LlmError, LlmResult};

/// Gateway that replays canned replies in order and counts calls.
pub struct ScriptedGateway {
    responses: Mutex<Vec<LlmResult<DialogTurn>>>,
    requests: Mutex<Vec<(String, Vec<DialogTurn>, CompletionOptions)>>,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<LlmResult<DialogTurn>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// (agent name, dialogs, options) for every call so far.
    pub fn requests(&self) -> Vec<(String, Vec<DialogTurn>, CompletionOptions)> {
        self.requests.lock().unwrap().clone()
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
        self.requests
            .lock()
            .unwrap()
            .push((agent.name.clone(), dialogs.to_vec(), options.clone()));
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::Other {
                message: "No more mock responses available".to_string(),
            });
        }
        responses.remove(0)
    }
}

/// Gateway whose first `stalls` calls hang for an hour before answering.
pub struct StallingGateway {
    stalls: usize,
    calls: AtomicUsize,
    inner: Arc<ScriptedGateway>,
}

impl StallingGateway {
    pub fn new(stalls: usize, inner: Arc<ScriptedGateway>) -> Self {
        Self {
            stalls,
            calls: AtomicUsize::new(0),
            inner,
        }
    }
}

#[async_trait]
impl CompletionGateway for StallingGateway {
    fn name(&self) -> &str {
        "stalling"
    }

    async fn get_chat_completions(
        &self,
        agent: &Agent,
        dialogs: &[DialogTurn],
        options: &CompletionOptions,
    ) -> LlmResult<DialogTurn> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.stalls {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.inner.get_chat_completions(agent, dialogs, options).await
    }
}

/// Executor that maps `function` to `{function}-agent` and replays outcomes.
pub struct ScriptedExecutor {
    outcomes: Mutex<Vec<ExecutionOutcome>>,
    executed: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new(outcomes: Vec<ExecutionOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentExecutor for ScriptedExecutor {
    fn resolve_target(&self, _router: &Agent, inst: &FunctionCallFromLlm) -> AppResult<String> {
        Ok(format!("{}-agent", inst.function))
    }

    async fn execute(
        &self,
        agent_id: &str,
        _inst: &FunctionCallFromLlm,
        _message: &DialogTurn,
        _context: &[DialogTurn],
    ) -> AppResult<ExecutionOutcome> {
        self.executed.lock().unwrap().push(agent_id.to_string());
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            return Err(AppError::internal("No more scripted outcomes"));
        }
        Ok(outcomes.remove(0))
    }
}

pub fn reply(text: &str) -> LlmResult<DialogTurn> {
    Ok(DialogTurn::assistant(text))
}

pub fn router() -> Agent {
    AgentBuilder::new()
        .id("router")
        .name("Travel Router")
        .instruction("Coordinate travel booking agents.")
        .template(
            REMAINING_TASK_TEMPLATE,
            "Count the remaining steps and reply as JSON.",
        )
        .template(NEXT_STEP_TEMPLATE, "Choose the next function and reply as JSON.")
        .conversation("User: plan my trip")
        .llm("openai", "gpt-4o-mini")
        .build()
        .unwrap()
}
