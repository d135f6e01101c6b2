//! Conversation Turn Loop Integration Tests

use std::sync::Arc;

use agent_relay::{
    AppError, ConversationSession, ExecutionOutcome, PlannerDeps, PlannerRegistry, RelaySettings,
    TurnOutcome,
};
use agent_relay_core::{AgentRole, DialogTurn};
use agent_relay_llm::{CompletionGateway, PlaceholderRenderer};

use crate::support::{reply, router, ScriptedExecutor, ScriptedGateway, StallingGateway};

fn session_with(
    gateway: Arc<dyn CompletionGateway>,
    settings: RelaySettings,
) -> ConversationSession {
    let deps = PlannerDeps::new(gateway, Arc::new(PlaceholderRenderer::new()), settings);
    ConversationSession::from_registry(router(), &PlannerRegistry::with_builtins(), &deps).unwrap()
}

#[tokio::test]
async fn test_multi_step_task_runs_to_reply() {
    let gateway = Arc::new(ScriptedGateway::new(vec![
        // Iteration 1: fresh instruction
        reply(r#"{"totalRemainingSteps": 0}"#),
        reply(r#"{"function": "search_flights", "arguments": {"to": "Oslo"}}"#),
        // Iteration 2: replay while steps remain
        reply(r#"{"totalRemainingSteps": 2, "shouldStop": false}"#),
        // Iteration 3: task finished
        reply(r#"{"totalRemainingSteps": 0, "shouldStop": true, "stopReason": "All booked"}"#),
        reply(r#"{"function": "response_to_user"}"#),
    ]));
    let executor = ScriptedExecutor::new(vec![
        ExecutionOutcome::proceed(vec![DialogTurn::function("search_flights", "SK4411")]),
        ExecutionOutcome::proceed(vec![DialogTurn::function("search_flights", "booked SK4411")]),
        ExecutionOutcome::respond(DialogTurn::assistant("Your flight to Oslo is booked.")),
    ]);
    let mut session = session_with(gateway.clone(), RelaySettings::default());
    assert_eq!(session.planner_name(), "Sequential-Planner");

    let outcome = session.run_turn(&executor, "book me a flight to Oslo").await.unwrap();

    match outcome {
        TurnOutcome::Responded { reply, iterations } => {
            assert_eq!(reply.content, "Your flight to Oslo is booked.");
            assert_eq!(iterations, 3);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        executor.executed(),
        vec![
            "search_flights-agent",
            "search_flights-agent",
            "response_to_user-agent"
        ]
    );
    assert_eq!(gateway.call_count(), 5);

    let contents: Vec<&str> = session
        .history()
        .iter()
        .map(|turn| turn.content.as_str())
        .collect();
    assert_eq!(
        contents,
        vec![
            "book me a flight to Oslo",
            "SK4411",
            "booked SK4411",
            "All booked",
            "Your flight to Oslo is booked."
        ]
    );
    assert_eq!(session.history()[3].role, AgentRole::Assistant);
    assert_eq!(session.routing().depth(), 1);
    assert_eq!(session.routing().recursive_counter(), 0);
}

#[tokio::test]
async fn test_stop_signal_ends_conversation() {
    let gateway = Arc::new(ScriptedGateway::new(vec![
        reply(r#"{"totalRemainingSteps": 0}"#),
        reply(r#"{"function": "end_conversation"}"#),
    ]));
    let executor = ScriptedExecutor::new(vec![ExecutionOutcome::stop(vec![
        DialogTurn::assistant("Goodbye!"),
    ])]);
    let mut session = session_with(gateway, RelaySettings::default());

    let outcome = session.run_turn(&executor, "bye").await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Stopped { iterations: 1, .. }));
    assert!(session.routing().is_empty());
    assert_eq!(
        session.routing().cleared_reason(),
        Some("Agent queue is cleared by SequentialPlanner")
    );

    let err = session.run_turn(&executor, "wait").await.unwrap_err();
    assert!(matches!(err, AppError::Core(_)));
    // The refused message is not recorded
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_loop_budget_from_settings() {
    let gateway = Arc::new(ScriptedGateway::new(vec![
        reply(r#"{"totalRemainingSteps": 0}"#),
        reply(r#"{"function": "poll_status"}"#),
        reply(r#"{"totalRemainingSteps": 5}"#),
        reply(r#"{"totalRemainingSteps": 4}"#),
    ]));
    let executor = ScriptedExecutor::new(vec![
        ExecutionOutcome::proceed(vec![]),
        ExecutionOutcome::proceed(vec![]),
        ExecutionOutcome::proceed(vec![]),
    ]);
    let settings = RelaySettings {
        max_loop_count: 3,
        ..Default::default()
    };
    let mut session = session_with(gateway, settings);

    let outcome = session.run_turn(&executor, "wait for it").await.unwrap();

    assert_eq!(outcome, TurnOutcome::LoopLimitReached { iterations: 3 });
    assert_eq!(outcome.iterations(), 3);
    assert_eq!(executor.executed().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_decomposition_times_out_and_turn_continues() {
    let inner = Arc::new(ScriptedGateway::new(vec![reply(
        r#"{"function": "ask_user", "arguments": {"question": "Which dates?"}}"#,
    )]));
    let gateway = Arc::new(StallingGateway::new(2, inner.clone()));
    let executor = ScriptedExecutor::new(vec![ExecutionOutcome::respond(
        DialogTurn::assistant("Which dates work for you?"),
    )]);
    let settings = RelaySettings {
        completion_timeout_secs: 5,
        ..Default::default()
    };
    let mut session = session_with(gateway, settings);

    let outcome = session.run_turn(&executor, "book a hotel").await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Responded { iterations: 1, .. }));
    assert_eq!(executor.executed(), vec!["ask_user-agent"]);
    // Both decomposition attempts timed out before reaching the scripted replies
    assert_eq!(inner.call_count(), 1);
    assert_eq!(session.history()[0].function_name.as_deref(), Some("ask_user"));
    assert_eq!(
        session.history()[0].function_args.as_deref(),
        Some(r#"{"question":"Which dates?"}"#)
    );
}

#[tokio::test]
async fn test_missing_template_aborts_turn() {
    let gateway = Arc::new(ScriptedGateway::new(vec![]));
    let deps = PlannerDeps::new(
        gateway.clone(),
        Arc::new(PlaceholderRenderer::new()),
        RelaySettings::default(),
    );
    let bare_router = agent_relay_core::Agent::new("router", "Bare Router");
    let mut session =
        ConversationSession::from_registry(bare_router, &PlannerRegistry::with_builtins(), &deps)
            .unwrap();
    let executor = ScriptedExecutor::new(vec![]);

    let err = session.run_turn(&executor, "hi").await.unwrap_err();

    assert!(matches!(err, AppError::TemplateNotFound { .. }));
    assert_eq!(gateway.call_count(), 0);
    assert!(executor.executed().is_empty());
}

#[tokio::test]
async fn test_gateway_registry_dispatches_by_provider() {
    let openai = Arc::new(ScriptedGateway::new(vec![reply(
        r#"{"totalRemainingSteps": 0}"#,
    )]));
    let googleai = Arc::new(ScriptedGateway::new(vec![reply(
        r#"{"function": "greet"}"#,
    )]));
    let mut registry = agent_relay_llm::GatewayRegistry::new();
    registry.register(Arc::new(NamedGateway("openai", openai.clone())));
    registry.register(Arc::new(NamedGateway("googleai", googleai.clone())));

    let mut router = router();
    router.llm_config = Some(agent_relay_core::AgentLlmConfig::new("googleai", "gemini-pro"));
    let deps = PlannerDeps::new(
        Arc::new(registry),
        Arc::new(PlaceholderRenderer::new()),
        RelaySettings::default(),
    );
    let mut session =
        ConversationSession::from_registry(router, &PlannerRegistry::with_builtins(), &deps)
            .unwrap();
    let executor = ScriptedExecutor::new(vec![ExecutionOutcome::respond(
        DialogTurn::assistant("Hello!"),
    )]);

    session.run_turn(&executor, "hi").await.unwrap();

    // Decomposition is pinned to openai, the next step follows the router
    assert_eq!(openai.call_count(), 1);
    assert_eq!(googleai.call_count(), 1);
    assert_eq!(googleai.requests()[0].2.model.as_deref(), Some("gemini-pro"));
}

/// Exposes a scripted gateway under a provider name.
struct NamedGateway(&'static str, Arc<ScriptedGateway>);

#[async_trait::async_trait]
impl CompletionGateway for NamedGateway {
    fn name(&self) -> &str {
        self.0
    }

    async fn get_chat_completions(
        &self,
        agent: &agent_relay_core::Agent,
        dialogs: &[DialogTurn],
        options: &agent_relay_llm::CompletionOptions,
    ) -> agent_relay_llm::LlmResult<DialogTurn> {
        self.1.get_chat_completions(agent, dialogs, options).await
    }
}
