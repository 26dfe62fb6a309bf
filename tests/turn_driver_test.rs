//! Timer-driven turn progression tests
//!
//! Runs on a paused tokio clock so configured delays elapse instantly and
//! deterministically.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use sheetwright::application::{EventBus, TurnDriver};
use sheetwright::domain::models::{
    AssistMode, EventBusConfig, PhaseMeta, TimingConfig, TurnPhase,
};
use sheetwright::domain::ports::{AssistantBackend, Clock};
use sheetwright::domain::ErrorKind;
use sheetwright::infrastructure::backend::scripted::FINAL_TEXT;
use sheetwright::infrastructure::backend::ScriptedBackend;
use sheetwright::infrastructure::clock::{SequentialIdGenerator, SystemClock};
use sheetwright::services::{ConversationController, SessionEvent};

fn driver(mode: AssistMode) -> TurnDriver {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let backend: Arc<dyn AssistantBackend> = Arc::new(ScriptedBackend::new(Arc::clone(&clock)));
    let controller = ConversationController::new(
        Arc::clone(&backend),
        clock,
        Arc::new(SequentialIdGenerator::new()),
    )
    .with_mode(mode);
    TurnDriver::new(
        Arc::new(Mutex::new(controller)),
        backend,
        TimingConfig::default(),
        Arc::new(EventBus::new(EventBusConfig::default())),
    )
}

#[tokio::test(start_paused = true)]
async fn test_turn_advances_on_schedule() {
    let driver = driver(AssistMode::Analyst);
    let controller = driver.controller();
    let handle = driver.submit("Build P&L").await.unwrap();
    let turn = handle.turn_id.clone();

    tokio::time::sleep(Duration::from_millis(399)).await;
    assert_eq!(controller.lock().await.phase(&turn), Some(TurnPhase::Submitted));

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(controller.lock().await.phase(&turn), Some(TurnPhase::Thinking));

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(controller.lock().await.phase(&turn), Some(TurnPhase::Summarizing));

    handle.task.await.unwrap().unwrap();
    let guard = controller.lock().await;
    assert_eq!(guard.phase(&turn), Some(TurnPhase::Complete));
    match &guard.messages()[1].phase {
        Some(PhaseMeta::Summary { duration_ms, .. }) => assert_eq!(*duration_ms, 3600),
        other => panic!("expected summary, got {other:?}"),
    }
    assert_eq!(guard.messages().last().unwrap().text, FINAL_TEXT);
}

#[tokio::test(start_paused = true)]
async fn test_second_turn_interleaves_with_first() {
    let driver = driver(AssistMode::Ask);
    let controller = driver.controller();

    let first = driver.submit("first").await.unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;
    let second = driver.submit("second").await.unwrap();

    first.task.await.unwrap().unwrap();
    {
        let guard = controller.lock().await;
        assert_eq!(guard.phase(&first.turn_id), Some(TurnPhase::Complete));
        assert_eq!(guard.phase(&second.turn_id), Some(TurnPhase::Summarizing));
        assert!(guard.is_processing());
    }

    second.task.await.unwrap().unwrap();
    let guard = controller.lock().await;
    assert!(!guard.is_processing());
    let summaries: Vec<_> = guard
        .messages()
        .iter()
        .filter_map(|m| m.summary_turn().cloned())
        .collect();
    assert_eq!(summaries, vec![first.turn_id.clone(), second.turn_id.clone()]);
}

#[tokio::test(start_paused = true)]
async fn test_events_reach_subscribers_in_sequence() {
    let driver = driver(AssistMode::Analyst);
    let mut rx = driver.bus().subscribe();

    let handle = driver.submit("Build P&L").await.unwrap();
    handle.task.await.unwrap().unwrap();

    let mut received = Vec::new();
    while let Ok(envelope) = rx.try_recv() {
        received.push(envelope);
    }
    assert!(received.windows(2).all(|w| w[0].sequence < w[1].sequence));
    assert!(matches!(
        received[0].payload,
        SessionEvent::TurnOpened { elevated: true, .. }
    ));
    let phase_changes = received
        .iter()
        .filter(|e| matches!(e.payload, SessionEvent::PhaseChanged { .. }))
        .count();
    assert_eq!(phase_changes, 3);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_submit_schedules_nothing() {
    let driver = driver(AssistMode::Ask);
    let err = driver.submit("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    tokio::time::sleep(Duration::from_secs(5)).await;
    let controller = driver.controller();
    let guard = controller.lock().await;
    assert!(guard.turns().is_empty());
    assert!(guard.messages().is_empty());
}
