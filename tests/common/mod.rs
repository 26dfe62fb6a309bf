//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::sync::Arc;

use sheetwright::domain::models::{AssistMode, TurnId};
use sheetwright::domain::ports::Clock;
use sheetwright::infrastructure::backend::scripted::{FINAL_TEXT, INTERIM_TEXT, REASONING_LOG};
use sheetwright::infrastructure::backend::ScriptedBackend;
use sheetwright::infrastructure::clock::{ManualClock, SequentialIdGenerator};
use sheetwright::services::ConversationController;

/// A controller over the scripted backend with a hand-driven clock.
pub struct TestSession {
    pub controller: ConversationController,
    pub clock: Arc<ManualClock>,
}

/// Build a session in `mode` backed by the P&L script.
pub fn session(mode: AssistMode) -> TestSession {
    session_with(mode, |backend| backend)
}

/// Build a session whose scripted backend is customised by `configure`.
pub fn session_with(
    mode: AssistMode,
    configure: impl FnOnce(ScriptedBackend) -> ScriptedBackend,
) -> TestSession {
    let clock = Arc::new(ManualClock::default());
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let backend = configure(ScriptedBackend::new(Arc::clone(&dyn_clock)));
    let controller = ConversationController::new(
        Arc::new(backend),
        dyn_clock,
        Arc::new(SequentialIdGenerator::new()),
    )
    .with_mode(mode);
    TestSession { controller, clock }
}

impl TestSession {
    /// Submit and drive a turn through every phase using the default
    /// delays: thinking at 400ms, interim at 2000ms, complete at 4000ms.
    #[allow(dead_code)]
    pub fn run_turn(&mut self, utterance: &str) -> TurnId {
        let turn = self.controller.submit(utterance).expect("submit failed");
        self.clock.advance(400);
        self.controller.begin_thinking(&turn).expect("begin_thinking failed");
        self.clock.advance(1600);
        self.controller
            .record_interim(&turn, INTERIM_TEXT)
            .expect("record_interim failed");
        self.clock.advance(2000);
        self.controller
            .finalize(&turn, FINAL_TEXT, reasoning_log())
            .expect("finalize failed");
        turn
    }
}

/// The scripted reasoning log as owned strings.
#[allow(dead_code)]
pub fn reasoning_log() -> Vec<String> {
    REASONING_LOG.iter().map(|s| (*s).to_string()).collect()
}
