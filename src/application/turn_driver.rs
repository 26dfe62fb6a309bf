//! Timer-driven turn progression.
//!
//! Stands in for backend completion signals: after a submit, a task sleeps
//! until each configured delay (measured from submit) and fires the next
//! phase transition. Turns submitted while another is in flight get their
//! own task, so their transitions interleave in arrival order.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{info, instrument, warn};

use super::event_bus::EventBus;
use crate::domain::models::{TimingConfig, TurnId};
use crate::domain::ports::AssistantBackend;
use crate::domain::SessionResult;
use crate::services::ConversationController;

pub type SharedController = Arc<Mutex<ConversationController>>;

/// A scheduled turn.
#[derive(Debug)]
pub struct TurnHandle {
    pub turn_id: TurnId,
    pub task: JoinHandle<SessionResult<()>>,
}

pub struct TurnDriver {
    controller: SharedController,
    backend: Arc<dyn AssistantBackend>,
    timing: TimingConfig,
    bus: Arc<EventBus>,
}

impl TurnDriver {
    pub fn new(
        controller: SharedController,
        backend: Arc<dyn AssistantBackend>,
        timing: TimingConfig,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            controller,
            backend,
            timing,
            bus,
        }
    }

    pub fn controller(&self) -> SharedController {
        Arc::clone(&self.controller)
    }

    pub fn bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }

    /// Submit an utterance and schedule its phase transitions.
    ///
    /// Rejected submissions schedule nothing.
    #[instrument(skip(self, utterance))]
    pub async fn submit(&self, utterance: &str) -> SessionResult<TurnHandle> {
        let start = Instant::now();
        let turn_id = apply(&self.controller, &self.bus, |c| c.submit(utterance)).await?;

        let controller = Arc::clone(&self.controller);
        let bus = Arc::clone(&self.bus);
        let backend = Arc::clone(&self.backend);
        let timing = self.timing;
        let id = turn_id.clone();
        let task = tokio::spawn(async move {
            let result = drive_turn(controller, bus, backend, timing, start, &id).await;
            if let Err(ref e) = result {
                warn!(turn_id = %id, error = %e, "scheduled turn transition rejected");
            }
            result
        });

        Ok(TurnHandle { turn_id, task })
    }
}

async fn drive_turn(
    controller: SharedController,
    bus: Arc<EventBus>,
    backend: Arc<dyn AssistantBackend>,
    timing: TimingConfig,
    start: Instant,
    turn_id: &TurnId,
) -> SessionResult<()> {
    sleep_until(start + Duration::from_millis(timing.thinking_delay_ms)).await;
    apply(&controller, &bus, |c| c.begin_thinking(turn_id)).await?;

    let completion = backend.request_turn_completion(turn_id);

    sleep_until(start + Duration::from_millis(timing.interim_delay_ms)).await;
    apply(&controller, &bus, |c| {
        c.record_interim(turn_id, &completion.interim_text)
    })
    .await?;

    sleep_until(start + Duration::from_millis(timing.completion_delay_ms)).await;
    let outcome = apply(&controller, &bus, |c| {
        c.finalize(
            turn_id,
            &completion.final_text,
            completion.reasoning_log.clone(),
        )
    })
    .await?;

    info!(turn_id = %turn_id, duration_ms = outcome.duration_ms, "scheduled turn finished");
    Ok(())
}

/// Run one controller operation under the lock and publish what it emitted.
async fn apply<T>(
    controller: &SharedController,
    bus: &EventBus,
    op: impl FnOnce(&mut ConversationController) -> SessionResult<T>,
) -> SessionResult<T> {
    let mut guard = controller.lock().await;
    let result = op(&mut guard);
    bus.publish_all(guard.drain_events());
    result
}
