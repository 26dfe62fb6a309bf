//! Conversation turn controller.
//!
//! The single entry point of the session core. It owns the message log and
//! the turns, drives each turn through its phases, and routes user actions
//! to the audit trail, insight tracker, version ledger and plan proposal.
//! Those four components know nothing of each other or of the controller.
//!
//! Every operation runs to completion before returning. Phase transitions
//! are triggered from outside (backend callbacks or timers standing in for
//! them) and are looked up by turn id, so overlapping turns never interfere.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::audit_trail::{AuditTrail, RevertRequest};
use super::insight_tracker::InsightTracker;
use super::message_log::{MessageLog, SummaryPlacement};
use super::plan_proposal::{PlanDecision, PlanProposal};
use super::session_events::{EventEnvelope, EventOutbox, SequenceNumber, SessionEvent};
use super::version_ledger::{VersionLedger, COMMIT_LABEL, MANUAL_SNAPSHOT_LABEL};
use crate::domain::models::{
    AssistMode, AuditInvocation, Config, GovernanceSettings, Insight, Message, MessageId, Model,
    PlanStep, Provider, SnapshotId, Turn, TurnId, TurnPhase, VersionSnapshot,
};
use crate::domain::ports::{AssistantBackend, Clock, IdGenerator};
use crate::domain::{SessionError, SessionResult};

/// What finalizing a turn did to the message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeOutcome {
    pub duration_ms: u64,
    pub summary: SummaryPlacement,
}

/// Session state behind the assistant panel.
///
/// Every emitted event is held in an outbox until the host takes it with
/// [`ConversationController::drain_events`]. Hosts that drive the
/// controller directly must drain after each operation; `TurnDriver` does
/// this for the turns it runs.
pub struct ConversationController {
    backend: Arc<dyn AssistantBackend>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    mode: AssistMode,
    governance: GovernanceSettings,
    selected_ranges: Vec<String>,
    messages: MessageLog,
    turns: Vec<Turn>,
    turn_index: HashMap<TurnId, usize>,
    audit: AuditTrail,
    insights: InsightTracker,
    ledger: VersionLedger,
    plan: PlanProposal,
    outbox: EventOutbox,
}

impl std::fmt::Debug for ConversationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationController")
            .field("mode", &self.mode)
            .field("messages", &self.messages.len())
            .field("turns", &self.turns.len())
            .finish_non_exhaustive()
    }
}

impl ConversationController {
    pub fn new(
        backend: Arc<dyn AssistantBackend>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            backend,
            clock,
            ids,
            mode: AssistMode::default(),
            governance: GovernanceSettings::default(),
            selected_ranges: Vec::new(),
            messages: MessageLog::new(),
            turns: Vec::new(),
            turn_index: HashMap::new(),
            audit: AuditTrail::new(),
            insights: InsightTracker::new(),
            ledger: VersionLedger::new(),
            plan: PlanProposal::new(),
            outbox: EventOutbox::new(),
        }
    }

    /// Build a controller with mode and governance taken from configuration.
    pub fn from_config(
        config: &Config,
        backend: Arc<dyn AssistantBackend>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let mut controller = Self::new(backend, clock, ids);
        controller.mode = config.default_mode;
        controller.governance = config.governance;
        controller
    }

    pub fn with_mode(mut self, mode: AssistMode) -> Self {
        self.mode = mode;
        self
    }

    // ------------------------------------------------------------------
    // Turns
    // ------------------------------------------------------------------

    /// Accept a user utterance and open a turn in `submitted`.
    ///
    /// In analyst mode the plan, audit trail and insight scan for the turn
    /// are requested and installed before this returns. Blank utterances
    /// are rejected without any mutation. Malformed backend material still
    /// opens the turn but leaves the previous review state in place and is
    /// reported as a `ProposalDiscarded` diagnostic.
    #[instrument(skip(self, utterance), fields(mode = %self.mode))]
    pub fn submit(&mut self, utterance: &str) -> SessionResult<TurnId> {
        if utterance.trim().is_empty() {
            return Err(SessionError::InvalidArgument(
                "utterance must not be empty".to_string(),
            ));
        }

        let elevated = self.mode.is_elevated();
        let proposals = elevated.then(|| self.request_review_material(utterance));

        let now = self.clock.now();
        let message_id = MessageId(self.ids.next_id("m"));
        self.messages
            .push(Message::user(message_id, utterance, now));

        let turn_id = TurnId(self.ids.next_id("t"));
        let turn = Turn::new(turn_id.clone(), utterance.to_string(), now, elevated);
        self.turn_index.insert(turn_id.clone(), self.turns.len());
        self.turns.push(turn);
        self.emit(SessionEvent::TurnOpened {
            turn_id: turn_id.clone(),
            elevated,
        });

        match proposals {
            Some(Ok((plan, invocations, insights))) => {
                let step_count = plan.len();
                let insight_count = insights.len();
                self.plan.propose(plan)?;
                self.audit.set_invocations(invocations)?;
                self.insights.load(insights)?;
                self.emit(SessionEvent::PlanProposed { step_count });
                self.emit(SessionEvent::InsightsScanned {
                    count: insight_count,
                });
            }
            Some(Err(err)) => {
                warn!(turn_id = %turn_id, error = %err, "backend review material discarded");
                self.emit(SessionEvent::ProposalDiscarded {
                    turn_id: turn_id.clone(),
                    detail: err.to_string(),
                });
            }
            None => {}
        }

        info!(turn_id = %turn_id, elevated, "turn submitted");
        Ok(turn_id)
    }

    /// Fetch and validate a turn's plan, audit trail and insight scan as a
    /// unit.
    fn request_review_material(
        &self,
        utterance: &str,
    ) -> SessionResult<(Vec<PlanStep>, Vec<AuditInvocation>, Vec<Insight>)> {
        let plan = self.backend.request_plan(utterance);
        let invocations = self.backend.request_audit_trail(utterance);
        let insights = self.backend.request_insights();
        PlanProposal::validate(&plan)?;
        AuditTrail::validate(&invocations)?;
        InsightTracker::validate(&insights)?;
        Ok((plan, invocations, insights))
    }

    /// submitted -> thinking: insert the turn's thinking message and start
    /// measuring.
    pub fn begin_thinking(&mut self, turn_id: &TurnId) -> SessionResult<()> {
        let index = self.advance(turn_id, TurnPhase::Thinking)?;
        self.turns[index].thinking_started_ms = Some(self.clock.monotonic_ms());

        let message_id = MessageId(format!("{turn_id}_msg"));
        self.messages
            .push(Message::thinking(message_id, turn_id.clone(), self.clock.now()));
        Ok(())
    }

    /// thinking -> summarizing: append the interim progress message.
    pub fn record_interim(&mut self, turn_id: &TurnId, interim_text: &str) -> SessionResult<()> {
        self.advance(turn_id, TurnPhase::Summarizing)?;
        let message_id = MessageId(self.ids.next_id("m"));
        self.messages
            .push(Message::system(message_id, interim_text, self.clock.now()));
        Ok(())
    }

    /// summarizing -> complete: swap the thinking message for a summary and
    /// append the concluding message.
    ///
    /// A missing thinking message is recovered by appending the summary and
    /// reported as an `InconsistentState` diagnostic.
    pub fn finalize(
        &mut self,
        turn_id: &TurnId,
        final_text: &str,
        reasoning_log: Vec<String>,
    ) -> SessionResult<FinalizeOutcome> {
        let index = self.advance(turn_id, TurnPhase::Complete)?;
        let now_ms = self.clock.monotonic_ms();
        let duration_ms = self.turns[index]
            .thinking_started_ms
            .map_or(0, |start| now_ms.saturating_sub(start));
        self.turns[index].thinking_duration_ms = Some(duration_ms);

        let now = self.clock.now();
        let summary = Message::summary(
            MessageId(format!("{turn_id}_summary")),
            turn_id.clone(),
            duration_ms,
            reasoning_log,
            now,
        );
        let placement = self.messages.install_summary(summary);
        if let SummaryPlacement::Appended(_) = placement {
            warn!(turn_id = %turn_id, "thinking message missing at finalize, summary appended");
            self.emit(SessionEvent::InconsistentState {
                turn_id: turn_id.clone(),
                detail: "thinking message missing at finalize".to_string(),
            });
        }

        let message_id = MessageId(self.ids.next_id("m"));
        self.messages
            .push(Message::system(message_id, final_text, now));

        info!(turn_id = %turn_id, duration_ms, "turn complete");
        Ok(FinalizeOutcome {
            duration_ms,
            summary: placement,
        })
    }

    fn advance(&mut self, turn_id: &TurnId, next: TurnPhase) -> SessionResult<usize> {
        let index = *self
            .turn_index
            .get(turn_id)
            .ok_or_else(|| SessionError::not_found("Turn", turn_id.as_str()))?;
        let from = self.turns[index]
            .advance(next)
            .map_err(|from| SessionError::InvalidTransition {
                turn_id: turn_id.clone(),
                from,
                to: next,
            })?;
        debug!(turn_id = %turn_id, %from, to = %next, "turn phase changed");
        self.emit(SessionEvent::PhaseChanged {
            turn_id: turn_id.clone(),
            from,
            to: next,
        });
        Ok(index)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn turn(&self, turn_id: &TurnId) -> Option<&Turn> {
        self.turn_index.get(turn_id).map(|&i| &self.turns[i])
    }

    pub fn phase(&self, turn_id: &TurnId) -> Option<TurnPhase> {
        self.turn(turn_id).map(|t| t.phase)
    }

    /// True while any turn has not completed.
    pub fn is_processing(&self) -> bool {
        self.turns.iter().any(|t| !t.is_complete())
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    pub fn messages(&self) -> &[Message] {
        self.messages.messages()
    }

    pub fn message_log(&self) -> &MessageLog {
        &self.messages
    }

    /// Expand or collapse a thought summary.
    pub fn toggle_summary(&mut self, message_id: &MessageId) -> SessionResult<bool> {
        self.messages.toggle_summary(message_id)
    }

    // ------------------------------------------------------------------
    // Mode, governance and selection context
    // ------------------------------------------------------------------

    pub fn mode(&self) -> AssistMode {
        self.mode
    }

    /// Takes effect for turns submitted afterwards.
    pub fn set_mode(&mut self, mode: AssistMode) {
        self.mode = mode;
    }

    pub fn governance(&self) -> &GovernanceSettings {
        &self.governance
    }

    pub fn set_provider(&mut self, provider: Provider) {
        self.governance.set_provider(provider);
    }

    pub fn set_model(&mut self, model: Model) -> SessionResult<()> {
        if !self.governance.set_model(model) {
            return Err(SessionError::InvalidArgument(format!(
                "{} does not offer {model}",
                self.governance.provider
            )));
        }
        Ok(())
    }

    pub fn set_dry_run(&mut self, enabled: bool) {
        self.governance.dry_run = enabled;
    }

    pub fn set_privacy_mode(&mut self, enabled: bool) {
        self.governance.privacy_mode = enabled;
    }

    pub fn selected_ranges(&self) -> &[String] {
        &self.selected_ranges
    }

    /// Add a range to the selection context; duplicates are ignored.
    pub fn add_selected_range(&mut self, range: &str) -> SessionResult<()> {
        let range = range.trim();
        if range.is_empty() {
            return Err(SessionError::InvalidArgument(
                "range must not be empty".to_string(),
            ));
        }
        if !self.selected_ranges.iter().any(|r| r == range) {
            self.selected_ranges.push(range.to_string());
        }
        Ok(())
    }

    pub fn remove_selected_range(&mut self, range: &str) -> SessionResult<()> {
        let range = range.trim();
        let before = self.selected_ranges.len();
        self.selected_ranges.retain(|r| r != range);
        if self.selected_ranges.len() == before {
            return Err(SessionError::not_found("Selected range", range));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Audit trail
    // ------------------------------------------------------------------

    pub fn audit_trail(&self) -> &AuditTrail {
        &self.audit
    }

    pub fn approve_invocation(&mut self, invocation_id: &str) -> SessionResult<()> {
        self.audit.approve_invocation(invocation_id)
    }

    pub fn reject_invocation(&mut self, invocation_id: &str) -> SessionResult<()> {
        self.audit.reject_invocation(invocation_id)
    }

    pub fn approve_step(&mut self, step_id: &str) -> SessionResult<()> {
        self.audit.approve_step(step_id)
    }

    /// Reject a revertible step and ask the host to revert its range.
    pub fn revert_step(&mut self, step_id: &str) -> SessionResult<RevertRequest> {
        let request = self.audit.revert_step(step_id)?;
        self.emit(SessionEvent::RevertRange {
            step_id: request.step_id.clone(),
            range: request.range.clone(),
        });
        Ok(request)
    }

    /// Ask the host to select the range a step touched.
    pub fn navigate_to_step(&mut self, step_id: &str) -> SessionResult<String> {
        let range = self.audit.navigation_target(step_id)?;
        self.emit(SessionEvent::NavigateToRange {
            range: range.clone(),
        });
        Ok(range)
    }

    pub fn toggle_invocation_details(&mut self, invocation_id: &str) -> SessionResult<bool> {
        self.audit.toggle_expanded(invocation_id)
    }

    // ------------------------------------------------------------------
    // Insights
    // ------------------------------------------------------------------

    pub fn insight_tracker(&self) -> &InsightTracker {
        &self.insights
    }

    /// Replace the insight list with a fresh scan from the backend.
    pub fn scan_insights(&mut self) -> SessionResult<usize> {
        let insights = self.backend.request_insights();
        let count = insights.len();
        self.insights.load(insights)?;
        self.emit(SessionEvent::InsightsScanned { count });
        Ok(count)
    }

    pub fn next_insight(&mut self) -> usize {
        self.insights.next()
    }

    pub fn previous_insight(&mut self) -> usize {
        self.insights.previous()
    }

    pub fn apply_insight(&mut self, insight_id: &str) -> SessionResult<()> {
        self.insights.apply(insight_id)?;
        self.emit_insight_resolution(insight_id);
        Ok(())
    }

    pub fn ignore_insight(&mut self, insight_id: &str) -> SessionResult<()> {
        self.insights.ignore(insight_id)?;
        self.emit_insight_resolution(insight_id);
        Ok(())
    }

    fn emit_insight_resolution(&mut self, insight_id: &str) {
        if let Some(status) = self.insights.get(insight_id).map(|i| i.status) {
            self.emit(SessionEvent::InsightResolved {
                insight_id: insight_id.to_string(),
                status,
            });
        }
    }

    // ------------------------------------------------------------------
    // Version ledger
    // ------------------------------------------------------------------

    pub fn version_ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    /// Append a snapshot and make it active.
    pub fn snapshot(&mut self, label: &str) -> VersionSnapshot {
        let id = SnapshotId(self.ids.next_id("v"));
        let snapshot = self.ledger.snapshot(id, label, self.clock.now()).clone();
        self.emit(SessionEvent::SnapshotCreated {
            snapshot_id: snapshot.id.clone(),
            label: snapshot.label.clone(),
        });
        snapshot
    }

    pub fn commit(&mut self) -> VersionSnapshot {
        self.snapshot(COMMIT_LABEL)
    }

    pub fn manual_snapshot(&mut self) -> VersionSnapshot {
        self.snapshot(MANUAL_SNAPSHOT_LABEL)
    }

    pub fn set_active_version(&mut self, id: &SnapshotId) -> SessionResult<()> {
        self.ledger.set_active(id)
    }

    // ------------------------------------------------------------------
    // Plan proposal
    // ------------------------------------------------------------------

    pub fn plan_proposal(&self) -> &PlanProposal {
        &self.plan
    }

    pub fn propose_plan(&mut self, steps: Vec<PlanStep>) -> SessionResult<()> {
        let step_count = steps.len();
        self.plan.propose(steps)?;
        self.emit(SessionEvent::PlanProposed { step_count });
        Ok(())
    }

    pub fn toggle_plan_step(&mut self, step_id: &str) -> SessionResult<bool> {
        self.plan.toggle(step_id)
    }

    pub fn accept_plan(&mut self) -> SessionResult<PlanDecision> {
        let decision = self.plan.accept()?;
        self.emit_plan_decision(&decision);
        Ok(decision)
    }

    pub fn skip_plan(&mut self) -> SessionResult<PlanDecision> {
        let decision = self.plan.skip()?;
        self.emit_plan_decision(&decision);
        Ok(decision)
    }

    fn emit_plan_decision(&mut self, decision: &PlanDecision) {
        let event = match decision {
            PlanDecision::Accepted { selected_step_ids } => SessionEvent::PlanAccepted {
                selected_step_ids: selected_step_ids.clone(),
            },
            PlanDecision::Skipped => SessionEvent::PlanSkipped,
        };
        self.emit(event);
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    fn emit(&mut self, event: SessionEvent) -> SequenceNumber {
        self.outbox.record(self.clock.now(), event)
    }

    pub fn pending_events(&self) -> &[EventEnvelope] {
        self.outbox.pending()
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<EventEnvelope> {
        self.outbox.drain()
    }
}
