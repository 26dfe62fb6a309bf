//! Events emitted by the session core.
//!
//! Every host-visible side effect (navigate, revert, plan decisions,
//! diagnostics) is recorded as an event with a monotonically increasing
//! sequence number. The core only states intent; hosts perform the action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{InsightStatus, SnapshotId, TurnId, TurnPhase};

/// Monotonically increasing sequence number assigned by the outbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    TurnOpened {
        turn_id: TurnId,
        elevated: bool,
    },
    PhaseChanged {
        turn_id: TurnId,
        from: TurnPhase,
        to: TurnPhase,
    },
    /// Informational: the host should select `range` in the document
    NavigateToRange {
        range: String,
    },
    /// The document-mutation collaborator should undo the step's changes
    RevertRange {
        step_id: String,
        range: String,
    },
    PlanProposed {
        step_count: usize,
    },
    PlanAccepted {
        selected_step_ids: Vec<String>,
    },
    PlanSkipped,
    InsightsScanned {
        count: usize,
    },
    InsightResolved {
        insight_id: String,
        status: InsightStatus,
    },
    SnapshotCreated {
        snapshot_id: SnapshotId,
        label: String,
    },
    /// Diagnostic: an internal correlation failed and was recovered locally
    InconsistentState {
        turn_id: TurnId,
        detail: String,
    },
    /// Diagnostic: the backend's review material for a turn was malformed
    /// and was not installed
    ProposalDiscarded {
        turn_id: TurnId,
        detail: String,
    },
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TurnOpened { .. } => "turn_opened",
            Self::PhaseChanged { .. } => "phase_changed",
            Self::NavigateToRange { .. } => "navigate_to_range",
            Self::RevertRange { .. } => "revert_range",
            Self::PlanProposed { .. } => "plan_proposed",
            Self::PlanAccepted { .. } => "plan_accepted",
            Self::PlanSkipped => "plan_skipped",
            Self::InsightsScanned { .. } => "insights_scanned",
            Self::InsightResolved { .. } => "insight_resolved",
            Self::SnapshotCreated { .. } => "snapshot_created",
            Self::InconsistentState { .. } => "inconsistent_state",
            Self::ProposalDiscarded { .. } => "proposal_discarded",
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            Self::InconsistentState { .. } | Self::ProposalDiscarded { .. }
        )
    }
}

/// Event envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub sequence: SequenceNumber,
    pub timestamp: DateTime<Utc>,
    pub payload: SessionEvent,
}

/// Events recorded since the host last drained them.
#[derive(Debug, Default)]
pub struct EventOutbox {
    last_sequence: Option<SequenceNumber>,
    pending: Vec<EventEnvelope>,
}

impl EventOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and return its sequence number.
    pub fn record(&mut self, timestamp: DateTime<Utc>, payload: SessionEvent) -> SequenceNumber {
        let sequence = self
            .last_sequence
            .map_or_else(SequenceNumber::zero, |s| s.next());
        self.last_sequence = Some(sequence);
        self.pending.push(EventEnvelope {
            sequence,
            timestamp,
            payload,
        });
        sequence
    }

    pub fn pending(&self) -> &[EventEnvelope] {
        &self.pending
    }

    /// Take all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<EventEnvelope> {
        std::mem::take(&mut self.pending)
    }

    pub fn last_sequence(&self) -> Option<SequenceNumber> {
        self.last_sequence
    }
}
