pub mod audit_trail;
pub mod insight_tracker;
pub mod message_log;
pub mod plan_proposal;
pub mod session_events;
pub mod turn_controller;
pub mod version_ledger;

use std::collections::HashSet;

use crate::domain::{SessionError, SessionResult};

pub use audit_trail::{ApprovalCounts, AuditTrail, RevertRequest, ReviewSummary};
pub use insight_tracker::InsightTracker;
pub use message_log::{MessageLog, SummaryPlacement};
pub use plan_proposal::{PlanDecision, PlanProposal};
pub use session_events::{EventEnvelope, EventOutbox, SequenceNumber, SessionEvent};
pub use turn_controller::{ConversationController, FinalizeOutcome};
pub use version_ledger::{VersionLedger, COMMIT_LABEL, MANUAL_SNAPSHOT_LABEL};

/// Reject a backend-supplied list whose ids are not unique.
pub(crate) fn ensure_unique_ids<'a>(
    entity: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> SessionResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SessionError::InvalidArgument(format!(
                "duplicate {entity} id: {id}"
            )));
        }
    }
    Ok(())
}
