//! Audit trail service.
//!
//! Holds the tool invocations of the current analyst turn and the review
//! state of every invocation and step. Review state lives in id-keyed maps
//! so that invocation and step decisions stay independent: approving an
//! invocation never touches its steps and vice versa.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::ensure_unique_ids;
use crate::domain::models::{ApprovalState, AuditInvocation, AuditStep};
use crate::domain::{SessionError, SessionResult};

/// Intent to undo a rejected step, handed to the document collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevertRequest {
    pub step_id: String,
    pub range: String,
}

/// Count of review decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl ApprovalCounts {
    fn add(&mut self, state: ApprovalState) {
        match state {
            ApprovalState::Pending => self.pending += 1,
            ApprovalState::Approved => self.approved += 1,
            ApprovalState::Rejected => self.rejected += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }
}

/// Review progress over the whole trail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub invocations: ApprovalCounts,
    pub steps: ApprovalCounts,
}

/// Tool invocations of the current analyst turn with their review state.
#[derive(Debug, Default)]
pub struct AuditTrail {
    invocations: Vec<AuditInvocation>,
    invocation_states: HashMap<String, ApprovalState>,
    step_states: HashMap<String, ApprovalState>,
    /// step id -> (invocation index, step index)
    step_index: HashMap<String, (usize, usize)>,
    expanded: HashMap<String, bool>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that a candidate trail can be installed.
    ///
    /// Invocation ids and step ids must each be unique across the trail
    /// since review state is keyed by them.
    pub fn validate(invocations: &[AuditInvocation]) -> SessionResult<()> {
        ensure_unique_ids("invocation", invocations.iter().map(|i| i.id.as_str()))?;
        ensure_unique_ids(
            "step",
            invocations
                .iter()
                .flat_map(|i| i.steps.iter().map(|s| s.id.as_str())),
        )
    }

    /// Replace the whole trail. Every invocation and step starts pending and
    /// every detail view starts collapsed.
    pub fn set_invocations(&mut self, invocations: Vec<AuditInvocation>) -> SessionResult<()> {
        Self::validate(&invocations)?;

        let mut invocation_states = HashMap::with_capacity(invocations.len());
        let mut step_states = HashMap::new();
        let mut step_index = HashMap::new();
        for (i, invocation) in invocations.iter().enumerate() {
            invocation_states.insert(invocation.id.clone(), ApprovalState::Pending);
            for (j, step) in invocation.steps.iter().enumerate() {
                step_states.insert(step.id.clone(), ApprovalState::Pending);
                step_index.insert(step.id.clone(), (i, j));
            }
        }

        debug!(
            invocations = invocations.len(),
            steps = step_states.len(),
            "audit trail replaced"
        );

        self.invocations = invocations;
        self.invocation_states = invocation_states;
        self.step_states = step_states;
        self.step_index = step_index;
        self.expanded.clear();
        Ok(())
    }

    pub fn invocations(&self) -> &[AuditInvocation] {
        &self.invocations
    }

    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }

    pub fn invocation(&self, invocation_id: &str) -> Option<&AuditInvocation> {
        self.invocations.iter().find(|i| i.id == invocation_id)
    }

    pub fn step(&self, step_id: &str) -> Option<&AuditStep> {
        self.step_index
            .get(step_id)
            .map(|&(i, j)| &self.invocations[i].steps[j])
    }

    pub fn invocation_state(&self, invocation_id: &str) -> Option<ApprovalState> {
        self.invocation_states.get(invocation_id).copied()
    }

    pub fn step_state(&self, step_id: &str) -> Option<ApprovalState> {
        self.step_states.get(step_id).copied()
    }

    pub fn approve_invocation(&mut self, invocation_id: &str) -> SessionResult<()> {
        self.set_invocation_state(invocation_id, ApprovalState::Approved)
    }

    pub fn reject_invocation(&mut self, invocation_id: &str) -> SessionResult<()> {
        self.set_invocation_state(invocation_id, ApprovalState::Rejected)
    }

    fn set_invocation_state(&mut self, invocation_id: &str, state: ApprovalState) -> SessionResult<()> {
        let slot = self
            .invocation_states
            .get_mut(invocation_id)
            .ok_or_else(|| SessionError::not_found("Invocation", invocation_id))?;
        *slot = state;
        debug!(invocation_id, state = %state, "invocation reviewed");
        Ok(())
    }

    /// Approve a step. Allowed whether or not the step is revertible.
    pub fn approve_step(&mut self, step_id: &str) -> SessionResult<()> {
        let slot = self
            .step_states
            .get_mut(step_id)
            .ok_or_else(|| SessionError::not_found("Step", step_id))?;
        *slot = ApprovalState::Approved;
        debug!(step_id, "step approved");
        Ok(())
    }

    /// Reject a revertible step and return the revert intent for its range.
    ///
    /// Overrides an earlier approval. Non-revertible steps are refused with
    /// a policy violation and keep their state.
    pub fn revert_step(&mut self, step_id: &str) -> SessionResult<RevertRequest> {
        let step = self
            .step(step_id)
            .ok_or_else(|| SessionError::not_found("Step", step_id))?;
        if !step.revertible {
            return Err(SessionError::PolicyViolation(format!(
                "step {step_id} is not revertible"
            )));
        }
        let request = RevertRequest {
            step_id: step.id.clone(),
            range: step.range.clone(),
        };
        self.step_states
            .insert(step_id.to_string(), ApprovalState::Rejected);
        debug!(step_id, range = %request.range, "step reverted");
        Ok(request)
    }

    /// Range to navigate to for a step.
    pub fn navigation_target(&self, step_id: &str) -> SessionResult<String> {
        let step = self
            .step(step_id)
            .ok_or_else(|| SessionError::not_found("Step", step_id))?;
        if !step.has_range() {
            return Err(SessionError::InvalidArgument(format!(
                "step {step_id} has no target range"
            )));
        }
        Ok(step.range.clone())
    }

    /// Flip the detail view of an invocation; returns the new value.
    pub fn toggle_expanded(&mut self, invocation_id: &str) -> SessionResult<bool> {
        if !self.invocation_states.contains_key(invocation_id) {
            return Err(SessionError::not_found("Invocation", invocation_id));
        }
        let expanded = self.expanded.entry(invocation_id.to_string()).or_insert(false);
        *expanded = !*expanded;
        Ok(*expanded)
    }

    pub fn is_expanded(&self, invocation_id: &str) -> bool {
        self.expanded.get(invocation_id).copied().unwrap_or(false)
    }

    pub fn review_summary(&self) -> ReviewSummary {
        let mut summary = ReviewSummary::default();
        for state in self.invocation_states.values() {
            summary.invocations.add(*state);
        }
        for state in self.step_states.values() {
            summary.steps.add(*state);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RANGE_NOT_APPLICABLE;
    use crate::domain::ErrorKind;
    use chrono::Utc;

    fn trail() -> AuditTrail {
        let mut trail = AuditTrail::new();
        trail
            .set_invocations(vec![
                AuditInvocation::new("tool_1", "Template Generator", "Created P&L", "", Utc::now())
                    .with_step(AuditStep::new("step_1_1", "Header", "A1:C2", true))
                    .with_step(AuditStep::new("step_1_2", "Formatting", "A1:C25", false)),
                AuditInvocation::new("tool_2", "Formula Engine", "Applied ratios", "", Utc::now())
                    .with_step(AuditStep::new(
                        "step_2_1",
                        "Benchmarks",
                        RANGE_NOT_APPLICABLE,
                        false,
                    ))
                    .with_step(AuditStep::new("step_2_2", "COGS ratio", "B7", true)),
            ])
            .unwrap();
        trail
    }

    #[test]
    fn test_everything_starts_pending_and_collapsed() {
        let trail = trail();
        assert_eq!(trail.invocation_state("tool_1"), Some(ApprovalState::Pending));
        assert_eq!(trail.step_state("step_2_2"), Some(ApprovalState::Pending));
        assert!(!trail.is_expanded("tool_1"));
        let summary = trail.review_summary();
        assert_eq!(summary.invocations.pending, 2);
        assert_eq!(summary.steps.pending, 4);
    }

    #[test]
    fn test_invocation_review_does_not_cascade() {
        let mut trail = trail();
        trail.approve_invocation("tool_1").unwrap();
        assert_eq!(trail.invocation_state("tool_1"), Some(ApprovalState::Approved));
        assert_eq!(trail.step_state("step_1_1"), Some(ApprovalState::Pending));

        trail.approve_step("step_2_2").unwrap();
        trail.reject_invocation("tool_2").unwrap();
        assert_eq!(trail.step_state("step_2_2"), Some(ApprovalState::Approved));
        assert_eq!(trail.invocation_state("tool_2"), Some(ApprovalState::Rejected));
    }

    #[test]
    fn test_non_revertible_step_can_be_approved() {
        let mut trail = trail();
        trail.approve_step("step_1_2").unwrap();
        assert_eq!(trail.step_state("step_1_2"), Some(ApprovalState::Approved));
    }

    #[test]
    fn test_revert_overrides_approval() {
        let mut trail = trail();
        trail.approve_step("step_2_2").unwrap();
        let request = trail.revert_step("step_2_2").unwrap();
        assert_eq!(
            request,
            RevertRequest {
                step_id: "step_2_2".to_string(),
                range: "B7".to_string()
            }
        );
        assert_eq!(trail.step_state("step_2_2"), Some(ApprovalState::Rejected));
    }

    #[test]
    fn test_revert_non_revertible_is_policy_violation() {
        let mut trail = trail();
        trail.approve_step("step_1_2").unwrap();
        let err = trail.revert_step("step_1_2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
        assert_eq!(trail.step_state("step_1_2"), Some(ApprovalState::Approved));
    }

    #[test]
    fn test_unknown_ids_are_invalid_arguments() {
        let mut trail = trail();
        assert_eq!(
            trail.approve_invocation("tool_9").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            trail.revert_step("step_9").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert!(trail.toggle_expanded("tool_9").is_err());
    }

    #[test]
    fn test_navigation_requires_concrete_range() {
        let trail = trail();
        assert_eq!(trail.navigation_target("step_2_2").unwrap(), "B7");
        assert_eq!(
            trail.navigation_target("step_2_1").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_replacing_resets_review_state() {
        let mut trail = trail();
        trail.approve_invocation("tool_1").unwrap();
        trail.toggle_expanded("tool_1").unwrap();
        let invocations = trail.invocations().to_vec();
        trail.set_invocations(invocations).unwrap();
        assert_eq!(trail.invocation_state("tool_1"), Some(ApprovalState::Pending));
        assert!(!trail.is_expanded("tool_1"));
    }

    #[test]
    fn test_duplicate_step_ids_rejected_without_mutation() {
        let mut trail = trail();
        trail.approve_step("step_1_1").unwrap();
        let dup = vec![AuditInvocation::new("tool_x", "X", "", "", Utc::now())
            .with_step(AuditStep::new("s", "a", "A1", true))
            .with_step(AuditStep::new("s", "b", "A2", true))];
        assert!(trail.set_invocations(dup).is_err());
        assert_eq!(trail.len(), 2);
        assert_eq!(trail.step_state("step_1_1"), Some(ApprovalState::Approved));
    }

    #[test]
    fn test_toggle_expanded_flips() {
        let mut trail = trail();
        assert!(trail.toggle_expanded("tool_2").unwrap());
        assert!(trail.is_expanded("tool_2"));
        assert!(!trail.toggle_expanded("tool_2").unwrap());
    }
}
