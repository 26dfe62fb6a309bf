//! Plan proposal service.
//!
//! A plan is a disposable, turn-scoped list of steps the user may toggle
//! before accepting or skipping it. Both decisions dismiss the plan; only
//! the returned decision tells them apart.

use serde::Serialize;
use tracing::debug;

use super::ensure_unique_ids;
use crate::domain::models::PlanStep;
use crate::domain::{SessionError, SessionResult};

/// How a proposal was dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlanDecision {
    Accepted { selected_step_ids: Vec<String> },
    Skipped,
}

#[derive(Debug, Default)]
pub struct PlanProposal {
    steps: Option<Vec<PlanStep>>,
}

impl PlanProposal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(steps: &[PlanStep]) -> SessionResult<()> {
        ensure_unique_ids("plan step", steps.iter().map(|s| s.id.as_str()))
    }

    /// Install a fresh proposal with every step selected.
    pub fn propose(&mut self, steps: Vec<PlanStep>) -> SessionResult<()> {
        Self::validate(&steps)?;
        let steps: Vec<PlanStep> = steps
            .into_iter()
            .map(|s| PlanStep { selected: true, ..s })
            .collect();
        debug!(steps = steps.len(), "plan proposed");
        self.steps = Some(steps);
        Ok(())
    }

    /// Steps of the active proposal, if there is one.
    pub fn current(&self) -> Option<&[PlanStep]> {
        self.steps.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.steps.is_some()
    }

    /// Flip one step's selection; returns the new value.
    pub fn toggle(&mut self, step_id: &str) -> SessionResult<bool> {
        let steps = self
            .steps
            .as_mut()
            .ok_or_else(|| SessionError::InvalidArgument("no active plan".to_string()))?;
        let step = steps
            .iter_mut()
            .find(|s| s.id == step_id)
            .ok_or_else(|| SessionError::not_found("Plan step", step_id))?;
        step.selected = !step.selected;
        Ok(step.selected)
    }

    pub fn accept(&mut self) -> SessionResult<PlanDecision> {
        let steps = self.take()?;
        let selected_step_ids = steps
            .into_iter()
            .filter(|s| s.selected)
            .map(|s| s.id)
            .collect();
        Ok(PlanDecision::Accepted { selected_step_ids })
    }

    pub fn skip(&mut self) -> SessionResult<PlanDecision> {
        self.take()?;
        Ok(PlanDecision::Skipped)
    }

    fn take(&mut self) -> SessionResult<Vec<PlanStep>> {
        self.steps
            .take()
            .ok_or_else(|| SessionError::InvalidArgument("no active plan".to_string()))
    }
}
