//! Insight tracker service.
//!
//! Owns the detected-issue list and the focus pointer. Resolutions are
//! one-way: a pending insight may be applied or ignored, after which its
//! status never changes again.

use tracing::debug;

use super::ensure_unique_ids;
use crate::domain::models::{Insight, InsightStatus};
use crate::domain::{SessionError, SessionResult};

#[derive(Debug, Default)]
pub struct InsightTracker {
    insights: Vec<Insight>,
    current: usize,
}

impl InsightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(insights: &[Insight]) -> SessionResult<()> {
        ensure_unique_ids("insight", insights.iter().map(|i| i.id.as_str()))
    }

    /// Replace the list with a fresh scan and focus the first entry.
    ///
    /// Incoming statuses are ignored; a fresh scan is always pending.
    pub fn load(&mut self, insights: Vec<Insight>) -> SessionResult<()> {
        Self::validate(&insights)?;
        self.insights = insights
            .into_iter()
            .map(|i| Insight {
                status: InsightStatus::Pending,
                ..i
            })
            .collect();
        self.current = 0;
        debug!(count = self.insights.len(), "insights loaded");
        Ok(())
    }

    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }

    pub fn len(&self) -> usize {
        self.insights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The focused insight, if any.
    pub fn current(&self) -> Option<&Insight> {
        self.insights.get(self.current)
    }

    pub fn get(&self, insight_id: &str) -> Option<&Insight> {
        self.insights.iter().find(|i| i.id == insight_id)
    }

    /// Move focus forward, stopping at the last entry.
    pub fn next(&mut self) -> usize {
        if self.current + 1 < self.insights.len() {
            self.current += 1;
        }
        self.current
    }

    /// Move focus back, stopping at the first entry.
    pub fn previous(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    pub fn apply(&mut self, insight_id: &str) -> SessionResult<()> {
        self.resolve(insight_id, InsightStatus::Applied)
    }

    pub fn ignore(&mut self, insight_id: &str) -> SessionResult<()> {
        self.resolve(insight_id, InsightStatus::Ignored)
    }

    fn resolve(&mut self, insight_id: &str, status: InsightStatus) -> SessionResult<()> {
        let insight = self
            .insights
            .iter_mut()
            .find(|i| i.id == insight_id)
            .ok_or_else(|| SessionError::not_found("Insight", insight_id))?;
        if insight.status.is_terminal() {
            return Err(SessionError::PolicyViolation(format!(
                "insight {insight_id} is already {}",
                insight.status.as_str()
            )));
        }
        insight.status = status;
        debug!(insight_id, status = status.as_str(), "insight resolved");
        Ok(())
    }

    pub fn pending_count(&self) -> usize {
        self.insights
            .iter()
            .filter(|i| i.status == InsightStatus::Pending)
            .count()
    }
}
