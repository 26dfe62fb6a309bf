//! Audit trail records.
//!
//! An invocation is one tool action the assistant took during an analyst
//! turn, decomposed into ordered steps. Approval state is not stored on
//! these records; the audit trail service keeps it in id-keyed maps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Range sentinel for steps that do not touch the document.
pub const RANGE_NOT_APPLICABLE: &str = "N/A";

/// Review decision for an invocation or a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected,
}

impl Default for ApprovalState {
    fn default() -> Self {
        Self::Pending
    }
}

impl ApprovalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution progress reported by the backend. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionProgress {
    Pending,
    Active,
    Completed,
}

impl Default for ExecutionProgress {
    fn default() -> Self {
        Self::Completed
    }
}

/// A formula written by an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    /// Target cell or range
    pub cell: String,
    /// Expression text (or format code)
    pub expression: String,
    pub description: String,
    /// Cells the expression reads from
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Formula {
    pub fn new(
        cell: impl Into<String>,
        expression: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            cell: cell.into(),
            expression: expression.into(),
            description: description.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// One atomic sub-action of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    pub id: String,
    pub description: String,
    /// Target range, or [`RANGE_NOT_APPLICABLE`]
    pub range: String,
    /// Whether the step may be rejected and reverted
    pub revertible: bool,
    #[serde(default)]
    pub progress: ExecutionProgress,
}

impl AuditStep {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        range: impl Into<String>,
        revertible: bool,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            range: range.into(),
            revertible,
            progress: ExecutionProgress::default(),
        }
    }

    /// Whether the step points at a concrete range.
    pub fn has_range(&self) -> bool {
        self.range != RANGE_NOT_APPLICABLE
    }
}

/// One tool action recorded during an analyst turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInvocation {
    pub id: String,
    /// Tool name, e.g. "Formula Engine"
    pub tool: String,
    /// One-line summary of what the tool did
    pub action: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
    pub steps: Vec<AuditStep>,
    #[serde(default)]
    pub affected_ranges: Vec<String>,
    #[serde(default)]
    pub validation_rules: Vec<String>,
    #[serde(default)]
    pub formulas: Vec<Formula>,
    #[serde(default)]
    pub progress: ExecutionProgress,
}

impl AuditInvocation {
    pub fn new(
        id: impl Into<String>,
        tool: impl Into<String>,
        action: impl Into<String>,
        details: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            tool: tool.into(),
            action: action.into(),
            details: details.into(),
            created_at,
            steps: Vec::new(),
            affected_ranges: Vec::new(),
            validation_rules: Vec::new(),
            formulas: Vec::new(),
            progress: ExecutionProgress::default(),
        }
    }

    pub fn with_step(mut self, step: AuditStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_formula(mut self, formula: Formula) -> Self {
        self.formulas.push(formula);
        self
    }

    pub fn with_affected_range(mut self, range: impl Into<String>) -> Self {
        self.affected_ranges.push(range.into());
        self
    }

    pub fn with_validation_rule(mut self, rule: impl Into<String>) -> Self {
        self.validation_rules.push(rule.into());
        self
    }

    pub fn step(&self, step_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let inv = AuditInvocation::new("tool_1", "Formula Engine", "Applied ratios", "", Utc::now())
            .with_step(AuditStep::new("s1", "Applied COGS ratio", "B7", true))
            .with_step(AuditStep::new("s2", "Analyzed benchmarks", RANGE_NOT_APPLICABLE, false))
            .with_formula(Formula::new("B7", "=B5*0.30", "Food COGS").with_dependencies(["B5"]))
            .with_affected_range("B7:B8");

        assert_eq!(inv.steps.len(), 2);
        assert!(inv.step("s1").unwrap().has_range());
        assert!(!inv.step("s2").unwrap().has_range());
        assert!(inv.step("missing").is_none());
        assert_eq!(inv.formulas[0].dependencies, vec!["B5".to_string()]);
    }

    #[test]
    fn test_default_approval_is_pending() {
        assert_eq!(ApprovalState::default(), ApprovalState::Pending);
        assert_eq!(ApprovalState::Rejected.to_string(), "rejected");
    }
}
