//! Scripted assistant backend.
//!
//! Returns a fixed restaurant P&L build-out: a four-step plan, four tool
//! invocations with their review steps, three detected issues and the
//! turn's progress texts. Used by the demo command and by tests; any part
//! can be swapped out with the `with_*` builders.

use std::sync::Arc;
use tracing::debug;

use crate::domain::models::{
    AuditInvocation, AuditStep, Formula, Insight, PlanStep, Severity, TurnCompletion, TurnId,
    RANGE_NOT_APPLICABLE,
};
use crate::domain::ports::{AssistantBackend, Clock};

pub const INTERIM_TEXT: &str = "I need to add the missing annual values for the operating expenses section. I'll add the formulas to calculate annual values based on the monthly figures in column C.";

pub const FINAL_TEXT: &str = "Let me make a few final adjustments to complete the green color scheme in our financial model. I'll enhance the title and add formatting to some key totals to make them stand out better.";

pub const REASONING_LOG: [&str; 3] = [
    "Parsed request and identified key objectives",
    "Built stepwise plan with financial assumptions",
    "Validated dependencies and calculated outputs",
];

pub struct ScriptedBackend {
    clock: Arc<dyn Clock>,
    plan: Vec<PlanStep>,
    invocations: Vec<AuditInvocation>,
    insights: Vec<Insight>,
    completion: TurnCompletion,
}

impl ScriptedBackend {
    /// Backend loaded with the P&L script.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let invocations = pnl_invocations(&*clock);
        Self {
            clock,
            plan: pnl_plan(),
            invocations,
            insights: pnl_insights(),
            completion: TurnCompletion {
                interim_text: INTERIM_TEXT.to_string(),
                final_text: FINAL_TEXT.to_string(),
                reasoning_log: REASONING_LOG.iter().map(|s| (*s).to_string()).collect(),
            },
        }
    }

    pub fn with_plan(mut self, plan: Vec<PlanStep>) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_invocations(mut self, invocations: Vec<AuditInvocation>) -> Self {
        self.invocations = invocations;
        self
    }

    pub fn with_insights(mut self, insights: Vec<Insight>) -> Self {
        self.insights = insights;
        self
    }

    pub fn with_completion(mut self, completion: TurnCompletion) -> Self {
        self.completion = completion;
        self
    }
}

impl AssistantBackend for ScriptedBackend {
    fn request_plan(&self, utterance: &str) -> Vec<PlanStep> {
        debug!(utterance, steps = self.plan.len(), "plan requested");
        self.plan.clone()
    }

    fn request_audit_trail(&self, utterance: &str) -> Vec<AuditInvocation> {
        debug!(utterance, invocations = self.invocations.len(), "audit trail requested");
        let now = self.clock.now();
        self.invocations
            .iter()
            .cloned()
            .map(|i| AuditInvocation { created_at: now, ..i })
            .collect()
    }

    fn request_insights(&self) -> Vec<Insight> {
        self.insights.clone()
    }

    fn request_turn_completion(&self, turn_id: &TurnId) -> TurnCompletion {
        debug!(turn_id = %turn_id, "turn completion requested");
        self.completion.clone()
    }
}

fn pnl_plan() -> Vec<PlanStep> {
    vec![
        PlanStep::new("p1", "Create template", "Set up P&L structure with standard sections"),
        PlanStep::new("p2", "Apply formulas", "Link COGS, labor, rent to revenue"),
        PlanStep::new("p3", "Validate ratios", "Check margins and add range alerts"),
        PlanStep::new(
            "p4",
            "Format professionally",
            "Currency, percentages, conditional formatting",
        ),
    ]
}

fn pnl_insights() -> Vec<Insight> {
    vec![
        Insight::new(
            "err_1",
            "Broken link: Operating Expenses total not updating",
            Severity::High,
            "B20",
        )
        .with_description("Cell B20 references B15 but misses new expense row B14.")
        .with_suggestion("Update formula to =B15-SUM(B11:B14)."),
        Insight::new(
            "err_2",
            "Percentage format inconsistent",
            Severity::Medium,
            "C7:C10",
        )
        .with_description("Cells C7:C10 display raw decimals instead of percentages.")
        .with_suggestion("Apply Percentage Format: 0.0% to C7:C10."),
        Insight::new(
            "err_3",
            "Data validation missing on revenue inputs",
            Severity::Low,
            "B3:B4",
        )
        .with_description("Revenue cells accept negative values.")
        .with_suggestion("Add validation: values must be >= 0."),
    ]
}

fn pnl_invocations(clock: &dyn Clock) -> Vec<AuditInvocation> {
    let now = clock.now();
    vec![
        AuditInvocation::new(
            "tool_1",
            "Financial Template Generator",
            "Created P&L structure with standard restaurant categories",
            "Generated revenue sections (Food Sales, Beverage Sales), COGS categories, and operating expense structure following QSR industry standards",
            now,
        )
        .with_formula(
            Formula::new("B5", "=B3+B4", "Total Revenue calculation").with_dependencies(["B3", "B4"]),
        )
        .with_formula(
            Formula::new("B15", "=B5-B10", "Gross Profit calculation")
                .with_dependencies(["B5", "B10"]),
        )
        .with_step(AuditStep::new(
            "step_1_1",
            "Created header structure with company name and period",
            "A1:C2",
            true,
        ))
        .with_step(AuditStep::new(
            "step_1_2",
            "Set up revenue categories: Food Sales (B3), Beverage Sales (B4)",
            "A3:B4",
            true,
        ))
        .with_step(AuditStep::new(
            "step_1_3",
            "Added COGS section with Food Costs (B7), Beverage Costs (B8)",
            "A7:B8",
            true,
        ))
        .with_step(AuditStep::new(
            "step_1_4",
            "Implemented operating expenses: Labor (B11), Rent (B12), Utilities (B13)",
            "A11:B13",
            true,
        ))
        .with_step(AuditStep::new(
            "step_1_5",
            "Applied industry-standard formatting and cell protection",
            "A1:C25",
            false,
        ))
        .with_affected_range("A1:C25")
        .with_validation_rule("Revenue cells accept positive numbers only")
        .with_validation_rule("Percentage cells limited to 0-100%"),
        AuditInvocation::new(
            "tool_2",
            "Formula Engine",
            "Applied percentage-based calculations",
            "Set COGS at 30% of revenue, labor costs at 28%, rent at 6% following industry benchmarks for fast food restaurants",
            now,
        )
        .with_formula(Formula::new("B7", "=B5*0.30", "Food COGS as 30% of revenue").with_dependencies(["B5"]))
        .with_formula(Formula::new("B8", "=B5*0.05", "Beverage COGS as 5% of revenue").with_dependencies(["B5"]))
        .with_formula(Formula::new("B11", "=B5*0.28", "Labor costs as 28% of revenue").with_dependencies(["B5"]))
        .with_formula(Formula::new("B12", "=B5*0.06", "Rent as 6% of revenue").with_dependencies(["B5"]))
        .with_step(AuditStep::new(
            "step_2_1",
            "Analyzed industry benchmarks for QSR restaurants",
            RANGE_NOT_APPLICABLE,
            false,
        ))
        .with_step(AuditStep::new("step_2_2", "Applied 30% COGS ratio for food items", "B7", true))
        .with_step(AuditStep::new(
            "step_2_3",
            "Set beverage COGS at 5% (higher margin items)",
            "B8",
            true,
        ))
        .with_step(AuditStep::new(
            "step_2_4",
            "Configured labor costs at 28% (industry standard)",
            "B11",
            true,
        ))
        .with_step(AuditStep::new(
            "step_2_5",
            "Set rent at 6% of revenue (typical lease agreements)",
            "B12",
            true,
        ))
        .with_step(AuditStep::new(
            "step_2_6",
            "Added conditional formatting for ratio validation",
            "B7:B13",
            true,
        ))
        .with_affected_range("B7:B8")
        .with_affected_range("B11:B13")
        .with_validation_rule("All percentage formulas linked to revenue cell B5"),
        AuditInvocation::new(
            "tool_3",
            "Data Validation Suite",
            "Validated financial ratios and relationships",
            "Ensured all percentages sum correctly, validated that net profit margins align with industry standards (8-12%)",
            now,
        )
        .with_formula(
            Formula::new("B20", "=B15-SUM(B11:B14)", "Net Profit calculation")
                .with_dependencies(["B15", "B11", "B12", "B13", "B14"]),
        )
        .with_formula(
            Formula::new("C20", "=B20/B5", "Net Profit Margin percentage")
                .with_dependencies(["B20", "B5"]),
        )
        .with_formula(
            Formula::new(
                "B25",
                "=IF(C20<0.08,\"Below Target\",IF(C20>0.12,\"Above Target\",\"Within Range\"))",
                "Profit margin validation",
            )
            .with_dependencies(["C20"]),
        )
        .with_step(AuditStep::new(
            "step_3_1",
            "Created validation formulas for all financial ratios",
            "C7:C20",
            true,
        ))
        .with_step(AuditStep::new(
            "step_3_2",
            "Implemented cross-checks between revenue and expense categories",
            "D1:D25",
            true,
        ))
        .with_step(AuditStep::new(
            "step_3_3",
            "Added profit margin validation against industry benchmarks",
            "B25",
            true,
        ))
        .with_step(AuditStep::new(
            "step_3_4",
            "Set up alerts for ratios outside acceptable ranges",
            "E1:E25",
            true,
        ))
        .with_step(AuditStep::new(
            "step_3_5",
            "Validated sum formulas for accuracy",
            "B5,B10,B15,B20",
            false,
        ))
        .with_step(AuditStep::new(
            "step_3_6",
            "Applied error checking for circular references",
            "A1:E25",
            false,
        ))
        .with_affected_range("B20:C25")
        .with_validation_rule("Net profit margin must be between 8-12%")
        .with_validation_rule("All expense ratios validated against revenue"),
        AuditInvocation::new(
            "tool_4",
            "Formatting Assistant",
            "Applied professional financial formatting",
            "Added currency formatting, percentage displays, conditional formatting for negative values, and professional color scheme",
            now,
        )
        .with_formula(Formula::new(
            "B3:B20",
            "Currency Format: $#,##0.00",
            "Currency formatting for all monetary values",
        ))
        .with_formula(Formula::new(
            "C7:C14",
            "Percentage Format: 0.0%",
            "Percentage formatting for ratios",
        ))
        .with_step(AuditStep::new(
            "step_4_1",
            "Applied currency formatting to all monetary cells",
            "B3:B20",
            true,
        ))
        .with_step(AuditStep::new(
            "step_4_2",
            "Set percentage formatting for ratio calculations",
            "C7:C14",
            true,
        ))
        .with_step(AuditStep::new(
            "step_4_3",
            "Added conditional formatting: red for negative values",
            "B3:B25",
            true,
        ))
        .with_step(AuditStep::new(
            "step_4_4",
            "Implemented color coding: green for profits, red for losses",
            "B15,B20",
            true,
        ))
        .with_step(AuditStep::new(
            "step_4_5",
            "Applied professional font styling (Calibri, 11pt)",
            "A1:C25",
            true,
        ))
        .with_step(AuditStep::new(
            "step_4_6",
            "Added borders and shading for section separation",
            "A1:C25",
            true,
        ))
        .with_step(AuditStep::new(
            "step_4_7",
            "Protected formula cells to prevent accidental changes",
            "B5,B7:B8,B11:B13,B15,B20",
            false,
        ))
        .with_affected_range("A1:C25")
        .with_validation_rule("Read-only protection on formula cells")
        .with_validation_rule("Input validation on data entry cells"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;

    fn backend() -> ScriptedBackend {
        ScriptedBackend::new(Arc::new(ManualClock::default()))
    }

    #[test]
    fn test_script_shape() {
        let backend = backend();
        let invocations = backend.request_audit_trail("Build P&L");
        assert_eq!(backend.request_plan("Build P&L").len(), 4);
        assert_eq!(invocations.len(), 4);
        assert_eq!(invocations.iter().map(|i| i.steps.len()).sum::<usize>(), 24);
        assert_eq!(backend.request_insights().len(), 3);
    }

    #[test]
    fn test_irreversible_steps() {
        let invocations = backend().request_audit_trail("Build P&L");
        let fixed: Vec<&str> = invocations
            .iter()
            .flat_map(|i| i.steps.iter())
            .filter(|s| !s.revertible)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(
            fixed,
            vec!["step_1_5", "step_2_1", "step_3_5", "step_3_6", "step_4_7"]
        );
    }

    #[test]
    fn test_invocations_stamped_at_request_time() {
        let clock = Arc::new(ManualClock::default());
        let backend = ScriptedBackend::new(clock.clone());
        clock.advance(5_000);
        let invocations = backend.request_audit_trail("Build P&L");
        assert!(invocations.iter().all(|i| i.created_at == clock.now()));
    }
}
