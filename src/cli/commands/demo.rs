//! `sheetwright demo`: drive one scripted turn through every phase.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::{EventBus, TurnDriver};
use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::cli::types::DemoArgs;
use crate::domain::models::{
    ApprovalState, AssistMode, Config, GovernanceSettings, Insight, Message, PhaseMeta,
    SnapshotId, VersionSnapshot,
};
use crate::domain::ports::{AssistantBackend, Clock, IdGenerator};
use crate::infrastructure::backend::ScriptedBackend;
use crate::infrastructure::clock::{SequentialIdGenerator, SystemClock};
use crate::infrastructure::config::ConfigLoader;
use crate::services::{ConversationController, EventEnvelope, PlanDecision, ReviewSummary};

#[derive(Debug, Serialize)]
pub struct InvocationRow {
    pub id: String,
    pub tool: String,
    pub state: ApprovalState,
    pub steps: usize,
}

#[derive(Debug, Serialize)]
pub struct DemoOutput {
    pub turn_id: String,
    pub mode: AssistMode,
    pub governance: GovernanceSettings,
    pub messages: Vec<Message>,
    pub plan_decision: Option<PlanDecision>,
    pub invocations: Vec<InvocationRow>,
    pub review: ReviewSummary,
    pub insights: Vec<Insight>,
    pub versions: Vec<VersionSnapshot>,
    pub active_version: SnapshotId,
    pub events: Vec<EventEnvelope>,
}

impl DemoOutput {
    fn capture(
        controller: &ConversationController,
        turn_id: String,
        plan_decision: Option<PlanDecision>,
        events: Vec<EventEnvelope>,
    ) -> Self {
        let audit = controller.audit_trail();
        let invocations = audit
            .invocations()
            .iter()
            .map(|i| InvocationRow {
                id: i.id.clone(),
                tool: i.tool.clone(),
                state: audit.invocation_state(&i.id).unwrap_or_default(),
                steps: i.steps.len(),
            })
            .collect();
        let ledger = controller.version_ledger();
        Self {
            turn_id,
            mode: controller.mode(),
            governance: *controller.governance(),
            messages: controller.messages().to_vec(),
            plan_decision,
            invocations,
            review: audit.review_summary(),
            insights: controller.insight_tracker().insights().to_vec(),
            versions: ledger.entries().to_vec(),
            active_version: ledger.active().id.clone(),
            events,
        }
    }
}

fn message_kind(message: &Message) -> String {
    match &message.phase {
        Some(PhaseMeta::Thinking { .. }) => "thinking".to_string(),
        Some(PhaseMeta::Summary { duration_ms, .. }) => {
            format!("summary ({:.1}s)", *duration_ms as f64 / 1000.0)
        }
        None => message.role.as_str().to_string(),
    }
}

impl CommandOutput for DemoOutput {
    fn to_human(&self) -> String {
        let mut out = format!(
            "Turn {} in {} mode ({} / {}, dry run: {}, privacy: {})\n\n",
            self.turn_id,
            self.mode,
            self.governance.provider,
            self.governance.model,
            self.governance.dry_run,
            self.governance.privacy_mode,
        );

        let mut messages = list_table(&["kind", "text"]);
        for message in &self.messages {
            messages.add_row(vec![message_kind(message), truncate(&message.text, 72)]);
        }
        out.push_str(&render_list("message", &messages, self.messages.len()));

        if let Some(decision) = &self.plan_decision {
            let _ = match decision {
                PlanDecision::Accepted { selected_step_ids } => write!(
                    out,
                    "\n\nPlan accepted: {}",
                    selected_step_ids.join(", ")
                ),
                PlanDecision::Skipped => write!(out, "\n\nPlan skipped"),
            };
        }

        if !self.invocations.is_empty() {
            let mut invocations = list_table(&["id", "tool", "state", "steps"]);
            for row in &self.invocations {
                invocations.add_row(vec![
                    row.id.clone(),
                    row.tool.clone(),
                    row.state.to_string(),
                    row.steps.to_string(),
                ]);
            }
            out.push_str("\n\n");
            out.push_str(&render_list("invocation", &invocations, self.invocations.len()));
            let _ = write!(
                out,
                "\nSteps: {} pending, {} approved, {} rejected",
                self.review.steps.pending, self.review.steps.approved, self.review.steps.rejected
            );

            let mut insights = list_table(&["id", "severity", "range", "title"]);
            for insight in &self.insights {
                insights.add_row(vec![
                    insight.id.clone(),
                    insight.severity.as_str().to_string(),
                    insight.range.clone(),
                    truncate(&insight.title, 48),
                ]);
            }
            out.push_str("\n\n");
            out.push_str(&render_list("insight", &insights, self.insights.len()));
        }

        let mut versions = list_table(&["id", "label", "active"]);
        for version in &self.versions {
            let active = if version.id == self.active_version { "*" } else { "" };
            versions.add_row(vec![
                version.id.to_string(),
                version.label.clone(),
                active.to_string(),
            ]);
        }
        out.push_str("\n\n");
        out.push_str(&render_list("version", &versions, self.versions.len()));
        let _ = write!(out, "\n\n{} events published", self.events.len());
        out
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: DemoArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let result = run(args, &config).await?;
    output(&result, json_mode);
    Ok(())
}

/// Run the demo turn against the scripted backend with the given config.
pub async fn run(args: DemoArgs, config: &Config) -> Result<DemoOutput> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIdGenerator::new());
    let backend: Arc<dyn AssistantBackend> = Arc::new(ScriptedBackend::new(Arc::clone(&clock)));

    let mut controller =
        ConversationController::from_config(config, Arc::clone(&backend), clock, ids);
    if let Some(mode) = args.mode.as_deref() {
        let mode = AssistMode::parse_str(mode).ok_or_else(|| anyhow!("Invalid mode: {mode}"))?;
        controller.set_mode(mode);
    }

    let controller = Arc::new(Mutex::new(controller));
    let bus = Arc::new(EventBus::new(config.event_bus));
    let mut rx = bus.subscribe();
    let driver = TurnDriver::new(Arc::clone(&controller), backend, config.timing, Arc::clone(&bus));

    let handle = driver.submit(&args.utterance).await?;
    handle.task.await.context("Turn task failed to run")??;

    let mut guard = controller.lock().await;
    let plan_decision = if guard.plan_proposal().is_active() {
        Some(if args.accept_plan {
            guard.accept_plan()?
        } else {
            guard.skip_plan()?
        })
    } else {
        None
    };
    if args.approve_all {
        let invocation_ids: Vec<String> = guard
            .audit_trail()
            .invocations()
            .iter()
            .map(|i| i.id.clone())
            .collect();
        for id in invocation_ids {
            guard.approve_invocation(&id)?;
        }
    }
    if args.commit {
        guard.commit();
    }
    bus.publish_all(guard.drain_events());

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    Ok(DemoOutput::capture(
        &guard,
        handle.turn_id.to_string(),
        plan_decision,
        events,
    ))
}
