pub mod audit;
pub mod config;
pub mod insight;
pub mod message;
pub mod plan;
pub mod settings;
pub mod turn;
pub mod version;

pub use audit::{
    ApprovalState, AuditInvocation, AuditStep, ExecutionProgress, Formula, RANGE_NOT_APPLICABLE,
};
pub use config::{Config, EventBusConfig, LoggingConfig, TimingConfig};
pub use insight::{Insight, InsightStatus, Severity};
pub use message::{Message, MessageId, PhaseMeta, Role, SUMMARY_TEXT, THINKING_TEXT};
pub use plan::PlanStep;
pub use settings::{GovernanceSettings, Model, Provider};
pub use turn::{AssistMode, Turn, TurnCompletion, TurnId, TurnPhase};
pub use version::{SnapshotId, VersionSnapshot, BASELINE_LABEL};
