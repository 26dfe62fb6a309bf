/// Assistant backend port (trait) for dependency injection.
///
/// The model backend that produces plans, audit trails, insights and turn
/// text lives outside the session core. The core only consumes its outputs
/// through this trait and never computes them.
use crate::domain::models::{AuditInvocation, Insight, PlanStep, TurnCompletion, TurnId};

/// Producer of turn-scoped proposals and completion text.
///
/// Calls are synchronous: the session core installs plan, audit trail and
/// insights inside `submit`, before the thinking phase starts.
pub trait AssistantBackend: Send + Sync {
    /// Proposed plan for an analyst request.
    fn request_plan(&self, utterance: &str) -> Vec<PlanStep>;

    /// Tool invocations performed for an analyst request.
    fn request_audit_trail(&self, utterance: &str) -> Vec<AuditInvocation>;

    /// Fresh issue scan of the current document.
    fn request_insights(&self) -> Vec<Insight>;

    /// Text delivered for a turn.
    ///
    /// The driver hands `interim_text` to the thinking → summarizing
    /// callback and the rest to the summarizing → complete callback.
    fn request_turn_completion(&self, turn_id: &TurnId) -> TurnCompletion;
}
