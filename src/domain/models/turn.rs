//! Turn domain model.
//!
//! A turn is one user request/response cycle. Its phase only ever moves
//! forward: submitted, thinking, summarizing, complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub String);

impl TurnId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TurnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session mode. `Analyst` is the elevated mode in which a turn also
/// produces a plan, an audit trail and an insight scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistMode {
    /// Plain conversational mode
    Ask,
    /// Elevated mode
    Analyst,
}

impl Default for AssistMode {
    fn default() -> Self {
        Self::Ask
    }
}

impl AssistMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::Analyst => "analyst",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ask" => Some(Self::Ask),
            "analyst" => Some(Self::Analyst),
            _ => None,
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Analyst)
    }
}

impl fmt::Display for AssistMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Submitted,
    Thinking,
    Summarizing,
    Complete,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Thinking => "thinking",
            Self::Summarizing => "summarizing",
            Self::Complete => "complete",
        }
    }

    /// The only phase this one may advance to, if any.
    pub fn successor(&self) -> Option<Self> {
        match self {
            Self::Submitted => Some(Self::Thinking),
            Self::Thinking => Some(Self::Summarizing),
            Self::Summarizing => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    pub fn can_transition_to(&self, next: Self) -> bool {
        self.successor() == Some(next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user request/response cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    /// The utterance that opened this turn
    pub utterance: String,
    pub started_at: DateTime<Utc>,
    /// Whether the turn was opened in elevated mode
    pub elevated: bool,
    pub phase: TurnPhase,
    /// Every phase this turn has been in, in order
    pub phase_history: Vec<TurnPhase>,
    /// Monotonic clock reading taken on entering `thinking`
    pub thinking_started_ms: Option<u64>,
    /// Thinking duration, set on completion
    pub thinking_duration_ms: Option<u64>,
}

impl Turn {
    pub fn new(id: TurnId, utterance: String, started_at: DateTime<Utc>, elevated: bool) -> Self {
        Self {
            id,
            utterance,
            started_at,
            elevated,
            phase: TurnPhase::Submitted,
            phase_history: vec![TurnPhase::Submitted],
            thinking_started_ms: None,
            thinking_duration_ms: None,
        }
    }

    /// Move to `next` if it is the direct successor of the current phase.
    ///
    /// Returns the previous phase on success.
    pub fn advance(&mut self, next: TurnPhase) -> Result<TurnPhase, TurnPhase> {
        if !self.phase.can_transition_to(next) {
            return Err(self.phase);
        }
        let previous = self.phase;
        self.phase = next;
        self.phase_history.push(next);
        Ok(previous)
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// Content delivered by the backend for one turn.
///
/// `interim_text` arrives with the thinking → summarizing signal; the
/// final text and reasoning log arrive with summarizing → complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCompletion {
    pub interim_text: String,
    pub final_text: String,
    pub reasoning_log: Vec<String>,
}
