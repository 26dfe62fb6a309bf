//! Conversation message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::turn::TurnId;

/// Text shown while a turn is thinking.
pub const THINKING_TEXT: &str = "Thinking...";

/// Text carried by the summary that replaces a thinking message.
pub const SUMMARY_TEXT: &str = "Thought summary";

/// Identifier of a message in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
        }
    }
}

/// Phase tag attached to thinking and summary messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseMeta {
    /// Placeholder shown while the turn is thinking
    Thinking { turn_id: TurnId },
    /// Collapsible summary that replaces the placeholder
    Summary {
        turn_id: TurnId,
        duration_ms: u64,
        expanded: bool,
        log_lines: Vec<String>,
    },
}

impl PhaseMeta {
    pub fn turn_id(&self) -> &TurnId {
        match self {
            Self::Thinking { turn_id } | Self::Summary { turn_id, .. } => turn_id,
        }
    }
}

/// One conversation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<PhaseMeta>,
}

impl Message {
    pub fn user(id: MessageId, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            role: Role::User,
            text: text.into(),
            created_at,
            phase: None,
        }
    }

    pub fn system(id: MessageId, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            role: Role::System,
            text: text.into(),
            created_at,
            phase: None,
        }
    }

    pub fn thinking(id: MessageId, turn_id: TurnId, created_at: DateTime<Utc>) -> Self {
        Self {
            phase: Some(PhaseMeta::Thinking { turn_id }),
            ..Self::system(id, THINKING_TEXT, created_at)
        }
    }

    pub fn summary(
        id: MessageId,
        turn_id: TurnId,
        duration_ms: u64,
        log_lines: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            phase: Some(PhaseMeta::Summary {
                turn_id,
                duration_ms,
                expanded: false,
                log_lines,
            }),
            ..Self::system(id, SUMMARY_TEXT, created_at)
        }
    }

    /// Turn id if this is the thinking placeholder of that turn.
    pub fn thinking_turn(&self) -> Option<&TurnId> {
        match &self.phase {
            Some(PhaseMeta::Thinking { turn_id }) => Some(turn_id),
            _ => None,
        }
    }

    /// Turn id if this is the summary of that turn.
    pub fn summary_turn(&self) -> Option<&TurnId> {
        match &self.phase {
            Some(PhaseMeta::Summary { turn_id, .. }) => Some(turn_id),
            _ => None,
        }
    }

    pub fn is_summary(&self) -> bool {
        self.summary_turn().is_some()
    }
}
