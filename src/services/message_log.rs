//! Ordered conversation log.
//!
//! Messages are ordered by insertion, which may differ from the order their
//! turns were submitted in. Phase-tagged messages are correlated to their
//! turn by id, never by position.

use crate::domain::models::{Message, MessageId, PhaseMeta, TurnId};
use crate::domain::{SessionError, SessionResult};

/// Result of installing a turn's summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPlacement {
    /// The turn's thinking message was replaced at this index
    Replaced(usize),
    /// No thinking message was found; the summary was appended at this index
    Appended(usize),
}

#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Index of the thinking message of `turn_id`.
    pub fn thinking_index(&self, turn_id: &TurnId) -> Option<usize> {
        self.messages
            .iter()
            .position(|m| m.thinking_turn() == Some(turn_id))
    }

    /// Replace the thinking message of the summary's turn in place, or append
    /// the summary when that turn has no thinking message.
    pub fn install_summary(&mut self, summary: Message) -> SummaryPlacement {
        let index = summary
            .summary_turn()
            .and_then(|turn_id| self.thinking_index(turn_id));
        match index {
            Some(i) => {
                self.messages[i] = summary;
                SummaryPlacement::Replaced(i)
            }
            None => {
                self.messages.push(summary);
                SummaryPlacement::Appended(self.messages.len() - 1)
            }
        }
    }

    /// Flip the `expanded` flag of a summary message; returns the new value.
    pub fn toggle_summary(&mut self, id: &MessageId) -> SessionResult<bool> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| SessionError::not_found("Message", id.as_str()))?;
        match &mut message.phase {
            Some(PhaseMeta::Summary { expanded, .. }) => {
                *expanded = !*expanded;
                Ok(*expanded)
            }
            _ => Err(SessionError::InvalidArgument(format!(
                "message {id} is not a thought summary"
            ))),
        }
    }
}
