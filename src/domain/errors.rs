//! Domain errors for the sheetwright session core.

use thiserror::Error;

use super::models::turn::{TurnId, TurnPhase};

/// Coarse error classes reported to callers of the session core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or an id that does not exist.
    InvalidArgument,
    /// The operation is well-formed but not permitted in the current state.
    PolicyViolation,
}

/// Errors returned by session operations.
///
/// A rejected operation never leaves partial mutations behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Turn {turn_id} cannot move from {from} to {to}")]
    InvalidTransition {
        turn_id: TurnId,
        from: TurnPhase,
        to: TurnPhase,
    },
}

impl SessionError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::NotFound { .. } => ErrorKind::InvalidArgument,
            Self::PolicyViolation(_) | Self::InvalidTransition { .. } => ErrorKind::PolicyViolation,
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_invalid_argument() {
        let err = SessionError::not_found("Snapshot", "v_9");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "Snapshot not found: v_9");
    }

    #[test]
    fn test_transition_is_policy_violation() {
        let err = SessionError::InvalidTransition {
            turn_id: TurnId::from("t_1"),
            from: TurnPhase::Submitted,
            to: TurnPhase::Complete,
        };
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
        assert_eq!(
            err.to_string(),
            "Turn t_1 cannot move from submitted to complete"
        );
    }
}
