//! State management errors.

use crate::error::{CoreError, ErrorSeverity};
use crate::state::EntityId;

/// Errors raised while adding, finding or removing creatures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),

    #[error("creature {0} not found")]
    CreatureNotFound(EntityId),
}

impl CoreError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn entity(&self) -> Option<EntityId> {
        match self {
            StateError::DuplicateEntity(id) | StateError::CreatureNotFound(id) => Some(*id),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StateError::DuplicateEntity(_) => "STATE_DUPLICATE_ENTITY",
            StateError::CreatureNotFound(_) => "STATE_CREATURE_NOT_FOUND",
        }
    }
}
