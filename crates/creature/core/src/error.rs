//! Common error infrastructure for creature-core.
//!
//! Domain-specific errors (e.g., `VitalityError`, `CombatError`) live next to the
//! operations that raise them. This module provides the shared classification
//! used by callers to decide how loudly to react.
//!
//! # Error Taxonomy
//!
//! - **Logic violations** (duplicate defender, clearing an empty ledger, adjusting an
//!   unregistered modifier) are not errors. They are logged and the operation
//!   returns a boolean or outcome value.
//! - **Unresolvable references** (unknown entity id, unsupported classification) are
//!   `Validation` errors. The call aborts before touching state.
//! - **Missing collaborators** (no notifier or scheduler in the `Env`) are `Fatal`.

use crate::state::EntityId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same request may succeed later.
    ///
    /// Examples: entity is in a posture that rejects the transition
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: entity not found, unsupported classification
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// These indicate bugs and should be investigated.
    Internal,

    /// Unrecoverable wiring problem.
    ///
    /// Examples: a required collaborator was not injected
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or broken wiring.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all creature-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CoreError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the entity the error is about, if any.
    fn entity(&self) -> Option<EntityId> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics and for matching in tests without comparing messages.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(ErrorSeverity::Internal.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
