//! Oracle access errors.
//!
//! Errors related to collaborator availability.

use crate::error::{CoreError, ErrorSeverity};

/// A collaborator required by an operation was not injected into the [`Env`](super::Env).
///
/// The core cannot proceed without the collaborator, so these are fatal wiring
/// errors rather than gameplay conditions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("ConfigOracle not available")]
    ConfigNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("Notifier not available")]
    NotifierNotAvailable,

    #[error("Scheduler not available")]
    SchedulerNotAvailable,

    #[error("DestructionRegistry not available")]
    DestructionNotAvailable,

    #[error("StructureOracle not available")]
    StructuresNotAvailable,

    #[error("NpcBehavior not available")]
    NpcBehaviorNotAvailable,

    #[error("CloneSelector not available")]
    CloneSelectorNotAvailable,
}

impl CoreError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ConfigNotAvailable => "ORACLE_CONFIG_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            NotifierNotAvailable => "ORACLE_NOTIFIER_NOT_AVAILABLE",
            SchedulerNotAvailable => "ORACLE_SCHEDULER_NOT_AVAILABLE",
            DestructionNotAvailable => "ORACLE_DESTRUCTION_NOT_AVAILABLE",
            StructuresNotAvailable => "ORACLE_STRUCTURES_NOT_AVAILABLE",
            NpcBehaviorNotAvailable => "ORACLE_NPC_BEHAVIOR_NOT_AVAILABLE",
            CloneSelectorNotAvailable => "ORACLE_CLONE_SELECTOR_NOT_AVAILABLE",
        }
    }
}
