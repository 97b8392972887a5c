//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, configuration loading and the
//! core engine so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use creature_core::{CoreError, EngineError, ErrorSeverity};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(String),
}

impl RuntimeError {
    /// Severity of the underlying core error; plumbing failures are fatal.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Engine(err) => err.severity(),
            RuntimeError::InvalidConfig(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Fatal,
        }
    }
}

/// Converts any core error into a [`RuntimeError`].
pub(crate) fn engine_error(err: impl Into<EngineError>) -> RuntimeError {
    RuntimeError::Engine(err.into())
}
