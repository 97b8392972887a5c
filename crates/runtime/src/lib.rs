//! Runtime orchestration for the creature lifecycle.
//!
//! This crate is the imperative shell around `creature-core`. A single
//! simulation worker owns the world and serializes every mutation; timers,
//! despawns and observer notifications are provided as concrete services.
//! Consumers embed [`Runtime`] and interact with the world through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`services`] implements the core's notifier, scheduler and despawn queue
//! - [`oracle`] provides static world data adapters
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod logging;
pub mod oracle;
pub mod runtime;
pub mod services;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{CombatEvent, CreatureEvent, Event, EventBus, PlayerEvent, Topic};
pub use logging::init_logging;
pub use oracle::{OracleManager, StructureIndex};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use services::{BusNotifier, TimerKind, TimerWheel};
pub use workers::AdvanceReport;
