//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the single owner of the world; every mutation is
//! serialized through its command channel.

mod simulation;

pub use simulation::{AdvanceReport, Command, SimulationWorker};
