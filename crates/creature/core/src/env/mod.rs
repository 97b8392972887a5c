//! Collaborator traits consumed by the core.
//!
//! Everything the core needs from the outside world (configuration, randomness,
//! observers, timers, spatial lookups, AI hooks) is a trait. The [`Env`]
//! aggregate bundles borrowed implementations so operations can reach them
//! without global singletons.
mod config;
mod error;
mod notifier;
mod npc;
mod rng;
mod scheduler;
mod spatial;

pub use config::ConfigOracle;
pub use error::OracleError;
pub use notifier::{Notifier, SystemMessage};
pub use npc::{CloneDestination, CloneOption, CloneSelector, NpcBehavior};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use scheduler::{DestructionRegistry, ScheduleHandle, Scheduler, TimedEvent};
pub use spatial::{BuildingFamily, Structure, StructureKind, StructureOracle};

/// Borrowed collaborators for a single call into the core.
///
/// Missing collaborators are only an error when an operation actually needs
/// them, so tests can wire just what they exercise.
#[derive(Clone, Copy, Default)]
pub struct Env<'a> {
    config: Option<&'a dyn ConfigOracle>,
    rng: Option<&'a dyn RngOracle>,
    notifier: Option<&'a dyn Notifier>,
    scheduler: Option<&'a dyn Scheduler>,
    destruction: Option<&'a dyn DestructionRegistry>,
    structures: Option<&'a dyn StructureOracle>,
    npc: Option<&'a dyn NpcBehavior>,
    clone_selector: Option<&'a dyn CloneSelector>,
}

impl<'a> Env<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: &'a dyn ConfigOracle) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn with_notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_scheduler(mut self, scheduler: &'a dyn Scheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn with_destruction(mut self, destruction: &'a dyn DestructionRegistry) -> Self {
        self.destruction = Some(destruction);
        self
    }

    pub fn with_structures(mut self, structures: &'a dyn StructureOracle) -> Self {
        self.structures = Some(structures);
        self
    }

    pub fn with_npc(mut self, npc: &'a dyn NpcBehavior) -> Self {
        self.npc = Some(npc);
        self
    }

    pub fn with_clone_selector(mut self, selector: &'a dyn CloneSelector) -> Self {
        self.clone_selector = Some(selector);
        self
    }

    /// Returns the ConfigOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ConfigNotAvailable` if no config oracle was provided.
    pub fn config(&self) -> Result<&'a dyn ConfigOracle, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    pub fn notifier(&self) -> Result<&'a dyn Notifier, OracleError> {
        self.notifier.ok_or(OracleError::NotifierNotAvailable)
    }

    pub fn scheduler(&self) -> Result<&'a dyn Scheduler, OracleError> {
        self.scheduler.ok_or(OracleError::SchedulerNotAvailable)
    }

    pub fn destruction(&self) -> Result<&'a dyn DestructionRegistry, OracleError> {
        self.destruction.ok_or(OracleError::DestructionNotAvailable)
    }

    pub fn structures(&self) -> Result<&'a dyn StructureOracle, OracleError> {
        self.structures.ok_or(OracleError::StructuresNotAvailable)
    }

    pub fn npc(&self) -> Result<&'a dyn NpcBehavior, OracleError> {
        self.npc.ok_or(OracleError::NpcBehaviorNotAvailable)
    }

    pub fn clone_selector(&self) -> Result<&'a dyn CloneSelector, OracleError> {
        self.clone_selector
            .ok_or(OracleError::CloneSelectorNotAvailable)
    }
}

impl std::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("config", &self.config.is_some())
            .field("rng", &self.rng.is_some())
            .field("notifier", &self.notifier.is_some())
            .field("scheduler", &self.scheduler.is_some())
            .field("destruction", &self.destruction.is_some())
            .field("structures", &self.structures.is_some())
            .field("npc", &self.npc.is_some())
            .field("clone_selector", &self.clone_selector.is_some())
            .finish()
    }
}
