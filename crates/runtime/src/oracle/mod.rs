//! Runtime wrappers around static world data.
//!
//! These implementations expose `creature-core` oracle traits and bundle them
//! into an [`OracleManager`] so the runtime can build [`creature_core::Env`]
//! snapshots on demand. The data is immutable while the worker runs; the
//! side-effecting collaborators live in [`crate::services`].
mod structures;

use std::sync::Arc;

use creature_core::{CreatureConfig, Env, PcgRng};

use crate::services::{BusNotifier, TimerWheel};

pub use structures::StructureIndex;

/// Manages all oracle implementations and provides unified access
#[derive(Clone, Debug)]
pub struct OracleManager {
    pub(crate) config: Arc<CreatureConfig>,
    pub(crate) structures: Arc<StructureIndex>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(config: CreatureConfig, structures: StructureIndex) -> Self {
        Self {
            config: Arc::new(config),
            structures: Arc::new(structures),
            rng: PcgRng, // PcgRng is stateless
        }
    }

    pub fn config(&self) -> &CreatureConfig {
        &self.config
    }

    pub fn structures(&self) -> &StructureIndex {
        &self.structures
    }

    /// Wires static data and runtime services into a core [`Env`].
    pub fn as_env<'a>(&'a self, notifier: &'a BusNotifier, timers: &'a TimerWheel) -> Env<'a> {
        Env::empty()
            .with_config(self.config.as_ref())
            .with_rng(&self.rng)
            .with_structures(self.structures.as_ref())
            .with_notifier(notifier)
            .with_npc(notifier)
            .with_clone_selector(notifier)
            .with_scheduler(timers)
            .with_destruction(timers)
    }
}

impl Default for OracleManager {
    fn default() -> Self {
        Self::new(CreatureConfig::default(), StructureIndex::default())
    }
}
