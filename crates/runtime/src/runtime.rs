//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the world.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use creature_core::{CreatureConfig, WorldState};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::logging;
use crate::oracle::{OracleManager, StructureIndex};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
///
/// Every field has a default, so a RON file only needs the values it changes:
///
/// ```ron
/// (
///     world_seed: 42,
///     creature: (incap_threshold: 2),
///     log_filter: Some("creature_core=debug"),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub creature: CreatureConfig,
    /// Seed mixed into every deterministic roll (despawn delays).
    pub world_seed: u64,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// `EnvFilter` directive; when unset the runtime leaves logging alone.
    pub log_filter: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            creature: CreatureConfig::default(),
            world_seed: 0,
            event_buffer_size: 100,
            command_buffer_size: 32,
            log_filter: None,
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from RON text.
    pub fn from_ron_str(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| {
            RuntimeError::InvalidConfig(format!("Failed to parse runtime config RON: {}", e))
        })
    }

    /// Load configuration from a RON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::InvalidConfig(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_ron_str(&content)
    }
}

/// Main runtime that owns the simulation worker.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Build a runtime with an empty world and no structures.
    pub async fn start(config: RuntimeConfig) -> Result<Self> {
        Self::builder().config(config).build().await
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every cloned [`RuntimeHandle`] has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<WorldState>,
    structures: StructureIndex,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            structures: StructureIndex::default(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide an initial world; otherwise an empty one seeded from the config
    pub fn initial_state(mut self, state: WorldState) -> Self {
        self.state = Some(state);
        self
    }

    /// Buildings and installations searched when a player dies
    pub fn structures(mut self, structures: StructureIndex) -> Self {
        self.structures = structures;
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        if let Some(filter) = self.config.log_filter.as_deref() {
            logging::init_logging(Some(filter))?;
        }

        let state = self
            .state
            .unwrap_or_else(|| WorldState::new(self.config.world_seed));
        let oracles = OracleManager::new(self.config.creature, self.structures);

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());
        let sim_worker = SimulationWorker::new(state, oracles, command_rx, event_bus);

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creature_core::Millis;

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = RuntimeConfig::from_ron_str(
            "(world_seed: 42, creature: (incap_threshold: 2, base_incap_duration: (5000)))",
        )
        .unwrap();

        assert_eq!(config.world_seed, 42);
        assert_eq!(config.creature.incap_threshold, 2);
        assert_eq!(config.creature.base_incap_duration, Millis(5_000));
        assert_eq!(
            config.creature.forced_cloning_delay,
            CreatureConfig::DEFAULT_FORCED_CLONING_DELAY
        );
        assert_eq!(config.command_buffer_size, 32);
        assert_eq!(config.log_filter, None);
    }

    #[test]
    fn malformed_ron_is_invalid_config() {
        let err = RuntimeConfig::from_ron_str("(world_seed: \"nope\")").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidConfig(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.ron");
        std::fs::write(&path, "(event_buffer_size: 8, log_filter: Some(\"warn\"))").unwrap();

        let config = RuntimeConfig::from_file(&path).unwrap();
        assert_eq!(config.event_buffer_size, 8);
        assert_eq!(config.log_filter.as_deref(), Some("warn"));

        let missing = RuntimeConfig::from_file(dir.path().join("absent.ron"));
        assert!(matches!(missing, Err(RuntimeError::InvalidConfig(_))));
    }
}
