//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for every
//! creature operation plus event subscription by topic.
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use creature_core::{
    ApplyMode, ApplyOutcome, Buff, Creature, DeathReport, EffectId, EntityId, IncapOutcome, Millis,
    PeaceOutcome, Posture, Skill,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{AdvanceReport, Command};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Add a creature to the world
    pub async fn spawn(&self, creature: Creature) -> Result<()> {
        self.request(|reply| Command::Spawn {
            creature: Box::new(creature),
            reply,
        })
        .await?
    }

    /// Learn a skill and rebuild the creature's modifiers and commands
    pub async fn learn_skill(&self, entity: EntityId, skill: Arc<Skill>) -> Result<bool> {
        self.request(|reply| Command::LearnSkill {
            entity,
            skill,
            reply,
        })
        .await?
    }

    /// Put two creatures into combat with each other
    pub async fn engage(&self, attacker: EntityId, defender: EntityId) -> Result<bool> {
        self.request(|reply| Command::Engage {
            attacker,
            defender,
            reply,
        })
        .await?
    }

    pub async fn make_peace(&self, attacker: EntityId, defender: EntityId) -> Result<PeaceOutcome> {
        self.request(|reply| Command::MakePeace {
            attacker,
            defender,
            reply,
        })
        .await?
    }

    pub async fn incap(&self, entity: EntityId) -> Result<IncapOutcome> {
        self.request(|reply| Command::Incap { entity, reply }).await?
    }

    pub async fn kill(&self, entity: EntityId) -> Result<DeathReport> {
        self.request(|reply| Command::Kill { entity, reply }).await?
    }

    /// Change posture on an external trigger; returns the previous posture
    pub async fn set_posture(&self, entity: EntityId, posture: Posture) -> Result<Posture> {
        self.request(|reply| Command::SetPosture {
            entity,
            posture,
            reply,
        })
        .await?
    }

    pub async fn apply_buff(
        &self,
        target: EntityId,
        buff: Buff,
        mode: ApplyMode,
    ) -> Result<ApplyOutcome> {
        self.request(|reply| Command::ApplyBuff {
            target,
            buff: Box::new(buff),
            mode,
            reply,
        })
        .await?
    }

    pub async fn remove_buff(&self, target: EntityId, effect: EffectId) -> Result<bool> {
        self.request(|reply| Command::RemoveBuff {
            target,
            effect,
            reply,
        })
        .await?
    }

    /// Move world time forward to `to`, firing every timer that comes due
    pub async fn advance_to(&self, to: Millis) -> Result<AdvanceReport> {
        self.request(|reply| Command::Advance { to, reply }).await
    }

    /// Snapshot of a creature, if it is still in the world
    pub async fn creature(&self, entity: EntityId) -> Result<Option<Creature>> {
        self.request(|reply| Command::QueryCreature { entity, reply })
            .await
    }

    pub async fn clock(&self) -> Result<Millis> {
        self.request(|reply| Command::QueryClock { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Creature` - Posture, movement, incap timer, skill mods, despawn
    /// - `Topic::Combat` - Combat flags, defender changes, PvP refreshes, peace
    /// - `Topic::Player` - System messages, clone selection, forced cloning
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
