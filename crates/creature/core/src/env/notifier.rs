//! Observer notifications.
//!
//! The core never serializes or broadcasts anything itself. Every visible
//! change is reported through [`Notifier`] after the state has been updated, so
//! an implementation may read the creature it is handed to build its message.

use crate::state::{Creature, EntityId};

/// Localized system message, addressed as `@file:key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemMessage {
    pub file: &'static str,
    pub key: &'static str,
}

impl SystemMessage {
    pub const fn new(file: &'static str, key: &'static str) -> Self {
        Self { file, key }
    }

    /// Sent to a player when they die.
    pub const VICTIM_DEAD: Self = Self::new("base_player", "victim_dead");
    /// Sent to a player whose buff was not stacked.
    pub const BUFF_NOT_STACKED: Self = Self::new("base_player", "buff_not_stacked");
}

impl std::fmt::Display for SystemMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}:{}", self.file, self.key)
    }
}

/// Fire-and-forget sink for state changes observers must see.
pub trait Notifier: Send + Sync {
    /// Posture and state flags changed.
    fn notify_posture(&self, creature: &Creature);

    /// Current locomotion limits changed. Only sent to players.
    fn notify_movement_profile(&self, creature: &Creature);

    /// Incapacitation timer was set or cleared.
    fn notify_incap_timer(&self, creature: &Creature);

    /// State flags changed without a posture change (e.g. leaving combat).
    fn notify_combat_state(&self, creature: &Creature);

    /// `removed` left the defender list of `creature` at position `index`.
    fn notify_defender_change(&self, creature: &Creature, index: usize, removed: EntityId);

    /// Tells `observer` about the hostility status of `subject`.
    fn notify_pvp_status(&self, subject: EntityId, observer: EntityId);

    fn notify_system_message(&self, player: EntityId, message: SystemMessage);

    /// Full modifier table for a player client.
    fn notify_skill_mods_baseline(&self, creature: &Creature);
}
