//! Event types for different topics.

use creature_core::{CloneOption, CreatureState, EntityId, Locomotion, Millis, Posture};
use serde::{Deserialize, Serialize};

/// Changes to a single creature's own state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CreatureEvent {
    PostureChanged {
        entity: EntityId,
        posture: Posture,
    },

    /// Resolved locomotion after a posture change (players only)
    MovementChanged {
        entity: EntityId,
        locomotion: Locomotion,
    },

    /// Incapacitation countdown; zero when the timer was cleared
    IncapTimer { entity: EntityId, duration: Millis },

    /// Full modifier table resent to a player
    SkillModsBaseline {
        entity: EntityId,
        modifiers: Vec<(String, i32)>,
    },

    /// A corpse reached its despawn time and left the world
    Despawned { entity: EntityId },
}

/// Events related to engagement between creatures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    StateChanged {
        entity: EntityId,
        state: CreatureState,
    },

    /// `defender` left the ledger of `entity` at position `index`
    DefenderRemoved {
        entity: EntityId,
        index: usize,
        defender: EntityId,
    },

    /// `observer` should refresh how it sees `subject`
    PvpStatus {
        subject: EntityId,
        observer: EntityId,
    },

    EnteredPeace { entity: EntityId },

    DeathAnimation { entity: EntityId },

    AttackerXpAwarded { entity: EntityId },
}

/// Messages addressed to one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Localized system message, e.g. `@base_player:victim_dead`
    SystemMessage { player: EntityId, message: String },

    CloneSelection {
        player: EntityId,
        options: Vec<CloneOption>,
    },

    /// The player never chose a facility and is cloned at the nearest one
    ForcedCloning {
        player: EntityId,
        facility: Option<EntityId>,
    },
}
