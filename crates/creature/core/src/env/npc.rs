//! Hooks into AI behaviour and player-facing selection.

use crate::state::EntityId;

/// Side effects owned by the AI layer.
pub trait NpcBehavior: Send + Sync {
    /// The creature has no defenders left and should return to its idle routine.
    fn enter_peaceful(&self, creature: EntityId);

    fn play_death_animation(&self, creature: EntityId);

    /// Hands out experience to everyone who damaged `creature`.
    fn distribute_attacker_xp(&self, creature: EntityId);
}

/// Which facility a clone option points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CloneDestination {
    Closest,
    Bound,
}

impl CloneDestination {
    /// Localized label shown in the selection list.
    pub const fn label(self) -> &'static str {
        match self {
            CloneDestination::Closest => "@base_player:revive_closest",
            CloneDestination::Bound => "@base_player:revive_bind",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CloneOption {
    pub facility: EntityId,
    pub destination: CloneDestination,
}

/// Presents a dead player with cloning destinations.
pub trait CloneSelector: Send + Sync {
    /// `options` is never empty; the closest facility comes before the bound one.
    fn present_clone_selection(&self, player: EntityId, options: &[CloneOption]);
}
