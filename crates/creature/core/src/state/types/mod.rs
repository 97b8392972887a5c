//! Plain data types that make up the world state.
mod common;
mod creature;
mod faction;
mod kind;
mod posture;

pub use common::{EffectId, EntityId, Millis, Position};
pub use creature::{Creature, IncapState};
pub use faction::FactionTable;
pub use kind::{
    Capabilities, Classification, CreatureKind, CreoGroup, NpcProfile, PlayerData, RaceGenderMask,
};
pub use posture::{CreatureState, Posture};
