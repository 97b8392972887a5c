//! Authoritative world state.
//!
//! The state owns every creature and the world clock. Runtime layers query it
//! but mutate it exclusively through [`CreatureEngine`](crate::engine::CreatureEngine).
mod error;
pub mod types;

use std::collections::BTreeMap;

pub use error::StateError;
pub use types::{
    Capabilities, Classification, Creature, CreatureKind, CreatureState, CreoGroup, EffectId,
    EntityId, FactionTable, IncapState, Millis, NpcProfile, PlayerData, Position, Posture,
    RaceGenderMask,
};

/// All creatures of one world plus its clock.
#[derive(Clone, Debug, Default)]
pub struct WorldState {
    /// Seed for deterministic rolls. Set once and never modified.
    pub seed: u64,
    clock: Millis,
    creatures: BTreeMap<EntityId, Creature>,
    /// Next effect id to hand out. Never reused; 0 is reserved for unattached effects.
    next_effect_id: u64,
}

impl WorldState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            clock: Millis::ZERO,
            creatures: BTreeMap::new(),
            next_effect_id: 1,
        }
    }

    #[inline]
    pub fn clock(&self) -> Millis {
        self.clock
    }

    /// Moves the clock forward. Time never runs backwards.
    pub fn advance_clock(&mut self, to: Millis) {
        self.clock = self.clock.max(to);
    }

    /// Adds a creature to the world.
    ///
    /// # Errors
    ///
    /// Returns `StateError::DuplicateEntity` if the id is already taken.
    pub fn spawn(&mut self, creature: Creature) -> Result<(), StateError> {
        if self.creatures.contains_key(&creature.id) {
            return Err(StateError::DuplicateEntity(creature.id));
        }
        self.creatures.insert(creature.id, creature);
        Ok(())
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Creature> {
        self.creatures.remove(&id)
    }

    pub fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    /// Like [`creature`](Self::creature) but reports a missing id as an error.
    pub fn require(&self, id: EntityId) -> Result<&Creature, StateError> {
        self.creature(id).ok_or(StateError::CreatureNotFound(id))
    }

    pub fn require_mut(&mut self, id: EntityId) -> Result<&mut Creature, StateError> {
        self.creature_mut(id).ok_or(StateError::CreatureNotFound(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.creatures.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values()
    }

    pub(crate) fn allocate_effect_id(&mut self) -> EffectId {
        let id = EffectId(self.next_effect_id.max(1));
        self.next_effect_id = id.0 + 1;
        id
    }
}
