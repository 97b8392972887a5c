//! The creature aggregate.

use crate::buffs::ActiveBuffs;
use crate::combat::DefenderLedger;
use crate::customization::Customization;
use crate::env::ScheduleHandle;
use crate::movement::{Locomotion, MovementProfile};
use crate::skills::SkillSet;

use super::{
    Classification, CreatureKind, CreatureState, EntityId, FactionTable, Millis, NpcProfile,
    PlayerData, Position, Posture, RaceGenderMask,
};

/// Incapacitation bookkeeping for the escalation rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncapState {
    /// Incapacitations in the current streak.
    pub count: u32,
    /// World time of the first incapacitation of the streak.
    pub first_incap_at: Millis,
    /// Length of the running incapacitation; zero when not incapacitated.
    pub current_duration: Millis,
    /// Pending recovery callback. A recovery firing with any other handle is stale.
    pub recovery: Option<ScheduleHandle>,
}

impl IncapState {
    /// Clears the streak and returns the recovery handle that must be cancelled.
    pub fn reset(&mut self) -> Option<ScheduleHandle> {
        self.count = 0;
        self.first_incap_at = Millis::ZERO;
        self.current_duration = Millis::ZERO;
        self.recovery.take()
    }
}

/// A living (or dead) entity in the world.
///
/// Posture is private so that every transition goes through
/// [`change_posture`](Self::change_posture), which keeps the movement profile in
/// step with it.
#[derive(Clone, Debug)]
pub struct Creature {
    pub id: EntityId,
    /// Owning player for pets and vehicles.
    pub owner: Option<EntityId>,
    pub kind: CreatureKind,
    pub position: Position,
    posture: Posture,
    pub state: CreatureState,
    pub incap: IncapState,
    movement: MovementProfile,
    pub skills: SkillSet,
    pub factions: FactionTable,
    pub defenders: DefenderLedger,
    pub buffs: ActiveBuffs,
    pub customization: Customization,
    /// Health/action/mind regeneration task started by the caller, if running.
    pub regen_task: Option<ScheduleHandle>,
    pub equipped_weapon: Option<EntityId>,
}

impl Creature {
    pub fn new(id: EntityId, kind: CreatureKind) -> Self {
        Self {
            id,
            owner: None,
            kind,
            position: Position::ORIGIN,
            posture: Posture::Upright,
            state: CreatureState::empty(),
            incap: IncapState::default(),
            movement: MovementProfile::default(),
            skills: SkillSet::new(),
            factions: FactionTable::new(),
            defenders: DefenderLedger::new(),
            buffs: ActiveBuffs::new(),
            customization: Customization::new(),
            regen_task: None,
            equipped_weapon: None,
        }
    }

    pub fn player(id: EntityId, data: PlayerData) -> Self {
        Self::new(id, CreatureKind::Player(data))
    }

    pub fn npc(id: EntityId, profile: NpcProfile) -> Self {
        Self::new(id, CreatureKind::Creature(profile))
    }

    pub fn vehicle(id: EntityId, owner: EntityId) -> Self {
        Self {
            owner: Some(owner),
            ..Self::new(id, CreatureKind::Vehicle)
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_locomotion(mut self, base: Locomotion) -> Self {
        self.movement.set_base(base, self.posture);
        self
    }

    pub fn with_posture(mut self, posture: Posture) -> Self {
        self.change_posture(posture);
        self
    }

    pub fn with_weapon(mut self, weapon: EntityId) -> Self {
        self.equipped_weapon = Some(weapon);
        self
    }

    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.customization = customization;
        self
    }

    #[inline]
    pub fn posture(&self) -> Posture {
        self.posture
    }

    pub fn movement(&self) -> &MovementProfile {
        &self.movement
    }

    /// Replaces the base locomotion limits; current limits follow the posture.
    pub fn set_locomotion(&mut self, base: Locomotion) {
        self.movement.set_base(base, self.posture);
    }

    /// Sets the posture and re-resolves the movement profile.
    ///
    /// Callers notify observers afterwards.
    pub(crate) fn change_posture(&mut self, posture: Posture) {
        self.posture = posture;
        self.movement.update(posture);
    }

    pub fn classification(&self) -> Classification {
        self.kind.classification()
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        matches!(self.kind, CreatureKind::Player(_))
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        match &self.kind {
            CreatureKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            CreatureKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn npc_profile(&self) -> Option<&NpcProfile> {
        match &self.kind {
            CreatureKind::Creature(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_female(&self) -> bool {
        self.player_data().is_some_and(|player| player.female)
    }

    /// Race/gender mask for players; empty for everything else.
    pub fn race_gender_mask(&self) -> RaceGenderMask {
        self.player_data()
            .map(|player| RaceGenderMask::compute(player.race_id, player.female, player.jedi))
            .unwrap_or_default()
    }

    /// Serialized appearance sent to clients.
    pub fn customization_bytes(&self) -> Vec<u8> {
        self.customization.encode(self.is_female())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Locomotion = Locomotion::new(5.75, 1.5, 1.0, 1.0);

    #[test]
    fn posture_changes_refresh_movement() {
        let mut creature = Creature::npc(EntityId(1), NpcProfile::npc()).with_locomotion(BASE);
        assert_eq!(*creature.movement().current(), BASE);

        creature.change_posture(Posture::Sitting);
        assert_eq!(*creature.movement().current(), Locomotion::HALTED);

        creature.change_posture(Posture::Upright);
        assert_eq!(*creature.movement().current(), BASE);
    }

    #[test]
    fn incap_reset_hands_back_recovery() {
        let mut incap = IncapState {
            count: 2,
            first_incap_at: Millis(10),
            current_duration: Millis(10_000),
            recovery: Some(ScheduleHandle(4)),
        };
        assert_eq!(incap.reset(), Some(ScheduleHandle(4)));
        assert_eq!(incap, IncapState::default());
    }

    #[test]
    fn only_players_have_a_race_mask() {
        let player = Creature::player(EntityId(1), PlayerData::new(0, true));
        assert_eq!(
            player.race_gender_mask(),
            RaceGenderMask::HUMAN | RaceGenderMask::FEMALE
        );
        let vehicle = Creature::vehicle(EntityId(2), EntityId(1));
        assert!(vehicle.race_gender_mask().is_empty());
        assert_eq!(vehicle.owner, Some(EntityId(1)));
    }
}
