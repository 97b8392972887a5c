//! Creature classification.
//!
//! Every decision point that used to probe the concrete object type now matches
//! once on [`CreatureKind`] and reads the capability set carried by the variant.

use bitflags::bitflags;

use super::EntityId;

/// Coarse classification used for logs and for the incap rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Classification {
    Player,
    Creature,
    Vehicle,
}

/// Tagged classification with the data each class needs.
#[derive(Clone, Debug, PartialEq)]
pub enum CreatureKind {
    Player(PlayerData),
    Creature(NpcProfile),
    Vehicle,
}

impl CreatureKind {
    pub fn classification(&self) -> Classification {
        match self {
            CreatureKind::Player(_) => Classification::Player,
            CreatureKind::Creature(_) => Classification::Creature,
            CreatureKind::Vehicle => Classification::Vehicle,
        }
    }
}

/// Spawn group of a non-player creature; drives corpse disposition.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CreoGroup {
    #[default]
    Standard,
    /// Simple attackable object (crates, turrets); removed almost immediately.
    AttackableObject,
    /// Armed creature that drops its weapon on death.
    AttackableCreature,
}

bitflags! {
    /// Optional behaviours a non-player creature exposes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        /// Driven by AI; hands out experience to its attackers on death.
        const NPC             = 1 << 0;
        /// Has a death animation to play when killed.
        const DEATH_ANIMATION = 1 << 1;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcProfile {
    pub group: CreoGroup,
    pub capabilities: Capabilities,
}

impl NpcProfile {
    pub fn new(group: CreoGroup, capabilities: Capabilities) -> Self {
        Self {
            group,
            capabilities,
        }
    }

    /// Plain AI-driven creature.
    pub fn npc() -> Self {
        Self::new(CreoGroup::Standard, Capabilities::NPC)
    }
}

/// Player-only data touched by the death cascade.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerData {
    pub female: bool,
    pub jedi: bool,
    pub race_id: u32,
    /// Players this player is currently dueling.
    pub duel_list: Vec<EntityId>,
    /// Facility the player bound to for cloning.
    pub predesignated_cloning_facility: Option<EntityId>,
    /// Nearest facility found at the last death; target of forced cloning.
    pub nearest_cloning_facility: Option<EntityId>,
}

impl PlayerData {
    pub fn new(race_id: u32, female: bool) -> Self {
        Self {
            race_id,
            female,
            ..Self::default()
        }
    }

    pub fn check_duel_list(&self, id: EntityId) -> bool {
        self.duel_list.contains(&id)
    }

    pub fn add_to_duel_list(&mut self, id: EntityId) {
        if !self.check_duel_list(id) {
            self.duel_list.push(id);
        }
    }

    pub fn remove_from_duel_list(&mut self, id: EntityId) -> bool {
        match self.duel_list.iter().position(|entry| *entry == id) {
            Some(index) => {
                self.duel_list.remove(index);
                true
            }
            None => false,
        }
    }
}

bitflags! {
    /// Race, gender and jedi bits used by content restrictions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RaceGenderMask: u32 {
        const FEMALE      = 0x0001;
        const MALE        = 0x0002;
        const HUMAN       = 0x0004;
        const RODIAN      = 0x0008;
        const TRANDOSHAN  = 0x0010;
        const MON_CALAMARI = 0x0020;
        const WOOKIEE     = 0x0040;
        const BOTHAN      = 0x0080;
        const TWILEK      = 0x0100;
        const ZABRAK      = 0x0200;
        const ITHORIAN    = 0x0400;
        const SULLUSTAN   = 0x0800;
        const JEDI        = 0x1000;
    }
}

impl RaceGenderMask {
    /// Builds the mask for a race id; unknown races contribute no race bit.
    pub fn compute(race_id: u32, female: bool, jedi: bool) -> Self {
        let race = match race_id {
            0 => Self::HUMAN,
            1 => Self::RODIAN,
            2 => Self::TRANDOSHAN,
            3 => Self::MON_CALAMARI,
            4 => Self::WOOKIEE,
            5 => Self::BOTHAN,
            6 => Self::TWILEK,
            7 => Self::ZABRAK,
            33 => Self::ITHORIAN,
            49 => Self::SULLUSTAN,
            _ => Self::empty(),
        };
        let gender = if female { Self::FEMALE } else { Self::MALE };
        let jedi = if jedi { Self::JEDI } else { Self::empty() };
        race | gender | jedi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_combines_race_gender_and_jedi() {
        let mask = RaceGenderMask::compute(33, true, true);
        assert_eq!(
            mask,
            RaceGenderMask::ITHORIAN | RaceGenderMask::FEMALE | RaceGenderMask::JEDI
        );
        assert_eq!(RaceGenderMask::compute(99, false, false), RaceGenderMask::MALE);
    }

    #[test]
    fn duel_list_has_no_duplicates() {
        let mut player = PlayerData::new(0, false);
        player.add_to_duel_list(EntityId(5));
        player.add_to_duel_list(EntityId(5));
        assert_eq!(player.duel_list, vec![EntityId(5)]);
        assert!(player.remove_from_duel_list(EntityId(5)));
        assert!(!player.remove_from_duel_list(EntityId(5)));
    }
}
