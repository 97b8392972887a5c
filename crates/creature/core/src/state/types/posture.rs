//! Postures and combat state flags.

use bitflags::bitflags;

/// Discrete physical stance of a creature.
///
/// Discriminants match the client's posture codes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Posture {
    #[default]
    Upright = 0,
    Crouched = 1,
    Prone = 2,
    Sneaking = 3,
    Blocking = 4,
    Climbing = 5,
    Flying = 6,
    LyingDown = 7,
    Sitting = 8,
    SkillAnimating = 9,
    DrivingVehicle = 10,
    RidingCreature = 11,
    KnockedDown = 12,
    Incapacitated = 13,
    Dead = 14,
}

impl Posture {
    /// Returns true for postures that block further incapacitation.
    #[inline]
    pub const fn is_down(self) -> bool {
        matches!(self, Posture::Incapacitated | Posture::Dead)
    }
}

bitflags! {
    /// Transient state flags broadcast alongside the posture.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CreatureState: u64 {
        const COVER                      = 1 << 0;
        const COMBAT                     = 1 << 1;
        const PEACE                      = 1 << 2;
        const AIMING                     = 1 << 3;
        const ALERT                      = 1 << 4;
        const BERSERK                    = 1 << 5;
        const FEIGN_DEATH                = 1 << 6;
        const COMBAT_ATTITUDE_EVASIVE    = 1 << 7;
        const COMBAT_ATTITUDE_NORMAL     = 1 << 8;
        const COMBAT_ATTITUDE_AGGRESSIVE = 1 << 9;
        const TUMBLING                   = 1 << 10;
        const RALLIED                    = 1 << 11;
        const STUNNED                    = 1 << 12;
        const BLINDED                    = 1 << 13;
        const DIZZY                      = 1 << 14;
        const INTIMIDATED                = 1 << 15;
        const IMMOBILIZED                = 1 << 16;
        const FROZEN                     = 1 << 17;
        const SWIMMING                   = 1 << 18;
        const SITTING_ON_CHAIR           = 1 << 19;
        const CRAFTING                   = 1 << 20;
        const GLOWING_JEDI               = 1 << 21;
        const MASK_SCENT                 = 1 << 22;
        const POISONED                   = 1 << 23;
        const BLEEDING                   = 1 << 24;
        const DISEASED                   = 1 << 25;
        const ON_FIRE                    = 1 << 26;
        const RIDING_MOUNT               = 1 << 27;
        const MOUNTED_CREATURE           = 1 << 28;
        const PILOTING_SHIP              = 1 << 29;

        /// Flags cleared when a creature leaves combat.
        const ENGAGED = Self::COMBAT.bits() | Self::COMBAT_ATTITUDE_NORMAL.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn only_incapacitated_and_dead_are_down() {
        let down: Vec<_> = Posture::iter().filter(|p| p.is_down()).collect();
        assert_eq!(down, vec![Posture::Incapacitated, Posture::Dead]);
    }

    #[test]
    fn leaving_combat_keeps_unrelated_flags() {
        let mut state = CreatureState::ENGAGED | CreatureState::POISONED;
        state.remove(CreatureState::ENGAGED);
        assert_eq!(state, CreatureState::POISONED);
    }
}
