//! Locomotion limits derived from posture.
//!
//! The current limits are never set by gameplay code. They are recomputed by
//! [`MovementProfile::update`] after every posture transition, before observers
//! are told about the new posture.

use crate::state::Posture;

/// Prone crawl speed.
const PRONE_RUN_SPEED_LIMIT: f32 = 1.0;
/// Prone acceleration.
const PRONE_ACCELERATION: f32 = 0.25;

/// One set of locomotion limits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locomotion {
    pub run_speed_limit: f32,
    pub acceleration: f32,
    pub turn_rate: f32,
    pub terrain_negotiation: f32,
}

impl Locomotion {
    pub const HALTED: Self = Self {
        run_speed_limit: 0.0,
        acceleration: 0.0,
        turn_rate: 0.0,
        terrain_negotiation: 0.0,
    };

    pub const fn new(
        run_speed_limit: f32,
        acceleration: f32,
        turn_rate: f32,
        terrain_negotiation: f32,
    ) -> Self {
        Self {
            run_speed_limit,
            acceleration,
            turn_rate,
            terrain_negotiation,
        }
    }
}

/// Resolves the locomotion limits for a posture.
///
/// Pure: the result depends only on `posture` and `base`.
pub fn resolve(posture: Posture, base: &Locomotion) -> Locomotion {
    match posture {
        Posture::KnockedDown | Posture::Incapacitated | Posture::Dead | Posture::Sitting => {
            Locomotion::HALTED
        }
        Posture::Prone => Locomotion {
            run_speed_limit: PRONE_RUN_SPEED_LIMIT,
            acceleration: PRONE_ACCELERATION,
            ..*base
        },
        Posture::Crouched => Locomotion {
            run_speed_limit: 0.0,
            acceleration: 0.0,
            ..*base
        },
        _ => *base,
    }
}

/// Base limits plus the currently effective limits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementProfile {
    base: Locomotion,
    current: Locomotion,
}

impl MovementProfile {
    /// Creates a profile for an upright creature.
    pub fn new(base: Locomotion) -> Self {
        Self {
            base,
            current: base,
        }
    }

    pub fn base(&self) -> &Locomotion {
        &self.base
    }

    pub fn current(&self) -> &Locomotion {
        &self.current
    }

    /// Replaces the base limits and re-resolves for `posture`.
    pub fn set_base(&mut self, base: Locomotion, posture: Posture) {
        self.base = base;
        self.update(posture);
    }

    pub fn update(&mut self, posture: Posture) {
        self.current = resolve(posture, &self.base);
    }
}
