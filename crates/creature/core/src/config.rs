use crate::env::ConfigOracle;
use crate::state::Millis;

/// Tunable parameters of the vitality and combat lifecycle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CreatureConfig {
    /// Window after the first incapacitation of a streak; once it elapses the
    /// escalation counter starts over.
    pub incap_reset_window: Millis,
    /// Number of incapacitations within the window that results in death.
    pub incap_threshold: u32,
    /// How long a player stays incapacitated before recovering.
    pub base_incap_duration: Millis,
    /// Radius searched for cloning facilities when a player dies.
    pub cloning_search_radius: f32,
    /// Lower bound (inclusive) of the corpse despawn delay.
    pub despawn_delay_min: Millis,
    /// Upper bound (exclusive) of the corpse despawn delay.
    pub despawn_delay_max: Millis,
    /// Despawn delay for simple attackable objects.
    pub attackable_object_despawn_delay: Millis,
    /// Delay before a dead player that never picked a facility is cloned anyway.
    pub forced_cloning_delay: Millis,
}

impl CreatureConfig {
    // ===== fixed rules =====
    /// Total skill points a creature may spend on learned skills.
    pub const SKILL_POINT_POOL: u32 = 250;
    /// Value reported for a modifier the creature does not have.
    pub const MODIFIER_ABSENT: i32 = -1000;
    /// Value reported for a faction the creature has no standing with.
    pub const FACTION_ABSENT: i32 = -10000;
    /// Number of customization slots (index 0 is unused).
    pub const CUSTOMIZATION_SLOTS: usize = 255;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INCAP_RESET_WINDOW: Millis = Millis(300_000);
    pub const DEFAULT_INCAP_THRESHOLD: u32 = 3;
    pub const DEFAULT_BASE_INCAP_DURATION: Millis = Millis(10_000);
    pub const DEFAULT_CLONING_SEARCH_RADIUS: f32 = 8192.0;
    pub const DEFAULT_DESPAWN_DELAY_MIN: Millis = Millis(180_000);
    pub const DEFAULT_DESPAWN_DELAY_MAX: Millis = Millis(300_000);
    pub const DEFAULT_ATTACKABLE_OBJECT_DESPAWN_DELAY: Millis = Millis(500);
    pub const DEFAULT_FORCED_CLONING_DELAY: Millis = Millis(600_000);

    pub fn new() -> Self {
        Self {
            incap_reset_window: Self::DEFAULT_INCAP_RESET_WINDOW,
            incap_threshold: Self::DEFAULT_INCAP_THRESHOLD,
            base_incap_duration: Self::DEFAULT_BASE_INCAP_DURATION,
            cloning_search_radius: Self::DEFAULT_CLONING_SEARCH_RADIUS,
            despawn_delay_min: Self::DEFAULT_DESPAWN_DELAY_MIN,
            despawn_delay_max: Self::DEFAULT_DESPAWN_DELAY_MAX,
            attackable_object_despawn_delay: Self::DEFAULT_ATTACKABLE_OBJECT_DESPAWN_DELAY,
            forced_cloning_delay: Self::DEFAULT_FORCED_CLONING_DELAY,
        }
    }

    pub fn with_incap_rules(threshold: u32, reset_window: Millis, duration: Millis) -> Self {
        Self {
            incap_threshold: threshold,
            incap_reset_window: reset_window,
            base_incap_duration: duration,
            ..Self::new()
        }
    }
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigOracle for CreatureConfig {
    fn incap_reset_window(&self) -> Millis {
        self.incap_reset_window
    }

    fn incap_threshold(&self) -> u32 {
        self.incap_threshold
    }

    fn base_incap_duration(&self) -> Millis {
        self.base_incap_duration
    }

    fn cloning_search_radius(&self) -> f32 {
        self.cloning_search_radius
    }

    fn despawn_delay_range(&self) -> (Millis, Millis) {
        (self.despawn_delay_min, self.despawn_delay_max)
    }

    fn attackable_object_despawn_delay(&self) -> Millis {
        self.attackable_object_despawn_delay
    }

    fn forced_cloning_delay(&self) -> Millis {
        self.forced_cloning_delay
    }
}
