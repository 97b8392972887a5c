//! Configuration oracle for exposing tunable rules to the core.

use crate::state::Millis;

/// Provides access to runtime configuration values.
pub trait ConfigOracle: Send + Sync {
    /// Time after the first incapacitation of a streak before the counter resets.
    fn incap_reset_window(&self) -> Millis;

    /// Incapacitation count that turns the next incap into death.
    fn incap_threshold(&self) -> u32;

    /// Duration of a single incapacitation.
    fn base_incap_duration(&self) -> Millis;

    /// Radius of the cloning facility search performed on player death.
    fn cloning_search_radius(&self) -> f32;

    /// `(min, max)` despawn delay for dead creatures; `max` is exclusive.
    fn despawn_delay_range(&self) -> (Millis, Millis);

    /// Near-immediate despawn delay used by simple attackable objects.
    fn attackable_object_despawn_delay(&self) -> Millis;

    /// Delay before a dead player is cloned without having chosen a facility.
    fn forced_cloning_delay(&self) -> Millis;
}
