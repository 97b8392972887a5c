//! Timer collaborators.
//!
//! The core runs no clock. One-shot follow-ups (incap recovery) and recurring
//! effect ticks are handed to a [`Scheduler`]; deferred removal of dead bodies
//! and the forced-cloning fallback go to a [`DestructionRegistry`].
//!
//! Cancellation is not synchronous. A callback may still fire after
//! [`Scheduler::cancel`] or [`Scheduler::deregister_recurring`], so every
//! handler checks the stored handle or the effect's own flags first.

use crate::state::{EffectId, EntityId, Millis};

/// Opaque identifier of a scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleHandle(pub u64);

impl std::fmt::Display for ScheduleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Callback payload delivered back into the core when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimedEvent {
    /// An incapacitated creature may get back up.
    IncapRecovery { entity: EntityId },
    /// Periodic tick of an attached status effect.
    EffectTick { entity: EntityId, effect: EffectId },
}

impl TimedEvent {
    pub fn entity(&self) -> EntityId {
        match self {
            TimedEvent::IncapRecovery { entity } | TimedEvent::EffectTick { entity, .. } => *entity,
        }
    }
}

pub trait Scheduler: Send + Sync {
    /// Schedules a one-shot callback.
    fn schedule(&self, event: TimedEvent, delay: Millis) -> ScheduleHandle;

    /// Cancels a one-shot callback. Unknown handles are ignored.
    fn cancel(&self, handle: ScheduleHandle);

    /// Starts delivering [`TimedEvent::EffectTick`] every `interval`.
    fn register_recurring(&self, entity: EntityId, effect: EffectId, interval: Millis);

    /// Stops delivering ticks for `effect`. Unknown effects are ignored.
    fn deregister_recurring(&self, effect: EffectId);
}

/// Deferred world removals owned outside the core.
pub trait DestructionRegistry: Send + Sync {
    /// Removes the entity from the world after `delay`.
    fn schedule_destruction(&self, entity: EntityId, delay: Millis);

    /// Clones the dead player at their nearest facility after `delay` unless
    /// they choose a destination first.
    fn schedule_forced_cloning(&self, player: EntityId, delay: Millis);
}
