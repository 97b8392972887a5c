//! Vitality state machine.
//!
//! # Transitions
//!
//! ```text
//! any standing posture ──incap()──▶ Incapacitated ──recovery──▶ Upright
//!          │                              │
//!          └──────── die() ◀──────────────┘ (threshold reached)
//!                      │
//!                      ▼
//!                    Dead (terminal; revival happens outside the core)
//! ```
//!
//! Players absorb `threshold - 1` incapacitations per streak; the streak starts
//! over once the reset window has passed since its first incapacitation.
//! Non-player creatures die on their first incapacitation.
mod death;

use tracing::{debug, warn};

pub use death::{DeathReport, die};

use crate::combat::CombatError;
use crate::env::{Env, OracleError, ScheduleHandle, TimedEvent};
use crate::error::{CoreError, ErrorSeverity};
use crate::state::{Classification, Creature, CreatureState, EntityId, Millis, Posture, WorldState};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VitalityError {
    #[error("creature {0} not found")]
    CreatureNotFound(EntityId),

    #[error("cannot incapacitate {entity}: unsupported classification {classification}")]
    UnsupportedClassification {
        entity: EntityId,
        classification: Classification,
    },

    /// `Incapacitated` and `Dead` are reached through `incap`/`die` only, and
    /// nothing leaves `Dead`.
    #[error("{entity} cannot change posture from {from} to {to}")]
    PostureChangeRejected {
        entity: EntityId,
        from: Posture,
        to: Posture,
    },

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CoreError for VitalityError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            VitalityError::CreatureNotFound(_)
            | VitalityError::UnsupportedClassification { .. }
            | VitalityError::PostureChangeRejected { .. } => ErrorSeverity::Validation,
            VitalityError::Combat(err) => err.severity(),
            VitalityError::Oracle(err) => err.severity(),
        }
    }

    fn entity(&self) -> Option<EntityId> {
        match self {
            VitalityError::CreatureNotFound(entity)
            | VitalityError::UnsupportedClassification { entity, .. }
            | VitalityError::PostureChangeRejected { entity, .. } => Some(*entity),
            VitalityError::Combat(err) => err.entity(),
            VitalityError::Oracle(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            VitalityError::CreatureNotFound(_) => "VITALITY_CREATURE_NOT_FOUND",
            VitalityError::UnsupportedClassification { .. } => {
                "VITALITY_UNSUPPORTED_CLASSIFICATION"
            }
            VitalityError::PostureChangeRejected { .. } => "VITALITY_POSTURE_CHANGE_REJECTED",
            VitalityError::Combat(err) => err.error_code(),
            VitalityError::Oracle(err) => err.error_code(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncapOutcome {
    /// Already incapacitated or dead; nothing changed.
    Ignored,
    Incapacitated {
        /// Incapacitations in the current streak, including this one.
        count: u32,
        recovery: ScheduleHandle,
    },
    Killed(DeathReport),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryOutcome {
    Recovered,
    /// The creature is gone, no longer incapacitated, or the handle was replaced.
    Stale,
}

/// Incapacitates a creature, escalating to death per the streak rules.
///
/// # Errors
///
/// `CreatureNotFound` for an unknown id and `UnsupportedClassification` for
/// vehicles; neither touches state.
pub fn incap(
    world: &mut WorldState,
    env: &Env<'_>,
    id: EntityId,
) -> Result<IncapOutcome, VitalityError> {
    let now = world.clock();
    let creature = world.creature_mut(id).ok_or(VitalityError::CreatureNotFound(id))?;

    if creature.posture().is_down() {
        debug!(creature = %id, posture = %creature.posture(), "incap ignored");
        return Ok(IncapOutcome::Ignored);
    }

    match creature.classification() {
        Classification::Player => {
            let config = env.config()?;
            let incap = &mut creature.incap;
            if incap.count == 0 {
                incap.first_incap_at = now;
            } else if now.since(incap.first_incap_at) >= config.incap_reset_window() {
                debug!(creature = %id, streak = incap.count, "incap streak reset");
                incap.count = 0;
                incap.first_incap_at = now;
            }
            incap.count += 1;

            if incap.count < config.incap_threshold() {
                let count = incap.count;
                let recovery = enter_incapacitation(creature, env, config.base_incap_duration())?;
                debug!(creature = %id, count, "incapacitated");
                Ok(IncapOutcome::Incapacitated { count, recovery })
            } else {
                Ok(IncapOutcome::Killed(die(world, env, id)?))
            }
        }
        Classification::Creature => Ok(IncapOutcome::Killed(die(world, env, id)?)),
        classification => {
            warn!(creature = %id, %classification, "incapacitated unsupported type");
            Err(VitalityError::UnsupportedClassification {
                entity: id,
                classification,
            })
        }
    }
}

fn enter_incapacitation(
    creature: &mut Creature,
    env: &Env<'_>,
    duration: Millis,
) -> Result<ScheduleHandle, OracleError> {
    let notifier = env.notifier()?;
    let scheduler = env.scheduler()?;

    creature.change_posture(Posture::Incapacitated);
    creature.incap.current_duration = duration;
    notifier.notify_incap_timer(creature);

    let handle = scheduler.schedule(TimedEvent::IncapRecovery { entity: creature.id }, duration);
    if let Some(stale) = creature.incap.recovery.replace(handle) {
        scheduler.cancel(stale);
    }

    creature.state = CreatureState::empty();
    halt_regeneration(creature, env)?;

    notify_posture_change(creature, env)?;
    Ok(handle)
}

/// Brings an incapacitated creature back up when its recovery timer fires.
///
/// Only the handle stored at incapacitation time is honoured; anything else is
/// a callback that outlived its cancellation.
pub fn recover(
    world: &mut WorldState,
    env: &Env<'_>,
    id: EntityId,
    handle: ScheduleHandle,
) -> Result<RecoveryOutcome, VitalityError> {
    let Some(creature) = world.creature_mut(id) else {
        debug!(creature = %id, %handle, "recovery for missing creature ignored");
        return Ok(RecoveryOutcome::Stale);
    };
    if creature.posture() != Posture::Incapacitated || creature.incap.recovery != Some(handle) {
        debug!(creature = %id, %handle, "stale incap recovery ignored");
        return Ok(RecoveryOutcome::Stale);
    }
    let notifier = env.notifier()?;

    creature.incap.recovery = None;
    creature.incap.current_duration = Millis::ZERO;
    notifier.notify_incap_timer(creature);

    creature.change_posture(Posture::Upright);
    notify_posture_change(creature, env)?;
    debug!(creature = %id, "recovered from incapacitation");
    Ok(RecoveryOutcome::Recovered)
}

/// Changes posture on an external trigger (sitting, standing up, kneeling).
///
/// Leaving `Incapacitated` this way cancels the pending recovery. Returns the
/// previous posture; setting the current posture again is a no-op.
///
/// # Errors
///
/// `PostureChangeRejected` when the target is `Incapacitated` or `Dead`, or
/// when the creature is dead.
pub fn set_posture(
    world: &mut WorldState,
    env: &Env<'_>,
    id: EntityId,
    posture: Posture,
) -> Result<Posture, VitalityError> {
    let creature = world.creature_mut(id).ok_or(VitalityError::CreatureNotFound(id))?;
    let previous = creature.posture();
    if previous == posture {
        return Ok(previous);
    }
    if previous == Posture::Dead || matches!(posture, Posture::Incapacitated | Posture::Dead) {
        warn!(creature = %id, from = %previous, to = %posture, "posture change rejected");
        return Err(VitalityError::PostureChangeRejected {
            entity: id,
            from: previous,
            to: posture,
        });
    }
    let notifier = env.notifier()?;

    if previous == Posture::Incapacitated {
        if let Some(handle) = creature.incap.recovery.take() {
            env.scheduler()?.cancel(handle);
        }
        creature.incap.current_duration = Millis::ZERO;
        notifier.notify_incap_timer(creature);
    }

    creature.change_posture(posture);
    notify_posture_change(creature, env)?;
    debug!(creature = %id, from = %previous, to = %posture, "posture changed");
    Ok(previous)
}

/// Cancels and forgets the creature's regeneration task, if one is running.
pub fn halt_regeneration(creature: &mut Creature, env: &Env<'_>) -> Result<(), OracleError> {
    if let Some(task) = creature.regen_task.take() {
        env.scheduler()?.cancel(task);
    }
    Ok(())
}

/// Posture update for everyone, movement update for the player's own client.
pub(crate) fn notify_posture_change(creature: &Creature, env: &Env<'_>) -> Result<(), OracleError> {
    let notifier = env.notifier()?;
    notifier.notify_posture(creature);
    if creature.is_player() {
        notifier.notify_movement_profile(creature);
    }
    Ok(())
}
