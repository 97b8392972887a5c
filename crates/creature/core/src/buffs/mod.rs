//! Status effects ("buffs").
//!
//! # Lifecycle
//!
//! ```text
//! created ─▶ attached (initial hook, registered for ticks)
//!         ─▶ ticked by the scheduler
//!         ─▶ expired or removed (final hook, deregistered, tagged pending)
//!         ─▶ reaped by the next cleanup pass (attributes dropped)
//! ```
//!
//! The initial and final hooks fire exactly once each, in that order, whichever
//! way the effect ends. Hook deltas go through [`skills::adjust_modifier`] so
//! players receive the refreshed modifier table.
mod effect;
mod list;

use tracing::{debug, warn};

pub use effect::{Buff, BuffAttribute, BuffIcon, BuffPhase, EntryTag, ModifierDeltas};
pub use list::ActiveBuffs;

use crate::env::{Env, OracleError};
use crate::error::{CoreError, ErrorSeverity};
use crate::skills;
use crate::state::{Creature, EffectId, EntityId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuffError {
    #[error("buff target {0} not found")]
    TargetNotFound(EntityId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CoreError for BuffError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BuffError::TargetNotFound(_) => ErrorSeverity::Validation,
            BuffError::Oracle(err) => err.severity(),
        }
    }

    fn entity(&self) -> Option<EntityId> {
        match self {
            BuffError::TargetNotFound(id) => Some(*id),
            BuffError::Oracle(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            BuffError::TargetNotFound(_) => "BUFF_TARGET_NOT_FOUND",
            BuffError::Oracle(err) => err.error_code(),
        }
    }
}

/// Stacking rules for [`apply`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyMode {
    /// Allow several live effects with the same icon.
    pub stackable: bool,
    /// Replace a live effect with the same icon instead of rejecting the new one.
    pub overwrite: bool,
}

impl ApplyMode {
    pub const EXCLUSIVE: Self = Self {
        stackable: false,
        overwrite: false,
    };
    pub const STACKABLE: Self = Self {
        stackable: true,
        overwrite: false,
    };
    pub const OVERWRITE: Self = Self {
        stackable: false,
        overwrite: true,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(EffectId),
    /// The live effect with the same icon was ended and the new one attached.
    Replaced { previous: EffectId, effect: EffectId },
    /// An effect with the same icon is live and the new one was discarded.
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Ticked { remaining: u32 },
    Expired,
    /// The effect is gone, cancelled or already finished.
    Stale,
}

/// Attaches `buff` to `creature` under `id`.
///
/// Pending entries are reaped first.
pub fn apply(
    creature: &mut Creature,
    id: EffectId,
    buff: Buff,
    mode: ApplyMode,
    env: &Env<'_>,
) -> Result<ApplyOutcome, OracleError> {
    let scheduler = env.scheduler()?;
    cleanup(creature, env)?;

    let icon = buff.icon();
    let previous = match creature.buffs.get(icon) {
        Some(existing) if !mode.stackable => Some(existing.id()),
        _ => None,
    };

    if let Some(previous) = previous {
        if !mode.overwrite {
            if creature.is_player() {
                warn!(creature = %creature.id, %icon, "prevented buff stacking");
            } else {
                debug!(creature = %creature.id, %icon, "prevented buff stacking");
            }
            return Ok(ApplyOutcome::Rejected);
        }
        finish(creature, previous, true, env)?;
    }

    let mut buff = buff;
    buff.attach(id, creature.id);
    let deltas = buff.initialize();
    let interval = buff.interval();
    buff.set_registered(true);
    creature.buffs.push(buff);

    apply_deltas(creature, deltas, env)?;
    scheduler.register_recurring(creature.id, id, interval);
    debug!(creature = %creature.id, effect = %id, %icon, "buff attached");

    Ok(match previous {
        Some(previous) => ApplyOutcome::Replaced {
            previous,
            effect: id,
        },
        None => ApplyOutcome::Applied(id),
    })
}

/// Cancels an effect: deregisters it, fires its final hook and tags it for cleanup.
///
/// Returns false if the effect is unknown or already ended.
pub fn remove(creature: &mut Creature, id: EffectId, env: &Env<'_>) -> Result<bool, OracleError> {
    finish(creature, id, true, env)
}

/// Handles one scheduler tick. Ticks for ended effects are ignored.
pub fn tick(
    creature: &mut Creature,
    id: EffectId,
    env: &Env<'_>,
) -> Result<TickOutcome, OracleError> {
    let Some(buff) = creature.buffs.find_mut(id).filter(|buff| buff.is_live()) else {
        debug!(creature = %creature.id, effect = %id, "stale buff tick ignored");
        return Ok(TickOutcome::Stale);
    };
    let (deltas, expired) = buff.tick();
    let remaining = buff.ticks_remaining();

    apply_deltas(creature, deltas, env)?;
    if expired {
        finish(creature, id, false, env)?;
        return Ok(TickOutcome::Expired);
    }
    Ok(TickOutcome::Ticked { remaining })
}

/// Reaps entries tagged for removal, keeping the order of the rest.
///
/// An entry whose final hook never ran gets it here. Returns how many entries
/// were dropped.
pub fn cleanup(creature: &mut Creature, env: &Env<'_>) -> Result<usize, OracleError> {
    let reaped = creature.buffs.reap();
    let count = reaped.len();
    for mut buff in reaped {
        if buff.is_registered() {
            env.scheduler()?.deregister_recurring(buff.id());
            buff.set_registered(false);
        }
        let deltas = buff.finalize();
        apply_deltas(creature, deltas, env)?;
        buff.detach();
    }
    Ok(count)
}

fn finish(
    creature: &mut Creature,
    id: EffectId,
    cancelled: bool,
    env: &Env<'_>,
) -> Result<bool, OracleError> {
    let scheduler = env.scheduler()?;
    let Some(buff) = creature
        .buffs
        .find_mut(id)
        .filter(|buff| !buff.is_cancelled() && !buff.is_pending_removal())
    else {
        return Ok(false);
    };

    if cancelled {
        buff.cancel();
    }
    if buff.is_registered() {
        scheduler.deregister_recurring(id);
        buff.set_registered(false);
    }
    let deltas = buff.finalize();
    buff.mark_pending_removal();

    apply_deltas(creature, deltas, env)?;
    debug!(creature = %creature.id, effect = %id, cancelled, "buff ended");
    Ok(true)
}

fn apply_deltas(
    creature: &mut Creature,
    deltas: ModifierDeltas,
    env: &Env<'_>,
) -> Result<(), OracleError> {
    for (modifier, delta) in deltas {
        skills::adjust_modifier(creature, &modifier, delta, env)?;
    }
    Ok(())
}
