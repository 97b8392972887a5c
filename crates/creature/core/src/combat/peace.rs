use tracing::{debug, warn};

use super::{CombatError, enter_peace, remove_defender};
use crate::env::Env;
use crate::state::{EntityId, WorldState};

/// Result of [`make_peace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeaceOutcome {
    /// Both sides are players; their hostility is settled by duels and death only.
    PlayersExempt,
    /// The relationship was removed on both sides.
    Resolved {
        /// The attacker's ledger is empty and it left combat.
        attacker_at_peace: bool,
        /// The defender's ledger is empty and it left combat.
        defender_at_peace: bool,
    },
}

/// Ends the hostility between `attacker` and `defender` on both sides.
///
/// Safe to repeat: ids that are no longer listed are simply not removed again.
///
/// # Errors
///
/// `DefenderNotFound` / `AttackerNotFound` if either id does not resolve; no
/// state is touched in that case.
pub fn make_peace(
    world: &mut WorldState,
    env: &Env<'_>,
    attacker: EntityId,
    defender: EntityId,
) -> Result<PeaceOutcome, CombatError> {
    let Some(defender_is_player) = world.creature(defender).map(|c| c.is_player()) else {
        warn!(%attacker, %defender, "peace with unknown defender aborted");
        return Err(CombatError::DefenderNotFound(defender));
    };
    let Some(attacker_is_player) = world.creature(attacker).map(|c| c.is_player()) else {
        return Err(CombatError::AttackerNotFound(attacker));
    };

    if attacker_is_player && defender_is_player {
        return Ok(PeaceOutcome::PlayersExempt);
    }
    let notifier = env.notifier()?;

    let attacker_at_peace = {
        let creature = world
            .require_mut(attacker)
            .map_err(|_| CombatError::AttackerNotFound(attacker))?;
        remove_defender(creature, defender, env)?;
        if defender_is_player {
            notifier.notify_pvp_status(attacker, defender);
        }
        let empty = creature.defenders.is_empty();
        if empty {
            enter_peace(creature, env)?;
        }
        empty
    };

    let defender_at_peace = {
        let creature = world
            .require_mut(defender)
            .map_err(|_| CombatError::DefenderNotFound(defender))?;
        remove_defender(creature, attacker, env)?;
        if attacker_is_player {
            notifier.notify_pvp_status(defender, attacker);
        }
        let empty = creature.defenders.is_empty();
        if empty {
            enter_peace(creature, env)?;
        }
        empty
    };

    debug!(%attacker, %defender, attacker_at_peace, defender_at_peace, "peace made");
    Ok(PeaceOutcome::Resolved {
        attacker_at_peace,
        defender_at_peace,
    })
}
