//! Defender tracking and disengagement.
//!
//! Each creature keeps its own [`DefenderLedger`]. Combat state follows each
//! side's ledger independently: a creature leaves combat when *its* ledger
//! empties, whatever the other side still lists.
mod ledger;
mod peace;

use tracing::debug;

pub use ledger::DefenderLedger;
pub use peace::{PeaceOutcome, make_peace};

use crate::env::{Env, OracleError};
use crate::error::{CoreError, ErrorSeverity};
use crate::state::{Creature, CreatureState, EntityId, Posture, WorldState};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("attacker {0} not found")]
    AttackerNotFound(EntityId),

    #[error("defender {0} not found")]
    DefenderNotFound(EntityId),

    #[error("creature {0} cannot engage itself")]
    SelfEngagement(EntityId),

    #[error("creature {0} is dead")]
    Dead(EntityId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CoreError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CombatError::Oracle(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn entity(&self) -> Option<EntityId> {
        match self {
            CombatError::AttackerNotFound(id)
            | CombatError::DefenderNotFound(id)
            | CombatError::SelfEngagement(id)
            | CombatError::Dead(id) => Some(*id),
            CombatError::Oracle(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatError::AttackerNotFound(_) => "COMBAT_ATTACKER_NOT_FOUND",
            CombatError::DefenderNotFound(_) => "COMBAT_DEFENDER_NOT_FOUND",
            CombatError::SelfEngagement(_) => "COMBAT_SELF_ENGAGEMENT",
            CombatError::Dead(_) => "COMBAT_DEAD",
            CombatError::Oracle(err) => err.error_code(),
        }
    }
}

/// Removes `defender` from the creature's ledger.
///
/// Player clients are told which list position went away. Returns whether an
/// entry was removed.
pub fn remove_defender(
    creature: &mut Creature,
    defender: EntityId,
    env: &Env<'_>,
) -> Result<bool, OracleError> {
    let notifier = if creature.is_player() {
        Some(env.notifier()?)
    } else {
        None
    };

    match creature.defenders.remove(defender) {
        Some(index) => {
            if let Some(notifier) = notifier {
                notifier.notify_defender_change(creature, index, defender);
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Takes a creature whose ledger just emptied out of combat.
///
/// Players get their own hostility status refreshed; everything else is handed
/// to the AI's peaceful hook.
pub(crate) fn enter_peace(creature: &mut Creature, env: &Env<'_>) -> Result<(), OracleError> {
    let notifier = env.notifier()?;
    if creature.is_player() {
        notifier.notify_pvp_status(creature.id, creature.id);
    } else {
        env.npc()?.enter_peaceful(creature.id);
    }
    creature.state.remove(CreatureState::ENGAGED);
    notifier.notify_combat_state(creature);
    debug!(creature = %creature.id, "left combat");
    Ok(())
}

/// Clears combat flags once a creature has no defenders left.
pub(crate) fn clear_combat_state(
    creature: &mut Creature,
    env: &Env<'_>,
) -> Result<(), OracleError> {
    let notifier = env.notifier()?;
    creature.state.remove(CreatureState::ENGAGED);
    notifier.notify_combat_state(creature);
    Ok(())
}

/// Opens hostilities between two creatures.
///
/// Each side lists the other and enters combat. Returns false if the attacker
/// already listed the defender. Corpses cannot be engaged.
pub fn engage(
    world: &mut WorldState,
    env: &Env<'_>,
    attacker: EntityId,
    defender: EntityId,
) -> Result<bool, CombatError> {
    if attacker == defender {
        return Err(CombatError::SelfEngagement(attacker));
    }
    let attacker_posture = world
        .creature(attacker)
        .map(Creature::posture)
        .ok_or(CombatError::AttackerNotFound(attacker))?;
    let defender_posture = world
        .creature(defender)
        .map(Creature::posture)
        .ok_or(CombatError::DefenderNotFound(defender))?;
    for (id, posture) in [(attacker, attacker_posture), (defender, defender_posture)] {
        if posture == Posture::Dead {
            return Err(CombatError::Dead(id));
        }
    }
    let notifier = env.notifier()?;

    let mut added = false;
    for (subject, other) in [(attacker, defender), (defender, attacker)] {
        let Some(creature) = world.creature_mut(subject) else {
            continue;
        };
        let listed = creature.defenders.add(other);
        if subject == attacker {
            added = listed;
        }
        if !creature.state.contains(CreatureState::ENGAGED) {
            creature.state.insert(CreatureState::ENGAGED);
            notifier.notify_combat_state(creature);
        }
    }
    debug!(%attacker, %defender, "engaged");
    Ok(added)
}
