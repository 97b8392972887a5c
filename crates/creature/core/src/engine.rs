//! Entry point for every mutation of [`WorldState`].
//!
//! The [`CreatureEngine`] borrows the world for the duration of one trigger
//! (a command, a damage resolution, a fired timer). Cross-creature cascades run
//! to completion inside that borrow, so observers never see half a transition.

use std::sync::Arc;

use tracing::debug;

use crate::buffs::{self, ApplyMode, ApplyOutcome, Buff, BuffError, TickOutcome};
use crate::combat::{self, CombatError, PeaceOutcome};
use crate::env::{Env, OracleError, ScheduleHandle, TimedEvent};
use crate::error::{CoreError, ErrorSeverity};
use crate::skills::{self, Skill};
use crate::state::{EffectId, EntityId, Posture, StateError, WorldState};
use crate::vitality::{self, DeathReport, IncapOutcome, RecoveryOutcome, VitalityError};

/// Any error surfaced by the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Vitality(#[from] VitalityError),

    #[error(transparent)]
    Buff(#[from] BuffError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CoreError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::State(err) => err.severity(),
            EngineError::Combat(err) => err.severity(),
            EngineError::Vitality(err) => err.severity(),
            EngineError::Buff(err) => err.severity(),
            EngineError::Oracle(err) => err.severity(),
        }
    }

    fn entity(&self) -> Option<EntityId> {
        match self {
            EngineError::State(err) => err.entity(),
            EngineError::Combat(err) => err.entity(),
            EngineError::Vitality(err) => err.entity(),
            EngineError::Buff(err) => err.entity(),
            EngineError::Oracle(err) => err.entity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::State(err) => err.error_code(),
            EngineError::Combat(err) => err.error_code(),
            EngineError::Vitality(err) => err.error_code(),
            EngineError::Buff(err) => err.error_code(),
            EngineError::Oracle(err) => err.error_code(),
        }
    }
}

/// What a fired timer did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Recovery(RecoveryOutcome),
    Tick(TickOutcome),
}

pub struct CreatureEngine<'a> {
    state: &'a mut WorldState,
}

impl<'a> CreatureEngine<'a> {
    pub fn new(state: &'a mut WorldState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &WorldState {
        self.state
    }

    // ===== skills =====

    /// Learns a skill and rebuilds the derived tables.
    pub fn learn_skill(&mut self, id: EntityId, skill: Arc<Skill>) -> Result<bool, StateError> {
        let creature = self.state.require_mut(id)?;
        let learned = creature.skills.learn(skill);
        if learned {
            creature.skills.rebuild();
        }
        Ok(learned)
    }

    /// Forgets a skill and rebuilds the derived tables.
    pub fn forget_skill(&mut self, id: EntityId, skill_id: u32) -> Result<bool, StateError> {
        let creature = self.state.require_mut(id)?;
        let forgotten = creature.skills.forget(skill_id);
        if forgotten {
            creature.skills.rebuild();
        }
        Ok(forgotten)
    }

    pub fn adjust_modifier(
        &mut self,
        env: &Env<'_>,
        id: EntityId,
        modifier: &str,
        delta: i32,
    ) -> Result<bool, EngineError> {
        let creature = self.state.require_mut(id)?;
        Ok(skills::adjust_modifier(creature, modifier, delta, env)?)
    }

    // ===== defenders =====

    pub fn engage(
        &mut self,
        env: &Env<'_>,
        attacker: EntityId,
        defender: EntityId,
    ) -> Result<bool, CombatError> {
        combat::engage(self.state, env, attacker, defender)
    }

    /// Adds `defender` to the ledger of `id` only; see [`engage`](Self::engage)
    /// for the mutual form.
    pub fn add_defender(&mut self, id: EntityId, defender: EntityId) -> Result<bool, StateError> {
        Ok(self.state.require_mut(id)?.defenders.add(defender))
    }

    pub fn remove_defender(
        &mut self,
        env: &Env<'_>,
        id: EntityId,
        defender: EntityId,
    ) -> Result<bool, EngineError> {
        let creature = self.state.require_mut(id)?;
        Ok(combat::remove_defender(creature, defender, env)?)
    }

    pub fn clear_defenders(&mut self, id: EntityId) -> Result<bool, StateError> {
        Ok(self.state.require_mut(id)?.defenders.clear())
    }

    pub fn make_peace(
        &mut self,
        env: &Env<'_>,
        attacker: EntityId,
        defender: EntityId,
    ) -> Result<PeaceOutcome, CombatError> {
        combat::make_peace(self.state, env, attacker, defender)
    }

    // ===== vitality =====

    pub fn incap(&mut self, env: &Env<'_>, id: EntityId) -> Result<IncapOutcome, VitalityError> {
        vitality::incap(self.state, env, id)
    }

    pub fn die(&mut self, env: &Env<'_>, id: EntityId) -> Result<DeathReport, VitalityError> {
        vitality::die(self.state, env, id)
    }

    pub fn set_posture(
        &mut self,
        env: &Env<'_>,
        id: EntityId,
        posture: Posture,
    ) -> Result<Posture, VitalityError> {
        vitality::set_posture(self.state, env, id, posture)
    }

    // ===== buffs =====

    /// Attaches `buff` to `target` under a freshly allocated effect id.
    pub fn apply_buff(
        &mut self,
        env: &Env<'_>,
        target: EntityId,
        buff: Buff,
        mode: ApplyMode,
    ) -> Result<ApplyOutcome, BuffError> {
        if !self.state.contains(target) {
            return Err(BuffError::TargetNotFound(target));
        }
        let effect = self.state.allocate_effect_id();
        let creature = self
            .state
            .creature_mut(target)
            .ok_or(BuffError::TargetNotFound(target))?;
        Ok(buffs::apply(creature, effect, buff, mode, env)?)
    }

    pub fn remove_buff(
        &mut self,
        env: &Env<'_>,
        target: EntityId,
        effect: EffectId,
    ) -> Result<bool, BuffError> {
        let creature = self
            .state
            .creature_mut(target)
            .ok_or(BuffError::TargetNotFound(target))?;
        Ok(buffs::remove(creature, effect, env)?)
    }

    pub fn cleanup_buffs(&mut self, env: &Env<'_>, target: EntityId) -> Result<usize, BuffError> {
        let creature = self
            .state
            .creature_mut(target)
            .ok_or(BuffError::TargetNotFound(target))?;
        Ok(buffs::cleanup(creature, env)?)
    }

    // ===== timers =====

    /// Routes a fired timer back into the core.
    ///
    /// Timers for creatures that no longer exist are reported as stale.
    pub fn dispatch(
        &mut self,
        env: &Env<'_>,
        handle: ScheduleHandle,
        event: TimedEvent,
    ) -> Result<DispatchOutcome, EngineError> {
        match event {
            TimedEvent::IncapRecovery { entity } => Ok(DispatchOutcome::Recovery(
                vitality::recover(self.state, env, entity, handle)?,
            )),
            TimedEvent::EffectTick { entity, effect } => {
                let Some(creature) = self.state.creature_mut(entity) else {
                    debug!(creature = %entity, %effect, "tick for missing creature ignored");
                    return Ok(DispatchOutcome::Tick(TickOutcome::Stale));
                };
                Ok(DispatchOutcome::Tick(buffs::tick(creature, effect, env)?))
            }
        }
    }
}
