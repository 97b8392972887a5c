//! Deterministic combat and vitality rules for creatures in a shared world.
//!
//! `creature-core` owns the per-creature state (posture, skills, defenders,
//! active effects, appearance) and the transitions between those states:
//! incapacitation, death, peace, buff lifecycles and movement resolution.
//! All mutation flows through [`engine::CreatureEngine`]. Side effects that
//! leave the core (client notifications, timers, despawns, spatial lookups)
//! go through the collaborator traits in [`env`], which the runtime provides.
pub mod buffs;
pub mod combat;
pub mod config;
pub mod customization;
pub mod engine;
pub mod env;
pub mod error;
pub mod movement;
pub mod skills;
pub mod state;
pub mod vitality;

#[cfg(test)]
mod test_support;

pub use buffs::{
    ActiveBuffs, ApplyMode, ApplyOutcome, Buff, BuffAttribute, BuffError, BuffIcon, BuffPhase,
    TickOutcome,
};
pub use combat::{CombatError, DefenderLedger, PeaceOutcome};
pub use config::CreatureConfig;
pub use customization::{Customization, CustomizationError, DecodedCustomization};
pub use engine::{CreatureEngine, DispatchOutcome, EngineError};
pub use env::{
    BuildingFamily, CloneDestination, CloneOption, CloneSelector, ConfigOracle,
    DestructionRegistry, Env, Notifier, NpcBehavior, OracleError, PcgRng, RngOracle,
    ScheduleHandle, Scheduler, Structure, StructureKind, StructureOracle, SystemMessage,
    TimedEvent,
};
pub use error::{CoreError, ErrorSeverity};
pub use movement::{Locomotion, MovementProfile};
pub use skills::{CommandRef, Skill, SkillSet};
pub use state::{
    Capabilities, Classification, Creature, CreatureKind, CreatureState, CreoGroup, EffectId,
    EntityId, IncapState, Millis, NpcProfile, PlayerData, Position, Posture, StateError,
    WorldState,
};
pub use vitality::{DeathReport, IncapOutcome, RecoveryOutcome, VitalityError};
