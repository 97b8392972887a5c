//! Recording fakes for every collaborator trait.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::CreatureConfig;
use crate::env::{
    CloneOption, CloneSelector, DestructionRegistry, Env, Notifier, NpcBehavior, PcgRng,
    ScheduleHandle, Scheduler, Structure, StructureKind, StructureOracle, SystemMessage,
    TimedEvent,
};
use crate::state::{Creature, EffectId, EntityId, Millis, Position, Posture};

#[derive(Clone, Debug, PartialEq)]
pub enum Recorded {
    Posture(EntityId, Posture),
    Movement(EntityId),
    IncapTimer(EntityId, Millis),
    CombatState(EntityId),
    DefenderChange(EntityId, usize, EntityId),
    Pvp { subject: EntityId, observer: EntityId },
    System(EntityId, SystemMessage),
    SkillMods(EntityId),
    Scheduled(ScheduleHandle, TimedEvent, Millis),
    Cancelled(ScheduleHandle),
    Registered(EntityId, EffectId, Millis),
    Deregistered(EffectId),
    Destruction(EntityId, Millis),
    ForcedCloning(EntityId, Millis),
    Peaceful(EntityId),
    DeathAnimation(EntityId),
    AttackerXp(EntityId),
    CloneSelection(EntityId, Vec<CloneOption>),
}

pub struct Recorder {
    events: Mutex<Vec<Recorded>>,
    next_handle: AtomicU64,
    pub config: CreatureConfig,
    pub structures: Vec<Structure>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::with_config(CreatureConfig::default())
    }
}

impl Recorder {
    pub fn with_config(config: CreatureConfig) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(1),
            config,
            structures: Vec::new(),
        }
    }

    pub fn with_structures(mut self, structures: Vec<Structure>) -> Self {
        self.structures = structures;
        self
    }

    pub fn env(&self) -> Env<'_> {
        Env::empty()
            .with_config(&self.config)
            .with_rng(&PcgRng)
            .with_notifier(self)
            .with_scheduler(self)
            .with_destruction(self)
            .with_structures(self)
            .with_npc(self)
            .with_clone_selector(self)
    }

    /// Drains everything recorded so far.
    pub fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Recorded) {
        self.events.lock().unwrap().push(event);
    }
}

impl Notifier for Recorder {
    fn notify_posture(&self, creature: &Creature) {
        self.push(Recorded::Posture(creature.id, creature.posture()));
    }

    fn notify_movement_profile(&self, creature: &Creature) {
        self.push(Recorded::Movement(creature.id));
    }

    fn notify_incap_timer(&self, creature: &Creature) {
        self.push(Recorded::IncapTimer(creature.id, creature.incap.current_duration));
    }

    fn notify_combat_state(&self, creature: &Creature) {
        self.push(Recorded::CombatState(creature.id));
    }

    fn notify_defender_change(&self, creature: &Creature, index: usize, removed: EntityId) {
        self.push(Recorded::DefenderChange(creature.id, index, removed));
    }

    fn notify_pvp_status(&self, subject: EntityId, observer: EntityId) {
        self.push(Recorded::Pvp { subject, observer });
    }

    fn notify_system_message(&self, player: EntityId, message: SystemMessage) {
        self.push(Recorded::System(player, message));
    }

    fn notify_skill_mods_baseline(&self, creature: &Creature) {
        self.push(Recorded::SkillMods(creature.id));
    }
}

impl Scheduler for Recorder {
    fn schedule(&self, event: TimedEvent, delay: Millis) -> ScheduleHandle {
        let handle = ScheduleHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.push(Recorded::Scheduled(handle, event, delay));
        handle
    }

    fn cancel(&self, handle: ScheduleHandle) {
        self.push(Recorded::Cancelled(handle));
    }

    fn register_recurring(&self, entity: EntityId, effect: EffectId, interval: Millis) {
        self.push(Recorded::Registered(entity, effect, interval));
    }

    fn deregister_recurring(&self, effect: EffectId) {
        self.push(Recorded::Deregistered(effect));
    }
}

impl DestructionRegistry for Recorder {
    fn schedule_destruction(&self, entity: EntityId, delay: Millis) {
        self.push(Recorded::Destruction(entity, delay));
    }

    fn schedule_forced_cloning(&self, player: EntityId, delay: Millis) {
        self.push(Recorded::ForcedCloning(player, delay));
    }
}

impl StructureOracle for Recorder {
    fn find_in_range(&self, origin: Position, kind: StructureKind, radius: f32) -> Vec<Structure> {
        self.structures
            .iter()
            .filter(|s| s.kind == kind && s.position.distance_2d(&origin) <= radius)
            .cloned()
            .collect()
    }
}

impl NpcBehavior for Recorder {
    fn enter_peaceful(&self, creature: EntityId) {
        self.push(Recorded::Peaceful(creature));
    }

    fn play_death_animation(&self, creature: EntityId) {
        self.push(Recorded::DeathAnimation(creature));
    }

    fn distribute_attacker_xp(&self, creature: EntityId) {
        self.push(Recorded::AttackerXp(creature));
    }
}

impl CloneSelector for Recorder {
    fn present_clone_selection(&self, player: EntityId, options: &[CloneOption]) {
        self.push(Recorded::CloneSelection(player, options.to_vec()));
    }
}
