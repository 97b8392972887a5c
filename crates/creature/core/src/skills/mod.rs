//! Skill aggregation.
//!
//! A creature's effective modifiers and learned commands are derived from the
//! skills it has learned. Skill definitions are loaded elsewhere and shared
//! between creatures, so the set holds them behind [`Arc`].
//!
//! # Aggregation Rules
//!
//! - Modifiers with the same name across skills are summed
//! - Species-restricted skills never contribute commands
//! - Commands are deduplicated by id
//! - Remaining skill points are derived on demand, never stored
mod commands;
mod modifiers;

use std::sync::Arc;

use tracing::debug;

pub use commands::{CommandRef, CommandSet};
pub use modifiers::ModifierTable;

use crate::config::CreatureConfig;
use crate::env::{Env, OracleError};
use crate::state::Creature;

/// Static definition of a learnable skill.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Skill {
    pub id: u32,
    pub name: String,
    pub point_cost: u32,
    /// Species allowed to learn this skill; empty for everyone.
    pub species_required: Vec<String>,
    pub modifiers: Vec<(String, i32)>,
    pub commands: Vec<CommandRef>,
}

impl Skill {
    pub fn new(id: u32, name: impl Into<String>, point_cost: u32) -> Self {
        Self {
            id,
            name: name.into(),
            point_cost,
            ..Self::default()
        }
    }

    pub fn with_modifier(mut self, name: impl Into<String>, value: i32) -> Self {
        self.modifiers.push((name.into(), value));
        self
    }

    pub fn with_command(mut self, command: CommandRef) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species_required.push(species.into());
        self
    }

    #[inline]
    pub fn is_species_restricted(&self) -> bool {
        !self.species_required.is_empty()
    }
}

/// Learned skills plus the tables derived from them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillSet {
    skills: Vec<Arc<Skill>>,
    modifiers: ModifierTable,
    commands: CommandSet,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns `skill`. Returns false if a skill with the same id is already known.
    ///
    /// Derived tables are not rebuilt; call [`rebuild`](Self::rebuild) afterwards.
    pub fn learn(&mut self, skill: Arc<Skill>) -> bool {
        if self.has_skill(skill.id) {
            return false;
        }
        self.skills.push(skill);
        true
    }

    /// Forgets the skill with `skill_id`. Returns whether one was removed.
    pub fn forget(&mut self, skill_id: u32) -> bool {
        match self.skills.iter().position(|skill| skill.id == skill_id) {
            Some(index) => {
                self.skills.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_skill(&self, skill_id: u32) -> bool {
        self.skills.iter().any(|skill| skill.id == skill_id)
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter().map(|skill| skill.as_ref())
    }

    /// Rebuilds both derived tables.
    pub fn rebuild(&mut self) {
        self.rebuild_modifiers();
        self.rebuild_commands();
    }

    /// Recomputes the modifier table from scratch.
    pub fn rebuild_modifiers(&mut self) {
        self.modifiers.clear();
        for skill in &self.skills {
            for (name, value) in &skill.modifiers {
                self.modifiers.accumulate(name, *value);
            }
        }
    }

    /// Recomputes the learned commands, skipping species-restricted skills.
    pub fn rebuild_commands(&mut self) {
        self.commands.clear();
        for skill in self.skills.iter().filter(|skill| !skill.is_species_restricted()) {
            for command in &skill.commands {
                self.commands.insert(*command);
            }
        }
    }

    pub fn modifiers(&self) -> &ModifierTable {
        &self.modifiers
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub fn modifier(&self, name: &str) -> Option<i32> {
        self.modifiers.get(name)
    }

    /// Modifier value or [`CreatureConfig::MODIFIER_ABSENT`].
    pub fn modifier_value(&self, name: &str) -> i32 {
        self.modifiers.value_or_sentinel(name)
    }

    pub fn set_modifier(&mut self, name: &str, value: i32) -> bool {
        self.modifiers.set(name, value)
    }

    /// Adjusts the table only. Callers outside the crate go through
    /// [`adjust_modifier`], which also resyncs players.
    pub(crate) fn adjust_modifier(&mut self, name: &str, delta: i32) -> bool {
        self.modifiers.adjust(name, delta)
    }

    /// Registers a modifier outside of skill aggregation (e.g. before a buff adjusts it).
    pub fn register_modifier(&mut self, name: &str, value: i32) {
        if self.modifiers.get(name).is_none() {
            self.modifiers.accumulate(name, value);
        }
    }

    /// O(1) check against the command index.
    pub fn has_command(&self, code: u32) -> bool {
        self.commands.contains_code(code)
    }

    /// Skill points still available out of [`CreatureConfig::SKILL_POINT_POOL`].
    pub fn skill_points_left(&self) -> u32 {
        let spent: u32 = self.skills.iter().map(|skill| skill.point_cost).sum();
        CreatureConfig::SKILL_POINT_POOL.saturating_sub(spent)
    }
}

/// Adjusts a registered modifier and resynchronizes player clients.
///
/// Returns `Ok(false)` without notifying if the modifier is not registered.
/// A player receives the whole modifier table, not just the changed entry.
pub fn adjust_modifier(
    creature: &mut Creature,
    name: &str,
    delta: i32,
    env: &Env<'_>,
) -> Result<bool, OracleError> {
    if !creature.skills.adjust_modifier(name, delta) {
        debug!(creature = %creature.id, modifier = name, "adjusting unregistered modifier ignored");
        return Ok(false);
    }

    if creature.is_player() {
        // TODO: send an incremental skill-mod delta once clients accept one.
        env.notifier()?.notify_skill_mods_baseline(creature);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brawler() -> Arc<Skill> {
        Arc::new(
            Skill::new(1, "combat_brawler_novice", 40)
                .with_modifier("unarmed_accuracy", 5)
                .with_modifier("unarmed_speed", 2)
                .with_command(CommandRef::new(100, 0xA1B2_C3D4)),
        )
    }

    fn marksman() -> Arc<Skill> {
        Arc::new(
            Skill::new(2, "combat_marksman_novice", 40)
                .with_modifier("unarmed_accuracy", 3)
                .with_command(CommandRef::new(100, 0xA1B2_C3D4))
                .with_command(CommandRef::new(101, 0x0BAD_F00D)),
        )
    }

    #[test]
    fn modifiers_from_multiple_skills_are_summed() {
        let mut set = SkillSet::new();
        set.learn(brawler());
        set.learn(marksman());
        set.rebuild_modifiers();

        assert_eq!(set.modifier("unarmed_accuracy"), Some(8));
        assert_eq!(set.modifier("unarmed_speed"), Some(2));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut set = SkillSet::new();
        set.learn(brawler());
        set.learn(marksman());
        set.rebuild();
        let first = set.clone();
        set.rebuild();
        assert_eq!(set, first);
    }

    #[test]
    fn commands_are_deduplicated_and_indexed() {
        let mut set = SkillSet::new();
        set.learn(brawler());
        set.learn(marksman());
        set.rebuild_commands();

        assert_eq!(set.commands().len(), 2);
        assert!(set.has_command(0xA1B2_C3D4));
        assert!(set.has_command(0x0BAD_F00D));
        assert!(!set.has_command(0xDEAD_BEEF));
    }

    #[test]
    fn species_skills_grant_no_commands() {
        let mut set = SkillSet::new();
        set.learn(Arc::new(
            Skill::new(9, "species_wookiee", 0)
                .with_species("wookiee")
                .with_modifier("strength", 10)
                .with_command(CommandRef::new(300, 0x1234)),
        ));
        set.rebuild();

        assert!(!set.has_command(0x1234));
        assert_eq!(set.modifier("strength"), Some(10));
    }

    #[test]
    fn skill_points_are_derived() {
        let mut set = SkillSet::new();
        assert_eq!(set.skill_points_left(), 250);
        set.learn(brawler());
        set.learn(marksman());
        assert_eq!(set.skill_points_left(), 170);
        assert!(!set.learn(brawler()));
        assert!(set.forget(1));
        assert_eq!(set.skill_points_left(), 210);
        assert!(!set.has_skill(1));
    }

    #[test]
    fn absent_modifier_reports_sentinel() {
        let set = SkillSet::new();
        assert_eq!(set.modifier_value("anything"), CreatureConfig::MODIFIER_ABSENT);
    }

    #[test]
    fn adjustments_resync_players_only() {
        use crate::state::{EntityId, NpcProfile, PlayerData};
        use crate::test_support::{Recorded, Recorder};

        let recorder = Recorder::default();
        let env = recorder.env();
        let mut player = Creature::player(EntityId(1), PlayerData::default());
        let mut npc = Creature::npc(EntityId(2), NpcProfile::npc());
        for creature in [&mut player, &mut npc] {
            creature.skills.learn(brawler());
            creature.skills.rebuild();
            assert!(adjust_modifier(creature, "unarmed_speed", 3, &env).unwrap());
            assert!(!adjust_modifier(creature, "rifle_speed", 3, &env).unwrap());
            assert_eq!(creature.skills.modifier("unarmed_speed"), Some(5));
        }

        assert_eq!(recorder.take(), vec![Recorded::SkillMods(EntityId(1))]);
    }
}
