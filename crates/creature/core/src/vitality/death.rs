//! Death and its cascade through other creatures.

use tracing::{debug, info, warn};

use super::{VitalityError, halt_regeneration, notify_posture_change};
use crate::combat::{CombatError, clear_combat_state, make_peace, remove_defender};
use crate::env::{
    CloneDestination, CloneOption, Env, Structure, StructureKind, SystemMessage, compute_seed,
};
use crate::state::{
    Capabilities, CreatureState, CreoGroup, EntityId, Millis, NpcProfile, Posture, WorldState,
};

/// Seed context of the corpse despawn roll.
const DESPAWN_ROLL: u32 = 0;

/// What [`die`] did besides the common transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathReport {
    /// The creature was already dead; nothing changed.
    AlreadyDead,
    Player {
        /// Destinations offered; zero when no facility was in range.
        clone_options: usize,
    },
    Creature { despawn_delay: Millis },
}

/// Kills a creature.
///
/// Every creature has its incap streak reset, its posture set to `Dead`, its
/// regeneration halted and its state flags cleared. Players then release their
/// duels and defenders and are offered cloning; everything else makes peace
/// with its defenders and is queued for destruction.
pub fn die(
    world: &mut WorldState,
    env: &Env<'_>,
    id: EntityId,
) -> Result<DeathReport, VitalityError> {
    let creature = world.creature_mut(id).ok_or(VitalityError::CreatureNotFound(id))?;
    if creature.posture() == Posture::Dead {
        debug!(creature = %id, "already dead");
        return Ok(DeathReport::AlreadyDead);
    }
    let notifier = env.notifier()?;

    if let Some(recovery) = creature.incap.reset() {
        env.scheduler()?.cancel(recovery);
    }
    notifier.notify_incap_timer(creature);
    if creature.is_player() {
        notifier.notify_system_message(id, SystemMessage::VICTIM_DEAD);
    }

    creature.change_posture(Posture::Dead);
    halt_regeneration(creature, env)?;
    creature.state = CreatureState::empty();
    notify_posture_change(creature, env)?;
    debug!(creature = %id, classification = %creature.classification(), "died");

    if creature.is_player() {
        player_death(world, env, id)
    } else {
        creature_death(world, env, id)
    }
}

fn player_death(
    world: &mut WorldState,
    env: &Env<'_>,
    id: EntityId,
) -> Result<DeathReport, VitalityError> {
    let notifier = env.notifier()?;
    let creature = world.creature_mut(id).ok_or(VitalityError::CreatureNotFound(id))?;
    let position = creature.position;
    let defenders = creature.defenders.drain();
    let (duels, bound_facility) = creature
        .player_data()
        .map(|player| (player.duel_list.clone(), player.predesignated_cloning_facility))
        .unwrap_or_default();

    for partner in duels {
        let Some(data) = world.creature_mut(partner).and_then(|c| c.player_data_mut()) else {
            continue;
        };
        if data.remove_from_duel_list(id) {
            notifier.notify_pvp_status(id, partner);
            notifier.notify_pvp_status(partner, id);
        }
    }

    for defender in defenders {
        let Some(other) = world.creature_mut(defender) else {
            debug!(creature = %id, %defender, "defender vanished before death cascade");
            continue;
        };
        remove_defender(other, id, env)?;
        if other.is_player() {
            notifier.notify_pvp_status(id, defender);
        }
        notifier.notify_pvp_status(defender, id);
        if other.defenders.is_empty() {
            clear_combat_state(other, env)?;
        }
    }

    let config = env.config()?;
    let structures = env.structures()?.find_in_range(
        position,
        StructureKind::Building,
        config.cloning_search_radius(),
    );

    let mut nearest: Option<&Structure> = None;
    let mut bound = None;
    for structure in &structures {
        if Some(structure.id) == bound_facility {
            bound = Some(structure);
        }
        if structure.is_cloning_facility()
            && nearest.is_none_or(|known| {
                position.distance_2d(&structure.position) < position.distance_2d(&known.position)
            })
        {
            nearest = Some(structure);
        }
    }

    let mut options = Vec::with_capacity(2);
    if let Some(facility) = nearest.filter(|s| s.has_spawn_points()) {
        options.push(CloneOption {
            facility: facility.id,
            destination: CloneDestination::Closest,
        });
        if let Some(player) = world.creature_mut(id).and_then(|c| c.player_data_mut()) {
            player.nearest_cloning_facility = Some(facility.id);
        }
    }
    if let Some(facility) = bound.filter(|s| s.has_spawn_points()) {
        options.push(CloneOption {
            facility: facility.id,
            destination: CloneDestination::Bound,
        });
    }

    if options.is_empty() {
        info!(player = %id, "no cloning facility available");
    } else {
        env.destruction()?
            .schedule_forced_cloning(id, config.forced_cloning_delay());
        env.clone_selector()?.present_clone_selection(id, &options);
    }
    Ok(DeathReport::Player {
        clone_options: options.len(),
    })
}

fn creature_death(
    world: &mut WorldState,
    env: &Env<'_>,
    id: EntityId,
) -> Result<DeathReport, VitalityError> {
    // Each round removes the front entry, so the initial length bounds the loop.
    let rounds = world.creature(id).map_or(0, |c| c.defenders.len());
    for _ in 0..rounds {
        let Some(front) = world.creature(id).and_then(|c| c.defenders.first()) else {
            break;
        };
        match make_peace(world, env, id, front) {
            Ok(_) | Err(CombatError::DefenderNotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }
        if let Some(creature) = world.creature_mut(id)
            && creature.defenders.first() == Some(front)
        {
            warn!(creature = %id, defender = %front, "dropping defender that could not make peace");
            creature.defenders.remove(front);
        }
    }

    let config = env.config()?;
    let seed = compute_seed(world.seed, world.clock(), id, DESPAWN_ROLL);
    let creature = world.creature_mut(id).ok_or(VitalityError::CreatureNotFound(id))?;
    let profile: NpcProfile = creature.npc_profile().copied().unwrap_or_default();

    let despawn_delay = match profile.group {
        CreoGroup::AttackableObject => {
            if profile.capabilities.contains(Capabilities::DEATH_ANIMATION) {
                env.npc()?.play_death_animation(id);
            }
            config.attackable_object_despawn_delay()
        }
        group => {
            if group == CreoGroup::AttackableCreature
                && let Some(weapon) = creature.equipped_weapon.take()
            {
                debug!(creature = %id, %weapon, "weapon unequipped");
            }
            let (min, max) = config.despawn_delay_range();
            Millis(env.rng()?.range_exclusive(seed, min.0, max.0))
        }
    };

    if profile.capabilities.contains(Capabilities::NPC) {
        env.npc()?.distribute_attacker_xp(id);
    }
    env.destruction()?.schedule_destruction(id, despawn_delay);
    debug!(creature = %id, %despawn_delay, "queued for destruction");

    Ok(DeathReport::Creature { despawn_delay })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::engage;
    use crate::env::BuildingFamily;
    use crate::state::{Creature, PlayerData, Position};
    use crate::test_support::{Recorded, Recorder};
    use crate::vitality::incap;

    const PLAYER: EntityId = EntityId(1);
    const WOLF: EntityId = EntityId(2);
    const RIVAL: EntityId = EntityId(3);
    const DUELIST: EntityId = EntityId(4);
    const BANDIT: EntityId = EntityId(5);

    fn facility(id: u64, x: f32, family: BuildingFamily, spawn_points: u32) -> Structure {
        Structure {
            id: EntityId(id),
            kind: StructureKind::Building,
            family,
            position: Position::new(x, 0.0, 0.0),
            spawn_points,
        }
    }

    fn battlefield(recorder: &Recorder) -> WorldState {
        let env = recorder.env();
        let mut world = WorldState::new(11);
        let mut data = PlayerData::new(0, false);
        data.add_to_duel_list(DUELIST);
        data.predesignated_cloning_facility = Some(EntityId(102));
        world.spawn(Creature::player(PLAYER, data)).unwrap();

        let mut duelist = PlayerData::new(1, true);
        duelist.add_to_duel_list(PLAYER);
        world.spawn(Creature::player(DUELIST, duelist)).unwrap();
        world
            .spawn(Creature::player(RIVAL, PlayerData::default()))
            .unwrap();
        world.spawn(Creature::npc(WOLF, NpcProfile::npc())).unwrap();
        world.spawn(Creature::npc(BANDIT, NpcProfile::npc())).unwrap();

        engage(&mut world, &env, PLAYER, WOLF).unwrap();
        engage(&mut world, &env, PLAYER, RIVAL).unwrap();
        engage(&mut world, &env, WOLF, BANDIT).unwrap();
        recorder.take();
        world
    }

    #[test]
    fn player_death_releases_duels_and_defenders() {
        let recorder = Recorder::default().with_structures(vec![
            facility(100, 3000.0, BuildingFamily::CloningFacility, 2),
            facility(101, 500.0, BuildingFamily::CloningFacility, 1),
            facility(102, 9000.0, BuildingFamily::CloningFacility, 1),
            facility(103, 10.0, BuildingFamily::Cantina, 4),
        ]);
        let env = recorder.env();
        let mut world = battlefield(&recorder);

        let report = die(&mut world, &env, PLAYER).unwrap();
        // Facility 102 lies outside the search radius.
        assert_eq!(report, DeathReport::Player { clone_options: 1 });

        let player = world.creature(PLAYER).unwrap();
        assert_eq!(player.posture(), Posture::Dead);
        assert!(player.defenders.is_empty());
        assert_eq!(
            player.player_data().unwrap().nearest_cloning_facility,
            Some(EntityId(101))
        );

        let wolf = world.creature(WOLF).unwrap();
        assert_eq!(wolf.defenders.iter().collect::<Vec<_>>(), vec![BANDIT]);
        assert!(wolf.state.contains(CreatureState::ENGAGED));

        let rival = world.creature(RIVAL).unwrap();
        assert!(rival.defenders.is_empty());
        assert!(!rival.state.intersects(CreatureState::ENGAGED));

        let duelist = world.creature(DUELIST).unwrap();
        assert!(duelist.player_data().unwrap().duel_list.is_empty());

        let events = recorder.take();
        assert!(events.contains(&Recorded::System(PLAYER, SystemMessage::VICTIM_DEAD)));
        assert!(events.contains(&Recorded::Pvp {
            subject: PLAYER,
            observer: DUELIST
        }));
        assert!(events.contains(&Recorded::Pvp {
            subject: DUELIST,
            observer: PLAYER
        }));
        assert!(events.contains(&Recorded::DefenderChange(RIVAL, 0, PLAYER)));
        assert!(events.contains(&Recorded::CombatState(RIVAL)));
        assert!(!events.contains(&Recorded::CombatState(WOLF)));
        assert!(events.contains(&Recorded::ForcedCloning(PLAYER, Millis(600_000))));
        assert!(events.contains(&Recorded::CloneSelection(
            PLAYER,
            vec![CloneOption {
                facility: EntityId(101),
                destination: CloneDestination::Closest
            }]
        )));
    }

    #[test]
    fn bound_facility_is_offered_after_closest() {
        let recorder = Recorder::default().with_structures(vec![
            facility(101, 500.0, BuildingFamily::CloningFacility, 1),
            facility(102, 800.0, BuildingFamily::PlayerHouse, 1),
        ]);
        let env = recorder.env();
        let mut world = battlefield(&recorder);

        assert_eq!(
            die(&mut world, &env, PLAYER).unwrap(),
            DeathReport::Player { clone_options: 2 }
        );
        assert!(recorder.events().contains(&Recorded::CloneSelection(
            PLAYER,
            vec![
                CloneOption {
                    facility: EntityId(101),
                    destination: CloneDestination::Closest
                },
                CloneOption {
                    facility: EntityId(102),
                    destination: CloneDestination::Bound
                },
            ]
        )));
    }

    #[test]
    fn no_facility_leaves_player_dead_without_fallback() {
        let recorder = Recorder::default().with_structures(vec![facility(
            101,
            500.0,
            BuildingFamily::CloningFacility,
            0,
        )]);
        let env = recorder.env();
        let mut world = battlefield(&recorder);

        assert_eq!(
            die(&mut world, &env, PLAYER).unwrap(),
            DeathReport::Player { clone_options: 0 }
        );
        let events = recorder.take();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, Recorded::ForcedCloning(..) | Recorded::CloneSelection(..)))
        );
        assert_eq!(world.creature(PLAYER).unwrap().posture(), Posture::Dead);
    }

    #[test]
    fn npc_death_makes_peace_and_queues_destruction() {
        let recorder = Recorder::default();
        let env = recorder.env();
        let mut world = battlefield(&recorder);

        let report = die(&mut world, &env, WOLF).unwrap();
        let DeathReport::Creature { despawn_delay } = report else {
            panic!("unexpected report {report:?}");
        };
        assert!((180_000..300_000).contains(&despawn_delay.0));

        assert!(world.creature(WOLF).unwrap().defenders.is_empty());
        assert!(!world.creature(PLAYER).unwrap().defenders.contains(WOLF));
        assert!(world.creature(BANDIT).unwrap().defenders.is_empty());

        let events = recorder.take();
        assert!(events.contains(&Recorded::Peaceful(BANDIT)));
        assert!(events.contains(&Recorded::AttackerXp(WOLF)));
        assert_eq!(events.last(), Some(&Recorded::Destruction(WOLF, despawn_delay)));
    }

    #[test]
    fn despawn_roll_is_deterministic() {
        let delays: Vec<_> = (0..2)
            .map(|_| {
                let recorder = Recorder::default();
                let mut world = battlefield(&recorder);
                die(&mut world, &recorder.env(), BANDIT).unwrap()
            })
            .collect();
        assert_eq!(delays[0], delays[1]);
    }

    #[test]
    fn attackable_object_despawns_almost_immediately() {
        let recorder = Recorder::default();
        let env = recorder.env();
        let mut world = WorldState::new(0);
        let crate_profile =
            NpcProfile::new(CreoGroup::AttackableObject, Capabilities::DEATH_ANIMATION);
        world.spawn(Creature::npc(EntityId(50), crate_profile)).unwrap();

        assert_eq!(
            die(&mut world, &env, EntityId(50)).unwrap(),
            DeathReport::Creature {
                despawn_delay: Millis(500)
            }
        );
        let events = recorder.take();
        assert!(events.contains(&Recorded::DeathAnimation(EntityId(50))));
        assert!(!events.contains(&Recorded::AttackerXp(EntityId(50))));
    }

    #[test]
    fn attackable_creature_drops_weapon() {
        let recorder = Recorder::default();
        let env = recorder.env();
        let mut world = WorldState::new(0);
        let profile = NpcProfile::new(CreoGroup::AttackableCreature, Capabilities::NPC);
        world
            .spawn(Creature::npc(EntityId(60), profile).with_weapon(EntityId(61)))
            .unwrap();

        die(&mut world, &env, EntityId(60)).unwrap();
        assert!(world.creature(EntityId(60)).unwrap().equipped_weapon.is_none());
    }

    #[test]
    fn unresolvable_defenders_are_drained() {
        let recorder = Recorder::default();
        let env = recorder.env();
        let mut world = WorldState::new(0);
        let mut npc = Creature::npc(EntityId(70), NpcProfile::npc());
        npc.defenders.add(EntityId(998));
        npc.defenders.add(EntityId(999));
        world.spawn(npc).unwrap();

        die(&mut world, &env, EntityId(70)).unwrap();
        assert!(world.creature(EntityId(70)).unwrap().defenders.is_empty());
    }

    #[test]
    fn dying_twice_changes_nothing() {
        let recorder = Recorder::default();
        let env = recorder.env();
        let mut world = battlefield(&recorder);

        die(&mut world, &env, BANDIT).unwrap();
        recorder.take();
        assert_eq!(die(&mut world, &env, BANDIT).unwrap(), DeathReport::AlreadyDead);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn death_cancels_pending_recovery() {
        let recorder = Recorder::default();
        let env = recorder.env();
        let mut world = battlefield(&recorder);
        incap(&mut world, &env, PLAYER).unwrap();
        let recovery = world.creature(PLAYER).unwrap().incap.recovery.unwrap();

        die(&mut world, &env, PLAYER).unwrap();
        assert!(recorder.take().contains(&Recorded::Cancelled(recovery)));
        assert_eq!(world.creature(PLAYER).unwrap().incap.recovery, None);
    }
}
