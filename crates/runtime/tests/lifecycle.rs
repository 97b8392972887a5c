use std::sync::Arc;

use creature_core::{
    ApplyMode, ApplyOutcome, Buff, BuffAttribute, BuffIcon, BuildingFamily, CloneDestination,
    CloneOption, Creature, CreatureConfig, DeathReport, EngineError, EntityId, IncapOutcome,
    Millis, NpcProfile, PlayerData, Position, Posture, Skill, Structure, StructureKind,
    VitalityError,
};
use creature_runtime::{
    CombatEvent, CreatureEvent, Event, PlayerEvent, Runtime, RuntimeConfig, RuntimeError,
    StructureIndex, Topic,
};
use tokio::sync::broadcast;

const PLAYER: EntityId = EntityId(1);
const WOLF: EntityId = EntityId(2);
const CLONER: EntityId = EntityId(900);

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn postures(events: &[Event]) -> Vec<Posture> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Creature(CreatureEvent::PostureChanged { posture, .. }) => Some(*posture),
            _ => None,
        })
        .collect()
}

fn cloning_facility() -> StructureIndex {
    StructureIndex::new(vec![Structure {
        id: CLONER,
        kind: StructureKind::Building,
        family: BuildingFamily::CloningFacility,
        position: Position::new(120.0, 0.0, 40.0),
        spawn_points: 4,
    }])
}

async fn runtime_with_player() -> Runtime {
    let runtime = Runtime::builder()
        .config(RuntimeConfig::default())
        .structures(cloning_facility())
        .build()
        .await
        .expect("runtime should start");
    runtime
        .handle()
        .spawn(Creature::player(PLAYER, PlayerData::new(1, false)))
        .await
        .expect("player should spawn");
    runtime
}

#[tokio::test]
async fn incapacitated_player_recovers_when_timer_fires() {
    let runtime = runtime_with_player().await;
    let handle = runtime.handle();
    let mut creature_rx = handle.subscribe(Topic::Creature);

    let outcome = handle.incap(PLAYER).await.unwrap();
    assert!(matches!(outcome, IncapOutcome::Incapacitated { count: 1, .. }));

    let events = drain(&mut creature_rx);
    assert!(events.contains(&Event::Creature(CreatureEvent::IncapTimer {
        entity: PLAYER,
        duration: CreatureConfig::DEFAULT_BASE_INCAP_DURATION,
    })));
    assert_eq!(postures(&events), vec![Posture::Incapacitated]);

    // A second incap while down is ignored.
    assert_eq!(handle.incap(PLAYER).await.unwrap(), IncapOutcome::Ignored);

    let report = handle.advance_to(Millis(9_999)).await.unwrap();
    assert_eq!(report.fired, 0);
    let player = handle.creature(PLAYER).await.unwrap().unwrap();
    assert_eq!(player.posture(), Posture::Incapacitated);

    let report = handle.advance_to(Millis(10_000)).await.unwrap();
    assert_eq!(report.fired, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.clock, Millis(10_000));

    let player = handle.creature(PLAYER).await.unwrap().unwrap();
    assert_eq!(player.posture(), Posture::Upright);
    assert_eq!(player.incap.count, 1);
    assert_eq!(player.incap.recovery, None);

    let events = drain(&mut creature_rx);
    assert_eq!(postures(&events), vec![Posture::Upright]);
    assert!(events.contains(&Event::Creature(CreatureEvent::IncapTimer {
        entity: PLAYER,
        duration: Millis::ZERO,
    })));
}

#[tokio::test]
async fn standing_up_early_cancels_recovery() {
    let runtime = runtime_with_player().await;
    let handle = runtime.handle();

    handle.incap(PLAYER).await.unwrap();
    let previous = handle.set_posture(PLAYER, Posture::Upright).await.unwrap();
    assert_eq!(previous, Posture::Incapacitated);

    let report = handle.advance_to(Millis(60_000)).await.unwrap();
    assert_eq!(report.fired, 0);
    assert_eq!(
        handle.creature(PLAYER).await.unwrap().unwrap().posture(),
        Posture::Upright
    );
}

#[tokio::test]
async fn third_incap_in_window_kills_and_offers_cloning() {
    let runtime = runtime_with_player().await;
    let handle = runtime.handle();
    let mut player_rx = handle.subscribe(Topic::Player);

    for (round, recover_at) in [(1, 10_000), (2, 20_000)] {
        let outcome = handle.incap(PLAYER).await.unwrap();
        assert!(matches!(outcome, IncapOutcome::Incapacitated { count, .. } if count == round));
        handle.advance_to(Millis(recover_at)).await.unwrap();
    }

    let outcome = handle.incap(PLAYER).await.unwrap();
    assert_eq!(
        outcome,
        IncapOutcome::Killed(DeathReport::Player { clone_options: 1 })
    );

    let player = handle.creature(PLAYER).await.unwrap().unwrap();
    assert_eq!(player.posture(), Posture::Dead);
    assert_eq!(player.incap.count, 0);
    assert_eq!(
        player.player_data().and_then(|p| p.nearest_cloning_facility),
        Some(CLONER)
    );

    let events = drain(&mut player_rx);
    assert_eq!(
        events,
        vec![
            Event::Player(PlayerEvent::SystemMessage {
                player: PLAYER,
                message: "@base_player:victim_dead".to_string(),
            }),
            Event::Player(PlayerEvent::CloneSelection {
                player: PLAYER,
                options: vec![CloneOption {
                    facility: CLONER,
                    destination: CloneDestination::Closest,
                }],
            }),
        ]
    );

    let deadline = Millis(20_000) + CreatureConfig::DEFAULT_FORCED_CLONING_DELAY;
    handle.advance_to(deadline).await.unwrap();
    assert_eq!(
        drain(&mut player_rx),
        vec![Event::Player(PlayerEvent::ForcedCloning {
            player: PLAYER,
            facility: Some(CLONER),
        })]
    );
}

#[tokio::test]
async fn creature_death_makes_peace_and_despawns() {
    let runtime = runtime_with_player().await;
    let handle = runtime.handle();
    handle
        .spawn(Creature::npc(WOLF, NpcProfile::npc()))
        .await
        .unwrap();
    assert!(handle.engage(PLAYER, WOLF).await.unwrap());

    let mut combat_rx = handle.subscribe(Topic::Combat);
    let mut creature_rx = handle.subscribe(Topic::Creature);

    let DeathReport::Creature { despawn_delay } = handle.kill(WOLF).await.unwrap() else {
        panic!("wolf should take the creature death path");
    };
    assert!(despawn_delay >= CreatureConfig::DEFAULT_DESPAWN_DELAY_MIN);
    assert!(despawn_delay < CreatureConfig::DEFAULT_DESPAWN_DELAY_MAX);

    let player = handle.creature(PLAYER).await.unwrap().unwrap();
    assert!(player.defenders.is_empty());

    let combat = drain(&mut combat_rx);
    assert!(combat.contains(&Event::Combat(CombatEvent::EnteredPeace { entity: WOLF })));
    assert!(combat.contains(&Event::Combat(CombatEvent::AttackerXpAwarded { entity: WOLF })));

    // Killing a corpse again changes nothing.
    assert_eq!(handle.kill(WOLF).await.unwrap(), DeathReport::AlreadyDead);

    handle.advance_to(despawn_delay).await.unwrap();
    assert!(handle.creature(WOLF).await.unwrap().is_none());
    assert!(drain(&mut creature_rx)
        .contains(&Event::Creature(CreatureEvent::Despawned { entity: WOLF })));
}

#[tokio::test]
async fn buff_ticks_follow_world_time() {
    let runtime = runtime_with_player().await;
    let handle = runtime.handle();
    let fortitude =
        Arc::new(Skill::new(10, "science_medic_novice", 10).with_modifier("constitution", 10));
    assert!(handle.learn_skill(PLAYER, fortitude).await.unwrap());

    let buff = Buff::new(BuffIcon(0xC0FFEE), Millis(1_000), 3)
        .with_attribute(BuffAttribute::new("constitution", 5, 1, -8));
    let ApplyOutcome::Applied(effect) = handle
        .apply_buff(PLAYER, buff.clone(), ApplyMode::EXCLUSIVE)
        .await
        .unwrap()
    else {
        panic!("buff should attach");
    };

    let constitution = |creature: Creature| creature.skills.modifier("constitution");
    assert_eq!(
        constitution(handle.creature(PLAYER).await.unwrap().unwrap()),
        Some(15)
    );

    assert_eq!(
        handle
            .apply_buff(PLAYER, buff, ApplyMode::EXCLUSIVE)
            .await
            .unwrap(),
        ApplyOutcome::Rejected
    );

    handle.advance_to(Millis(2_000)).await.unwrap();
    assert_eq!(
        constitution(handle.creature(PLAYER).await.unwrap().unwrap()),
        Some(17)
    );

    let report = handle.advance_to(Millis(10_000)).await.unwrap();
    assert_eq!(report.fired, 1);
    let player = handle.creature(PLAYER).await.unwrap().unwrap();
    assert_eq!(player.skills.modifier("constitution"), Some(10));
    assert!(!handle.remove_buff(PLAYER, effect).await.unwrap());
}

#[tokio::test]
async fn unknown_creatures_are_validation_errors() {
    let runtime = Runtime::start(RuntimeConfig::default()).await.unwrap();
    let handle = runtime.handle();

    let err = handle.incap(EntityId(404)).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Engine(EngineError::Vitality(VitalityError::CreatureNotFound(EntityId(
            404
        ))))
    ));
    assert!(!err.severity().is_recoverable());

    handle
        .spawn(Creature::npc(WOLF, NpcProfile::npc()))
        .await
        .unwrap();
    assert!(handle
        .spawn(Creature::npc(WOLF, NpcProfile::npc()))
        .await
        .is_err());
}

#[tokio::test]
async fn shutdown_joins_the_worker() {
    let runtime = Runtime::start(RuntimeConfig::default()).await.unwrap();
    assert_eq!(runtime.handle().clock().await.unwrap(), Millis::ZERO);
    runtime.shutdown().await.unwrap();
}
