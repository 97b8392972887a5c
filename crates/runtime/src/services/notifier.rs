//! Observer and AI hooks that publish to the [`EventBus`].

use creature_core::{
    CloneOption, CloneSelector, Creature, EntityId, Notifier, NpcBehavior, SystemMessage,
};

use crate::events::{CombatEvent, CreatureEvent, Event, EventBus, PlayerEvent};

/// Turns every core notification into a typed event.
#[derive(Clone, Debug)]
pub struct BusNotifier {
    bus: EventBus,
}

impl BusNotifier {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    fn creature(&self, event: CreatureEvent) {
        self.bus.publish(Event::Creature(event));
    }

    fn combat(&self, event: CombatEvent) {
        self.bus.publish(Event::Combat(event));
    }

    fn player(&self, event: PlayerEvent) {
        self.bus.publish(Event::Player(event));
    }
}

impl Notifier for BusNotifier {
    fn notify_posture(&self, creature: &Creature) {
        self.creature(CreatureEvent::PostureChanged {
            entity: creature.id,
            posture: creature.posture(),
        });
    }

    fn notify_movement_profile(&self, creature: &Creature) {
        self.creature(CreatureEvent::MovementChanged {
            entity: creature.id,
            locomotion: *creature.movement().current(),
        });
    }

    fn notify_incap_timer(&self, creature: &Creature) {
        self.creature(CreatureEvent::IncapTimer {
            entity: creature.id,
            duration: creature.incap.current_duration,
        });
    }

    fn notify_combat_state(&self, creature: &Creature) {
        self.combat(CombatEvent::StateChanged {
            entity: creature.id,
            state: creature.state,
        });
    }

    fn notify_defender_change(&self, creature: &Creature, index: usize, removed: EntityId) {
        self.combat(CombatEvent::DefenderRemoved {
            entity: creature.id,
            index,
            defender: removed,
        });
    }

    fn notify_pvp_status(&self, subject: EntityId, observer: EntityId) {
        self.combat(CombatEvent::PvpStatus { subject, observer });
    }

    fn notify_system_message(&self, player: EntityId, message: SystemMessage) {
        self.player(PlayerEvent::SystemMessage {
            player,
            message: message.to_string(),
        });
    }

    fn notify_skill_mods_baseline(&self, creature: &Creature) {
        let modifiers = creature
            .skills
            .modifiers()
            .iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect();
        self.creature(CreatureEvent::SkillModsBaseline {
            entity: creature.id,
            modifiers,
        });
    }
}

impl NpcBehavior for BusNotifier {
    fn enter_peaceful(&self, creature: EntityId) {
        self.combat(CombatEvent::EnteredPeace { entity: creature });
    }

    fn play_death_animation(&self, creature: EntityId) {
        self.combat(CombatEvent::DeathAnimation { entity: creature });
    }

    fn distribute_attacker_xp(&self, creature: EntityId) {
        self.combat(CombatEvent::AttackerXpAwarded { entity: creature });
    }
}

impl CloneSelector for BusNotifier {
    fn present_clone_selection(&self, player: EntityId, options: &[CloneOption]) {
        self.player(PlayerEvent::CloneSelection {
            player,
            options: options.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;
    use creature_core::{PlayerData, Posture};

    #[test]
    fn posture_and_messages_use_their_topics() {
        let bus = EventBus::with_capacity(4);
        let mut creature_rx = bus.subscribe(Topic::Creature);
        let mut player_rx = bus.subscribe(Topic::Player);
        let notifier = BusNotifier::new(bus);

        let player = Creature::player(EntityId(1), PlayerData::default());
        notifier.notify_posture(&player);
        notifier.notify_system_message(EntityId(1), SystemMessage::VICTIM_DEAD);

        assert_eq!(
            creature_rx.try_recv().unwrap(),
            Event::Creature(CreatureEvent::PostureChanged {
                entity: EntityId(1),
                posture: Posture::Upright,
            })
        );
        assert_eq!(
            player_rx.try_recv().unwrap(),
            Event::Player(PlayerEvent::SystemMessage {
                player: EntityId(1),
                message: "@base_player:victim_dead".to_string(),
            })
        );
    }
}
