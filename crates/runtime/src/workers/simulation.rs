//! Simulation worker that owns the authoritative [`WorldState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs them
//! through [`CreatureEngine`], and fires due timers when world time advances.
//! Notifications raised by the core are published to the event bus as they
//! happen, so a reply always arrives after its events.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use creature_core::{
    ApplyMode, ApplyOutcome, Buff, CoreError, Creature, CreatureEngine, DeathReport, EffectId,
    EngineError, EntityId, Env, IncapOutcome, Millis, PeaceOutcome, Posture, Scheduler, Skill,
    WorldState,
};

use crate::api::{Result, engine_error};
use crate::events::{CreatureEvent, Event, EventBus, PlayerEvent};
use crate::oracle::OracleManager;
use crate::services::{BusNotifier, FiredTimer, TimerKind, TimerWheel};

/// Commands that can be sent to the simulation worker
pub enum Command {
    Spawn {
        creature: Box<Creature>,
        reply: oneshot::Sender<Result<()>>,
    },
    LearnSkill {
        entity: EntityId,
        skill: Arc<Skill>,
        reply: oneshot::Sender<Result<bool>>,
    },
    Engage {
        attacker: EntityId,
        defender: EntityId,
        reply: oneshot::Sender<Result<bool>>,
    },
    MakePeace {
        attacker: EntityId,
        defender: EntityId,
        reply: oneshot::Sender<Result<PeaceOutcome>>,
    },
    Incap {
        entity: EntityId,
        reply: oneshot::Sender<Result<IncapOutcome>>,
    },
    Kill {
        entity: EntityId,
        reply: oneshot::Sender<Result<DeathReport>>,
    },
    SetPosture {
        entity: EntityId,
        posture: Posture,
        reply: oneshot::Sender<Result<Posture>>,
    },
    ApplyBuff {
        target: EntityId,
        buff: Box<Buff>,
        mode: ApplyMode,
        reply: oneshot::Sender<Result<ApplyOutcome>>,
    },
    RemoveBuff {
        target: EntityId,
        effect: EffectId,
        reply: oneshot::Sender<Result<bool>>,
    },
    /// Advance world time, firing due timers in order.
    Advance {
        to: Millis,
        reply: oneshot::Sender<AdvanceReport>,
    },
    QueryCreature {
        entity: EntityId,
        reply: oneshot::Sender<Option<Creature>>,
    },
    QueryClock {
        reply: oneshot::Sender<Millis>,
    },
}

/// Summary of one clock advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// World clock after the advance.
    pub clock: Millis,
    /// Timers that came due, including stale ones.
    pub fired: usize,
    /// Timers whose handling returned an error (logged, not fatal).
    pub failed: usize,
}

/// Background task that processes creature commands.
pub struct SimulationWorker {
    state: WorldState,
    oracles: OracleManager,
    notifier: BusNotifier,
    timers: TimerWheel,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        state: WorldState,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        tracing::info!(
            "SimulationWorker initialized with {} creatures at {}",
            state.len(),
            state.clock()
        );

        let timers = TimerWheel::new();
        timers.set_now(state.clock());

        Self {
            state,
            oracles,
            notifier: BusNotifier::new(event_bus.clone()),
            timers,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        debug!("SimulationWorker stopped");
    }

    /// Runs `op` against the world with every collaborator wired in.
    fn with_engine<T>(&mut self, op: impl FnOnce(&mut CreatureEngine<'_>, &Env<'_>) -> T) -> T {
        let env = self.oracles.as_env(&self.notifier, &self.timers);
        let mut engine = CreatureEngine::new(&mut self.state);
        op(&mut engine, &env)
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Spawn { creature, reply } => {
                let id = creature.id;
                let result = self.state.spawn(*creature).map_err(engine_error);
                if result.is_ok() {
                    debug!(creature = %id, "spawned");
                }
                respond(reply, result, "Spawn");
            }
            Command::LearnSkill {
                entity,
                skill,
                reply,
            } => {
                let result = self
                    .with_engine(|engine, _| engine.learn_skill(entity, skill))
                    .map_err(engine_error);
                respond(reply, result, "LearnSkill");
            }
            Command::Engage {
                attacker,
                defender,
                reply,
            } => {
                let result = self
                    .with_engine(|engine, env| engine.engage(env, attacker, defender))
                    .map_err(engine_error);
                respond(reply, result, "Engage");
            }
            Command::MakePeace {
                attacker,
                defender,
                reply,
            } => {
                let result = self
                    .with_engine(|engine, env| engine.make_peace(env, attacker, defender))
                    .map_err(engine_error);
                respond(reply, result, "MakePeace");
            }
            Command::Incap { entity, reply } => {
                let result = self
                    .with_engine(|engine, env| engine.incap(env, entity))
                    .map_err(engine_error);
                respond(reply, result, "Incap");
            }
            Command::Kill { entity, reply } => {
                let result = self
                    .with_engine(|engine, env| engine.die(env, entity))
                    .map_err(engine_error);
                respond(reply, result, "Kill");
            }
            Command::SetPosture {
                entity,
                posture,
                reply,
            } => {
                let result = self
                    .with_engine(|engine, env| engine.set_posture(env, entity, posture))
                    .map_err(engine_error);
                respond(reply, result, "SetPosture");
            }
            Command::ApplyBuff {
                target,
                buff,
                mode,
                reply,
            } => {
                let result = self
                    .with_engine(|engine, env| engine.apply_buff(env, target, *buff, mode))
                    .map_err(engine_error);
                respond(reply, result, "ApplyBuff");
            }
            Command::RemoveBuff {
                target,
                effect,
                reply,
            } => {
                let result = self
                    .with_engine(|engine, env| engine.remove_buff(env, target, effect))
                    .map_err(engine_error);
                respond(reply, result, "RemoveBuff");
            }
            Command::Advance { to, reply } => {
                let report = self.advance(to);
                respond(reply, report, "Advance");
            }
            Command::QueryCreature { entity, reply } => {
                respond(reply, self.state.creature(entity).cloned(), "QueryCreature");
            }
            Command::QueryClock { reply } => {
                respond(reply, self.state.clock(), "QueryClock");
            }
        }
    }

    fn advance(&mut self, to: Millis) -> AdvanceReport {
        let mut report = AdvanceReport::default();

        // Timers armed while firing are picked up in the same pass if they are
        // already due.
        while let Some(timer) = self.timers.pop_due(to) {
            self.state.advance_clock(timer.due);
            self.timers.set_now(timer.due);
            report.fired += 1;

            if let Err(err) = self.fire(timer) {
                report.failed += 1;
                warn!(
                    handle = %timer.handle,
                    code = err.error_code(),
                    error = %err,
                    "timer handling failed"
                );
            }
        }

        self.state.advance_clock(to);
        self.timers.set_now(to);
        report.clock = self.state.clock();
        report
    }

    fn fire(&mut self, timer: FiredTimer) -> std::result::Result<(), EngineError> {
        match timer.kind {
            TimerKind::Event(event) => {
                let outcome =
                    self.with_engine(|engine, env| engine.dispatch(env, timer.handle, event))?;
                debug!(handle = %timer.handle, ?event, ?outcome, "timer dispatched");
            }
            TimerKind::Destruction { entity } => self.destroy(entity),
            TimerKind::ForcedCloning { player } => self.force_cloning(player),
        }
        Ok(())
    }

    /// Removes a corpse and disarms every timer that still points at it.
    fn destroy(&mut self, entity: EntityId) {
        let Some(creature) = self.state.remove(entity) else {
            debug!(creature = %entity, "destruction of missing creature ignored");
            return;
        };
        for buff in creature.buffs.iter() {
            self.timers.deregister_recurring(buff.id());
        }
        for handle in [creature.incap.recovery, creature.regen_task]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(handle);
        }
        debug!(creature = %entity, "despawned");
        self.event_bus
            .publish(Event::Creature(CreatureEvent::Despawned { entity }));
    }

    /// Clones a player who never picked a destination, if still dead.
    fn force_cloning(&mut self, player: EntityId) {
        let Some(creature) = self.state.creature(player) else {
            debug!(%player, "forced cloning for missing player ignored");
            return;
        };
        if creature.posture() != Posture::Dead {
            debug!(%player, "player already revived; forced cloning skipped");
            return;
        }
        let facility = creature
            .player_data()
            .and_then(|data| data.nearest_cloning_facility);
        debug!(%player, ?facility, "forcing cloning");
        self.event_bus
            .publish(Event::Player(PlayerEvent::ForcedCloning { player, facility }));
    }
}

fn respond<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
    if reply.send(value).is_err() {
        debug!("{} reply channel closed (caller dropped)", command);
    }
}
