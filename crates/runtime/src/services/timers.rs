//! Deterministic timer queue keyed by world time.
//!
//! The wheel never looks at a wall clock. The simulation worker moves it forward
//! with [`TimerWheel::set_now`] and drains due entries with
//! [`TimerWheel::pop_due`], so timers fire in `(due, handle)` order regardless of
//! how the host schedules tasks.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use creature_core::{
    DestructionRegistry, EffectId, EntityId, Millis, ScheduleHandle, Scheduler, TimedEvent,
};
use tracing::trace;

/// Smallest interval accepted for recurring effect ticks.
const MIN_INTERVAL: Millis = Millis(1);

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Routed back into the core through the engine's dispatcher.
    Event(TimedEvent),
    Destruction { entity: EntityId },
    ForcedCloning { player: EntityId },
}

/// A timer removed from the queue because its time came.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: ScheduleHandle,
    pub due: Millis,
    pub kind: TimerKind,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    kind: TimerKind,
    interval: Option<Millis>,
}

#[derive(Debug, Default)]
struct Inner {
    now: Millis,
    next_handle: u64,
    queue: BTreeMap<(Millis, ScheduleHandle), Entry>,
    due_by_handle: HashMap<ScheduleHandle, Millis>,
    recurring: HashMap<EffectId, ScheduleHandle>,
}

impl Inner {
    fn insert(
        &mut self,
        delay: Millis,
        kind: TimerKind,
        interval: Option<Millis>,
    ) -> ScheduleHandle {
        self.next_handle += 1;
        let handle = ScheduleHandle(self.next_handle);
        self.insert_at(self.now + delay, handle, Entry { kind, interval });
        handle
    }

    fn insert_at(&mut self, due: Millis, handle: ScheduleHandle, entry: Entry) {
        self.queue.insert((due, handle), entry);
        self.due_by_handle.insert(handle, due);
    }

    fn cancel(&mut self, handle: ScheduleHandle) -> bool {
        match self.due_by_handle.remove(&handle) {
            Some(due) => self.queue.remove(&(due, handle)).is_some(),
            None => false,
        }
    }
}

/// Scheduler and destruction queue used by the simulation worker.
#[derive(Debug, Default)]
pub struct TimerWheel {
    inner: Mutex<Inner>,
}

impl TimerWheel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn now(&self) -> Millis {
        self.lock().now
    }

    /// Moves the wheel's notion of "now"; never goes backwards.
    pub fn set_now(&self, now: Millis) {
        let mut inner = self.lock();
        inner.now = inner.now.max(now);
    }

    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Due time of the next pending timer.
    pub fn next_due(&self) -> Option<Millis> {
        self.lock().queue.keys().next().map(|(due, _)| *due)
    }

    /// Removes the earliest timer due at or before `limit`.
    ///
    /// A recurring effect tick is re-armed one interval later under the same
    /// handle before it is returned, unless it was deregistered meanwhile.
    pub fn pop_due(&self, limit: Millis) -> Option<FiredTimer> {
        let mut inner = self.lock();
        let (&(due, handle), _) = inner.queue.first_key_value()?;
        if due > limit {
            return None;
        }
        let entry = inner.queue.remove(&(due, handle))?;
        inner.due_by_handle.remove(&handle);

        if let Some(interval) = entry.interval
            && let TimerKind::Event(TimedEvent::EffectTick { effect, .. }) = entry.kind
            && inner.recurring.get(&effect) == Some(&handle)
        {
            inner.insert_at(due + interval, handle, entry);
        }

        trace!(%handle, %due, "timer fired");
        Some(FiredTimer {
            handle,
            due,
            kind: entry.kind,
        })
    }
}

impl Scheduler for TimerWheel {
    fn schedule(&self, event: TimedEvent, delay: Millis) -> ScheduleHandle {
        self.lock().insert(delay, TimerKind::Event(event), None)
    }

    fn cancel(&self, handle: ScheduleHandle) {
        if !self.lock().cancel(handle) {
            trace!(%handle, "cancelled timer was not pending");
        }
    }

    fn register_recurring(&self, entity: EntityId, effect: EffectId, interval: Millis) {
        let interval = interval.max(MIN_INTERVAL);
        let mut inner = self.lock();
        if let Some(previous) = inner.recurring.remove(&effect) {
            inner.cancel(previous);
        }
        let kind = TimerKind::Event(TimedEvent::EffectTick { entity, effect });
        let handle = inner.insert(interval, kind, Some(interval));
        inner.recurring.insert(effect, handle);
    }

    fn deregister_recurring(&self, effect: EffectId) {
        let mut inner = self.lock();
        if let Some(handle) = inner.recurring.remove(&effect) {
            inner.cancel(handle);
        }
    }
}

impl DestructionRegistry for TimerWheel {
    fn schedule_destruction(&self, entity: EntityId, delay: Millis) {
        self.lock().insert(delay, TimerKind::Destruction { entity }, None);
    }

    fn schedule_forced_cloning(&self, player: EntityId, delay: Millis) {
        self.lock().insert(delay, TimerKind::ForcedCloning { player }, None);
    }
}
