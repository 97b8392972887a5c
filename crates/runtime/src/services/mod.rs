//! Runtime implementations of the core's side-effecting collaborators.
mod notifier;
mod timers;

pub use notifier::BusNotifier;
pub use timers::{FiredTimer, TimerKind, TimerWheel};
