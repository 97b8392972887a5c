//! Topic-based event bus for runtime events.
//!
//! Every observer notification raised by the core is published here as a typed
//! event. Consumers subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CombatEvent, CreatureEvent, PlayerEvent};
