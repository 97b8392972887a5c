//! A single status effect instance.

use crate::state::{EffectId, EntityId, Millis};

/// Icon / category code shown on the client. Not unique per instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffIcon(pub u32);

impl std::fmt::Display for BuffIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "icon:{}", self.0)
    }
}

/// Modifier changes applied at attach time, on every tick and at the end.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffAttribute {
    pub modifier: String,
    pub initial: i32,
    pub per_tick: i32,
    pub on_final: i32,
}

impl BuffAttribute {
    pub fn new(modifier: impl Into<String>, initial: i32, per_tick: i32, on_final: i32) -> Self {
        Self {
            modifier: modifier.into(),
            initial,
            per_tick,
            on_final,
        }
    }

    /// Adds `amount` on attach and takes it away again at the end.
    pub fn flat(modifier: impl Into<String>, amount: i32) -> Self {
        Self::new(modifier, amount, 0, -amount)
    }
}

/// Hook progress; each hook fires at most once and in this order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BuffPhase {
    #[default]
    Created,
    Initialized,
    Finalized,
}

/// Whether the entry still counts or waits for the next cleanup pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntryTag {
    #[default]
    Active,
    PendingRemoval,
}

/// A list of `(modifier, delta)` changes produced by a hook.
pub type ModifierDeltas = Vec<(String, i32)>;

/// A timed modifier bundle.
///
/// Hooks do not touch the creature themselves: they return the deltas to apply,
/// so the caller can route them through the skill table and notify players.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buff {
    id: EffectId,
    icon: BuffIcon,
    target: Option<EntityId>,
    interval: Millis,
    ticks_remaining: u32,
    attributes: Vec<BuffAttribute>,
    cancelled: bool,
    registered: bool,
    tag: EntryTag,
    phase: BuffPhase,
}

impl Buff {
    /// An effect that ticks `ticks` times, `interval` apart.
    pub fn new(icon: BuffIcon, interval: Millis, ticks: u32) -> Self {
        Self {
            id: EffectId::UNASSIGNED,
            icon,
            target: None,
            interval,
            ticks_remaining: ticks,
            attributes: Vec::new(),
            cancelled: false,
            registered: false,
            tag: EntryTag::Active,
            phase: BuffPhase::Created,
        }
    }

    pub fn with_attribute(mut self, attribute: BuffAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn icon(&self) -> BuffIcon {
        self.icon
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn interval(&self) -> Millis {
        self.interval
    }

    pub fn ticks_remaining(&self) -> u32 {
        self.ticks_remaining
    }

    pub fn attributes(&self) -> &[BuffAttribute] {
        &self.attributes
    }

    pub fn phase(&self) -> BuffPhase {
        self.phase
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_pending_removal(&self) -> bool {
        self.tag == EntryTag::PendingRemoval
    }

    /// Ticks are only honoured while the effect is live.
    pub fn is_live(&self) -> bool {
        !self.cancelled && self.tag == EntryTag::Active && self.phase == BuffPhase::Initialized
    }

    pub(crate) fn is_registered(&self) -> bool {
        self.registered
    }

    pub(crate) fn attach(&mut self, id: EffectId, target: EntityId) {
        self.id = id;
        self.target = Some(target);
    }

    pub(crate) fn set_registered(&mut self, registered: bool) {
        self.registered = registered;
    }

    pub(crate) fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub(crate) fn mark_pending_removal(&mut self) {
        self.tag = EntryTag::PendingRemoval;
    }

    /// Initial hook. Returns nothing if it already fired.
    pub(crate) fn initialize(&mut self) -> ModifierDeltas {
        if self.phase != BuffPhase::Created {
            return Vec::new();
        }
        self.phase = BuffPhase::Initialized;
        self.deltas(|attribute| attribute.initial)
    }

    /// One scheduler tick. Returns the deltas and whether the effect ran out.
    pub(crate) fn tick(&mut self) -> (ModifierDeltas, bool) {
        if self.ticks_remaining == 0 {
            return (Vec::new(), true);
        }
        self.ticks_remaining -= 1;
        (self.deltas(|attribute| attribute.per_tick), self.ticks_remaining == 0)
    }

    /// Final hook. Fires only after the initial hook and only once.
    pub(crate) fn finalize(&mut self) -> ModifierDeltas {
        if self.phase != BuffPhase::Initialized {
            return Vec::new();
        }
        self.phase = BuffPhase::Finalized;
        self.deltas(|attribute| attribute.on_final)
    }

    /// Drops attributes and the target link before the entry is discarded.
    pub(crate) fn detach(&mut self) {
        self.attributes.clear();
        self.target = None;
    }

    fn deltas(&self, pick: impl Fn(&BuffAttribute) -> i32) -> ModifierDeltas {
        self.attributes
            .iter()
            .map(|attribute| (attribute.modifier.clone(), pick(attribute)))
            .filter(|(_, delta)| *delta != 0)
            .collect()
    }
}
