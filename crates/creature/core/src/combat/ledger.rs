use tracing::warn;

use crate::state::EntityId;

/// Entities currently hostile toward one creature, in engagement order.
///
/// Never holds the same id twice. The relation is one-directional: `A` listing
/// `B` says nothing about `B`'s ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenderLedger {
    entries: Vec<EntityId>,
}

impl DefenderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id`. Returns false and logs if it is already listed.
    pub fn add(&mut self, id: EntityId) -> bool {
        if self.contains(id) {
            warn!(defender = %id, "defender already added");
            return false;
        }
        self.entries.push(id);
        true
    }

    /// Removes `id` and returns the position it occupied.
    pub fn remove(&mut self, id: EntityId) -> Option<usize> {
        let index = self.entries.iter().position(|entry| *entry == id)?;
        self.entries.remove(index);
        Some(index)
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains(&id)
    }

    /// Empties the ledger. Clearing an already empty ledger is logged and returns false.
    pub fn clear(&mut self) -> bool {
        if self.entries.is_empty() {
            warn!("clearing defenders albeit empty");
            return false;
        }
        self.entries.clear();
        true
    }

    /// Takes every entry out, leaving the ledger empty.
    pub fn drain(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.entries)
    }

    pub fn first(&self) -> Option<EntityId> {
        self.entries.first().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_add_leaves_length_unchanged() {
        let mut ledger = DefenderLedger::new();
        assert!(ledger.add(EntityId(1)));
        assert!(!ledger.add(EntityId(1)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn remove_reports_position() {
        let mut ledger = DefenderLedger::new();
        ledger.add(EntityId(1));
        ledger.add(EntityId(2));
        ledger.add(EntityId(3));

        assert_eq!(ledger.remove(EntityId(2)), Some(1));
        assert_eq!(ledger.remove(EntityId(2)), None);
        assert_eq!(ledger.iter().collect::<Vec<_>>(), vec![EntityId(1), EntityId(3)]);
    }

    #[test]
    fn clear_reports_empty_ledger() {
        let mut ledger = DefenderLedger::new();
        assert!(!ledger.clear());
        ledger.add(EntityId(4));
        assert!(ledger.clear());
        assert!(ledger.is_empty());
    }
}
