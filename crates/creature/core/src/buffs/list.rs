use super::{Buff, BuffIcon};
use crate::state::EffectId;

/// Effects attached to one creature, in attach order.
///
/// Entries tagged for removal stay in place until [`reap`](Self::reap) so that
/// nothing is dropped while a tick or cascade is walking the list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveBuffs {
    entries: Vec<Buff>,
}

impl ActiveBuffs {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a non-removed effect carries `icon`.
    pub fn exists(&self, icon: BuffIcon) -> bool {
        self.get(icon).is_some()
    }

    /// First non-removed effect carrying `icon`.
    pub fn get(&self, icon: BuffIcon) -> Option<&Buff> {
        self.entries
            .iter()
            .find(|buff| buff.icon() == icon && !buff.is_pending_removal())
    }

    pub fn find(&self, id: EffectId) -> Option<&Buff> {
        self.entries.iter().find(|buff| buff.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: EffectId) -> Option<&mut Buff> {
        self.entries.iter_mut().find(|buff| buff.id() == id)
    }

    /// Number of entries, including ones waiting for cleanup.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.entries.iter()
    }

    pub(crate) fn push(&mut self, buff: Buff) {
        self.entries.push(buff);
    }

    /// Removes every pending entry, keeping survivors in order.
    pub(crate) fn reap(&mut self) -> Vec<Buff> {
        if !self.entries.iter().any(Buff::is_pending_removal) {
            return Vec::new();
        }
        let (reaped, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(Buff::is_pending_removal);
        self.entries = kept;
        reaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityId, Millis};

    fn attached(id: u64, icon: u32) -> Buff {
        let mut buff = Buff::new(BuffIcon(icon), Millis(1000), 1);
        buff.attach(EffectId(id), EntityId(1));
        buff
    }

    #[test]
    fn reap_keeps_survivor_order() {
        let mut list = ActiveBuffs::new();
        for (id, icon) in [(1, 10), (2, 20), (3, 30), (4, 40)] {
            list.push(attached(id, icon));
        }
        list.find_mut(EffectId(2)).unwrap().mark_pending_removal();
        list.find_mut(EffectId(4)).unwrap().mark_pending_removal();

        assert!(!list.exists(BuffIcon(20)));
        assert_eq!(list.count(), 4);

        let reaped = list.reap();
        assert_eq!(reaped.len(), 2);
        let ids: Vec<_> = list.iter().map(Buff::id).collect();
        assert_eq!(ids, vec![EffectId(1), EffectId(3)]);
    }

    #[test]
    fn get_skips_pending_entries() {
        let mut list = ActiveBuffs::new();
        list.push(attached(1, 10));
        list.push(attached(2, 10));
        list.find_mut(EffectId(1)).unwrap().mark_pending_removal();

        assert_eq!(list.get(BuffIcon(10)).map(Buff::id), Some(EffectId(2)));
    }
}
