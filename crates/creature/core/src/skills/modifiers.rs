//! Effective modifier table.

use crate::config::CreatureConfig;

/// Named integer adjustments, in first-seen order.
///
/// Order matters to clients that receive the table as a full baseline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModifierTable {
    entries: Vec<(String, i32)>,
}

impl ModifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` to `name`, registering it on first sight.
    pub fn accumulate(&mut self, name: &str, value: i32) {
        match self.entries.iter_mut().find(|(entry, _)| entry == name) {
            Some((_, current)) => *current += value,
            None => self.entries.push((name.to_owned(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| *value)
    }

    /// Value of `name`, or [`CreatureConfig::MODIFIER_ABSENT`] when unregistered.
    ///
    /// The sentinel means "no effect"; never add it to anything.
    pub fn value_or_sentinel(&self, name: &str) -> i32 {
        self.get(name).unwrap_or(CreatureConfig::MODIFIER_ABSENT)
    }

    /// Overwrites a registered modifier. Returns false if `name` is unregistered.
    pub fn set(&mut self, name: &str, value: i32) -> bool {
        match self.entries.iter_mut().find(|(entry, _)| entry == name) {
            Some((_, current)) => {
                *current = value;
                true
            }
            None => false,
        }
    }

    /// Adds `delta` to a registered modifier. Returns false if `name` is unregistered.
    pub fn adjust(&mut self, name: &str, delta: i32) -> bool {
        match self.entries.iter_mut().find(|(entry, _)| entry == name) {
            Some((_, current)) => {
                *current += delta;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_sums_repeated_names() {
        let mut table = ModifierTable::new();
        table.accumulate("unarmed_accuracy", 5);
        table.accumulate("unarmed_accuracy", 3);
        assert_eq!(table.get("unarmed_accuracy"), Some(8));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn set_and_adjust_fail_when_unregistered() {
        let mut table = ModifierTable::new();
        assert!(!table.set("healing_efficiency", 10));
        assert!(!table.adjust("healing_efficiency", 10));
        assert_eq!(table.value_or_sentinel("healing_efficiency"), -1000);

        table.accumulate("healing_efficiency", 0);
        assert!(table.set("healing_efficiency", 10));
        assert!(table.adjust("healing_efficiency", -4));
        assert_eq!(table.value_or_sentinel("healing_efficiency"), 6);
    }
}
