use crate::config::CreatureConfig;

/// Faction standing of a creature: faction id → points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FactionTable {
    entries: Vec<(u32, i32)>,
}

impl FactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a faction; an existing entry keeps its value.
    pub fn insert(&mut self, faction: u32, points: i32) {
        if self.points(faction).is_none() {
            self.entries.push((faction, points));
        }
    }

    pub fn points(&self, faction: u32) -> Option<i32> {
        self.entries
            .iter()
            .find(|(id, _)| *id == faction)
            .map(|(_, points)| *points)
    }

    /// Points for `faction`, or [`CreatureConfig::FACTION_ABSENT`].
    pub fn points_or_sentinel(&self, faction: u32) -> i32 {
        self.points(faction).unwrap_or(CreatureConfig::FACTION_ABSENT)
    }

    /// Adds `delta` to a registered faction. Returns false if it is not registered.
    pub fn update(&mut self, faction: u32, delta: i32) -> bool {
        match self.entries.iter_mut().find(|(id, _)| *id == faction) {
            Some((_, points)) => {
                *points += delta;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u32, i32)> {
        self.entries.iter()
    }
}
