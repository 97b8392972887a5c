//! In-memory spatial index of buildings and installations.

use creature_core::{Position, Structure, StructureKind, StructureOracle};

/// Linear-scan index; world cells hold few enough structures that a grid is not
/// worth maintaining.
#[derive(Clone, Debug, Default)]
pub struct StructureIndex {
    structures: Vec<Structure>,
}

impl StructureIndex {
    pub fn new(structures: Vec<Structure>) -> Self {
        Self { structures }
    }

    /// Adds or replaces the structure with the same id.
    pub fn insert(&mut self, structure: Structure) {
        match self.structures.iter_mut().find(|s| s.id == structure.id) {
            Some(existing) => *existing = structure,
            None => self.structures.push(structure),
        }
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl StructureOracle for StructureIndex {
    fn find_in_range(&self, origin: Position, kind: StructureKind, radius: f32) -> Vec<Structure> {
        self.structures
            .iter()
            .filter(|s| s.kind == kind && origin.distance_2d(&s.position) <= radius)
            .cloned()
            .collect()
    }
}
