//! Spatial lookup of world structures.

use crate::state::{EntityId, Position};

/// Broad category used to filter range queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StructureKind {
    Building,
    Installation,
}

/// What a building is used for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BuildingFamily {
    #[default]
    Generic,
    CloningFacility,
    Cantina,
    Hospital,
    PlayerHouse,
}

/// Snapshot of a structure returned by a range query.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    pub id: EntityId,
    pub kind: StructureKind,
    pub family: BuildingFamily,
    pub position: Position,
    /// Number of spawn points; facilities without any cannot receive clones.
    pub spawn_points: u32,
}

impl Structure {
    #[inline]
    pub fn is_cloning_facility(&self) -> bool {
        self.family == BuildingFamily::CloningFacility
    }

    #[inline]
    pub fn has_spawn_points(&self) -> bool {
        self.spawn_points > 0
    }
}

/// Range queries against the world's structures.
pub trait StructureOracle: Send + Sync {
    /// All structures of `kind` within `radius` (planar) of `origin`, in any order.
    fn find_in_range(&self, origin: Position, kind: StructureKind, radius: f32) -> Vec<Structure>;
}
