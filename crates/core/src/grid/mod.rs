//! Hex world state: records, the typed patch that changes them, and the store
//! that keeps derived views in sync

pub mod hex_grid;
pub mod indexed_set;
pub mod record;

// Re-export main types
pub use hex_grid::{GridStats, HexGrid, PathSpec};
pub use indexed_set::IndexedSet;
pub use record::{
    EntityId, HexField, HexPatch, HexRecord, OccupantKind, Occupants, STRUCTURAL_FIELDS,
};
