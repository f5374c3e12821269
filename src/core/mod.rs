//! Core data structures for the terrain world
//! Contains cell/chunk coordinates, terrain layers and tile assignments.

pub mod coords;
pub mod terrain;

// Re-export commonly used types
pub use coords::{ALL_DIRECTIONS, CellCoord, ChunkCoord, Direction};
pub use terrain::{
    ALL_LAYERS, AtlasAssignment, LAYER_COUNT, TerrainId, TerrainLayer, TerrainLayerSet,
    TerrainMask, TileRef,
};
