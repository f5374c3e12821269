// Core module with fundamental types
pub mod core;

// Tile-set metadata and autotiling
pub mod tiles;

// World module with generation and streaming
pub mod world;

// Other modules
pub mod config;
pub mod constants;
pub mod error;

// Re-exports
pub use config::WorldSettings;
pub use constants::*;
pub use core::{AtlasAssignment, CellCoord, ChunkCoord, Direction, TerrainLayer, TileRef};
pub use error::{ConfigError, TilesetError};
pub use tiles::Tileset;
pub use world::{ChunkRenderer, TickStats, WorldStreamer};
