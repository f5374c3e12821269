//! World streaming modules
//! Contains noise sampling, classification, the shared cache, chunk generation,
//! background loading and per-tick scheduling.

pub mod cache;
pub mod classifier;
pub mod decoration;
pub mod generator;
pub mod loader;
pub mod noise;
pub mod scheduler;
pub mod spawn;
pub mod streamer;

// Re-export commonly used types
pub use cache::TerrainCache;
pub use generator::{ChunkGenerator, GeneratedChunk};
pub use loader::ChunkLoader;
pub use noise::{NoiseField, NoiseSource};
pub use scheduler::{ChunkRenderer, ChunkScheduler, TickStats};
pub use spawn::find_safe_spawn;
pub use streamer::WorldStreamer;
