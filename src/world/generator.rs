//! Thread-safe chunk generation pipeline
//!
//! Runs on background workers: classifies a chunk plus a border buffer,
//! shares that terrain through the cache, autotiles every interior cell,
//! scatters trees and finally publishes the whole chunk in one commit.

use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;

use crate::constants::CHUNK_BUFFER;
use crate::core::coords::{CellCoord, ChunkCoord};
use crate::core::terrain::{AtlasAssignment, TerrainLayer, TerrainLayerSet};
use crate::tiles::rules::AutotileRuleTable;
use crate::tiles::solver;
use crate::tiles::tileset::SpecialTiles;
use crate::world::cache::TerrainCache;
use crate::world::classifier::{classify, is_deep_water};
use crate::world::decoration::place_trees;
use crate::world::noise::NoiseSource;

/// Summary of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedChunk {
    pub coord: ChunkCoord,
    pub new_terrain_cells: usize,
    pub atlas_cells: usize,
    pub trees: usize,
}

/// Shared, read-only generation context handed to every worker.
pub struct ChunkGenerator {
    noise: Arc<dyn NoiseSource>,
    rules: Arc<AutotileRuleTable>,
    special: SpecialTiles,
    cache: Arc<TerrainCache>,
    chunk_size: i32,
    tree_freq: f32,
    pub seed: u32,
}

impl ChunkGenerator {
    pub fn new(
        noise: Arc<dyn NoiseSource>,
        rules: Arc<AutotileRuleTable>,
        special: SpecialTiles,
        cache: Arc<TerrainCache>,
        chunk_size: i32,
        tree_freq: f32,
        seed: u32,
    ) -> Self {
        ChunkGenerator {
            noise,
            rules,
            special,
            cache,
            chunk_size,
            tree_freq,
            seed,
        }
    }

    pub fn cache(&self) -> &Arc<TerrainCache> {
        &self.cache
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Generates and publishes a chunk. Never fails; missing neighbors read as empty.
    pub fn generate_chunk(&self, coord: ChunkCoord) -> GeneratedChunk {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(self.chunk_seed(coord));

        // Classify the chunk and its buffer locally
        let mut samples: FxHashMap<CellCoord, f32> = FxHashMap::default();
        let mut terrain: FxHashMap<CellCoord, TerrainLayerSet> = FxHashMap::default();
        for cell in coord.cells_with_margin(self.chunk_size, CHUNK_BUFFER) {
            let n = self.noise.sample(cell);
            samples.insert(cell, n);
            terrain.insert(cell, classify(n));
        }

        // Share it so concurrently generated neighbors see real borders
        let new_terrain_cells = self.cache.commit_terrain_batch(terrain.iter());

        // Prefetch neighborhoods in one pass over the cache
        let interior: Vec<CellCoord> = coord.cells(self.chunk_size).collect();
        let neighborhoods = self.cache.neighbor_masks(&interior);

        // Autotile every layer of every interior cell
        let mut atlas: FxHashMap<CellCoord, AtlasAssignment> = FxHashMap::default();
        for (cell, neighbors) in interior.iter().zip(&neighborhoods) {
            let mut assignment = AtlasAssignment::default();
            if let Some(set) = terrain.get(cell) {
                let n = samples.get(cell).copied().unwrap_or_default();
                for (layer, id) in set.iter() {
                    let tile = if layer == TerrainLayer::Water && is_deep_water(n) {
                        Some(self.special.deep_water)
                    } else {
                        solver::resolve(id, neighbors, self.rules.rules_for(id), &mut rng)
                    };
                    if let Some(tile) = tile {
                        assignment.set(layer, tile);
                    }
                }
            }
            atlas.insert(*cell, assignment);
        }

        let trees = place_trees(
            &interior,
            &terrain,
            &mut atlas,
            &self.cache,
            &self.special,
            self.tree_freq,
            &mut rng,
        );

        // Publish the chunk in one piece
        let assignments: Vec<_> = interior
            .iter()
            .map(|cell| (*cell, atlas.get(cell).copied().unwrap_or_default()))
            .collect();
        let atlas_cells = self.cache.commit_atlas_chunk(assignments);

        tracing::debug!(
            "Generated chunk ({}, {}) in {:?}: {} new terrain cells, {} trees",
            coord.0.x,
            coord.0.y,
            start.elapsed(),
            new_terrain_cells,
            trees
        );

        GeneratedChunk {
            coord,
            new_terrain_cells,
            atlas_cells,
            trees,
        }
    }

    /// Per-chunk RNG seed so a chunk's draws don't depend on which worker runs it.
    fn chunk_seed(&self, coord: ChunkCoord) -> u64 {
        let mut hash = self.seed as u64;
        hash = hash.wrapping_add(coord.0.x as u32 as u64).wrapping_mul(73856093);
        hash = hash.wrapping_add(coord.0.y as u32 as u64).wrapping_mul(19349663);
        hash ^ (hash >> 16)
    }
}
