//! Append-only store of classified terrain and resolved tiles.
//!
//! Both maps sit behind one mutex. Every method takes the lock once and
//! releases it before returning, so callers can never hold it across other work.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::core::coords::{ALL_DIRECTIONS, CellCoord, ChunkCoord};
use crate::core::terrain::{AtlasAssignment, TerrainLayer, TerrainLayerSet, TerrainMask};

#[derive(Default)]
struct CacheMaps {
    terrain: FxHashMap<CellCoord, TerrainLayerSet>,
    atlas: FxHashMap<CellCoord, AtlasAssignment>,
}

impl CacheMaps {
    fn insert_terrain(&mut self, cell: CellCoord, set: TerrainLayerSet) -> bool {
        match self.terrain.get(&cell) {
            None => {
                self.terrain.insert(cell, set);
                true
            }
            // Overlapping chunk buffers classify the same cell to the same value.
            Some(existing) if *existing == set => false,
            Some(existing) => {
                if cfg!(debug_assertions) {
                    panic!("terrain for {cell:?} already committed as {existing:?}, got {set:?}");
                }
                tracing::warn!("Rejected conflicting terrain commit for {:?}", cell);
                false
            }
        }
    }

    fn insert_atlas(&mut self, cell: CellCoord, assignment: AtlasAssignment) -> bool {
        if self.atlas.contains_key(&cell) {
            if cfg!(debug_assertions) {
                panic!("atlas for {cell:?} committed twice");
            }
            tracing::warn!("Rejected duplicate atlas commit for {:?}", cell);
            return false;
        }
        self.atlas.insert(cell, assignment);
        true
    }
}

#[derive(Default)]
pub struct TerrainCache {
    maps: Mutex<CacheMaps>,
}

impl TerrainCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a cell's terrain. Returns `false` if the cell already had terrain.
    pub fn commit_terrain(&self, cell: CellCoord, set: TerrainLayerSet) -> bool {
        self.maps.lock().insert_terrain(cell, set)
    }

    /// Stores many cells under one lock acquisition. Returns how many were new.
    pub fn commit_terrain_batch<'a>(
        &self,
        cells: impl IntoIterator<Item = (&'a CellCoord, &'a TerrainLayerSet)>,
    ) -> usize {
        let mut maps = self.maps.lock();
        cells
            .into_iter()
            .filter(|(cell, set)| maps.insert_terrain(**cell, **set))
            .count()
    }

    pub fn get_terrain(&self, cell: CellCoord) -> Option<TerrainLayerSet> {
        self.maps.lock().terrain.get(&cell).copied()
    }

    /// Stores a cell's tiles. Returns `false` if the cell already had tiles.
    pub fn commit_atlas(&self, cell: CellCoord, assignment: AtlasAssignment) -> bool {
        self.maps.lock().insert_atlas(cell, assignment)
    }

    /// Publishes a whole chunk's tiles at once so readers never see half of it.
    pub fn commit_atlas_chunk(&self, assignments: Vec<(CellCoord, AtlasAssignment)>) -> usize {
        let mut maps = self.maps.lock();
        assignments
            .into_iter()
            .filter(|(cell, assignment)| maps.insert_atlas(*cell, *assignment))
            .count()
    }

    pub fn get_atlas(&self, cell: CellCoord) -> Option<AtlasAssignment> {
        self.maps.lock().atlas.get(&cell).copied()
    }

    pub fn has_atlas(&self, cell: CellCoord) -> bool {
        self.maps.lock().atlas.contains_key(&cell)
    }

    /// Chunk tiles are published atomically, so the origin cell stands for the chunk.
    pub fn has_chunk_atlas(&self, chunk: ChunkCoord, chunk_size: i32) -> bool {
        self.has_atlas(chunk.origin(chunk_size))
    }

    /// Copies out every cell of a generated chunk, or `None` if it is not generated yet.
    pub fn chunk_atlas(
        &self,
        chunk: ChunkCoord,
        chunk_size: i32,
    ) -> Option<Vec<(CellCoord, AtlasAssignment)>> {
        let maps = self.maps.lock();
        chunk
            .cells(chunk_size)
            .map(|cell| maps.atlas.get(&cell).map(|a| (cell, *a)))
            .collect()
    }

    /// Terrain present around each cell, one mask per direction. Missing cells are empty.
    pub fn neighbor_masks(&self, cells: &[CellCoord]) -> Vec<[TerrainMask; 8]> {
        let maps = self.maps.lock();
        cells
            .iter()
            .map(|cell| {
                ALL_DIRECTIONS.map(|dir| {
                    maps.terrain
                        .get(&cell.neighbor(dir))
                        .map(TerrainLayerSet::mask)
                        .unwrap_or_default()
                })
            })
            .collect()
    }

    /// True when `pred` holds for every cell in the window, including missing ones.
    pub fn terrain_window_all(
        &self,
        center: CellCoord,
        radius: i32,
        mut pred: impl FnMut(Option<&TerrainLayerSet>) -> bool,
    ) -> bool {
        let maps = self.maps.lock();
        center.window(radius).all(|cell| pred(maps.terrain.get(&cell)))
    }

    /// True when any committed tile assignment in the window satisfies `pred`.
    pub fn atlas_window_any(
        &self,
        center: CellCoord,
        radius: i32,
        mut pred: impl FnMut(&AtlasAssignment) -> bool,
    ) -> bool {
        let maps = self.maps.lock();
        center
            .window(radius)
            .any(|cell| maps.atlas.get(&cell).is_some_and(&mut pred))
    }

    /// Land (sand, grass or cliff) with committed terrain can be walked on.
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.get_terrain(cell).is_some_and(|set| {
            set.has(TerrainLayer::Sand)
                || set.has(TerrainLayer::Grass)
                || set.has(TerrainLayer::Cliff)
        })
    }

    pub fn terrain_len(&self) -> usize {
        self.maps.lock().terrain.len()
    }

    pub fn atlas_len(&self) -> usize {
        self.maps.lock().atlas.len()
    }
}
