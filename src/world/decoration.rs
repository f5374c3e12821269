use rand::Rng;
use rustc_hash::FxHashMap;

use crate::constants::{TREE_BIOME_RADIUS, TREE_SPACING_RADIUS};
use crate::core::coords::CellCoord;
use crate::core::terrain::{AtlasAssignment, TerrainLayer, TerrainLayerSet, TileRef};
use crate::tiles::solver::{self, WeightedTile};
use crate::tiles::tileset::SpecialTiles;
use crate::world::cache::TerrainCache;

/// Which kind of tree a cell can carry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TreeKind {
    Palm,
    Forest,
}

impl TreeKind {
    /// Terrain the whole surrounding window must share.
    fn ground(self) -> TerrainLayer {
        match self {
            TreeKind::Palm => TerrainLayer::Sand,
            TreeKind::Forest => TerrainLayer::Grass,
        }
    }

    pub fn for_cell(set: &TerrainLayerSet) -> Option<TreeKind> {
        if set.has(TerrainLayer::Cliff) {
            None
        } else if set.has(TerrainLayer::Grass) {
            Some(TreeKind::Forest)
        } else if set.has(TerrainLayer::Sand) {
            Some(TreeKind::Palm)
        } else {
            None
        }
    }
}

/// Scatters trees over the interior `cells`, writing the Env layer of `atlas`.
///
/// Windows that touch ungenerated cells reject the tree. Returns how many were placed.
pub fn place_trees<R: Rng + ?Sized>(
    cells: &[CellCoord],
    terrain: &FxHashMap<CellCoord, TerrainLayerSet>,
    atlas: &mut FxHashMap<CellCoord, AtlasAssignment>,
    cache: &TerrainCache,
    special: &SpecialTiles,
    tree_freq: f32,
    rng: &mut R,
) -> usize {
    let mut placed = 0;

    for &cell in cells {
        if rng.random::<f32>() >= tree_freq {
            continue;
        }
        let Some(kind) = terrain.get(&cell).and_then(TreeKind::for_cell) else {
            continue;
        };

        let ground = kind.ground();
        let biome_ok = cache.terrain_window_all(cell, TREE_BIOME_RADIUS, |set| {
            set.is_some_and(|s| s.has(ground) && !s.has(TerrainLayer::Cliff))
        });
        if !biome_ok {
            continue;
        }

        let crowded_locally = cell
            .window(TREE_SPACING_RADIUS)
            .any(|c| atlas.get(&c).is_some_and(|a| a.has(TerrainLayer::Env)));
        if crowded_locally
            || cache.atlas_window_any(cell, TREE_SPACING_RADIUS, |a| a.has(TerrainLayer::Env))
        {
            continue;
        }

        let tile = match kind {
            TreeKind::Palm => {
                let variants = special.palms.map(|tile| WeightedTile { tile, weight: 1.0 });
                solver::pick(&variants, rng).map_or(special.palms[0], |v| v.tile)
            }
            TreeKind::Forest => special.forest,
        };
        let tile: TileRef = if rng.random_bool(0.5) {
            tile.flipped()
        } else {
            tile
        };
        atlas.entry(cell).or_default().set(TerrainLayer::Env, tile);
        placed += 1;
    }

    placed
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::core::coords::ChunkCoord;

    fn paint(
        cache: &TerrainCache,
        chunk: ChunkCoord,
        set: TerrainLayerSet,
    ) -> FxHashMap<CellCoord, TerrainLayerSet> {
        let terrain: FxHashMap<_, _> = chunk.cells_with_margin(8, 3).map(|c| (c, set)).collect();
        cache.commit_terrain_batch(terrain.iter());
        terrain
    }

    fn env_count(atlas: &FxHashMap<CellCoord, AtlasAssignment>) -> usize {
        atlas.values().filter(|a| a.has(TerrainLayer::Env)).count()
    }

    #[test]
    fn eligibility_follows_layers() {
        let sand = TerrainLayerSet::default().with(TerrainLayer::Sand);
        let blend = sand.with(TerrainLayer::Grass);
        let rocky = blend.with(TerrainLayer::Cliff);
        let water = TerrainLayerSet::default().with(TerrainLayer::Water);
        assert_eq!(TreeKind::for_cell(&sand), Some(TreeKind::Palm));
        assert_eq!(TreeKind::for_cell(&blend), Some(TreeKind::Forest));
        assert_eq!(TreeKind::for_cell(&rocky), None);
        assert_eq!(TreeKind::for_cell(&water), None);
    }

    #[test]
    fn zero_frequency_never_places() {
        let cache = TerrainCache::new();
        let chunk = ChunkCoord::new(0, 0);
        let terrain = paint(&cache, chunk, TerrainLayerSet::default().with(TerrainLayer::Grass));
        let cells: Vec<_> = chunk.cells(8).collect();
        let mut atlas = FxHashMap::default();
        let mut rng = StdRng::seed_from_u64(5);

        let placed = place_trees(
            &cells,
            &terrain,
            &mut atlas,
            &cache,
            &SpecialTiles::default(),
            0.0,
            &mut rng,
        );
        assert_eq!(placed, 0);
        assert_eq!(env_count(&atlas), 0);
    }

    #[test]
    fn trees_keep_their_distance() {
        let cache = TerrainCache::new();
        let chunk = ChunkCoord::new(0, 0);
        let terrain = paint(&cache, chunk, TerrainLayerSet::default().with(TerrainLayer::Grass));
        let cells: Vec<_> = chunk.cells(8).collect();
        let mut atlas = FxHashMap::default();
        let mut rng = StdRng::seed_from_u64(9);
        let special = SpecialTiles::default();

        let placed = place_trees(&cells, &terrain, &mut atlas, &cache, &special, 1.0, &mut rng);
        assert!(placed > 0);

        let trees: Vec<_> = atlas
            .iter()
            .filter_map(|(c, a)| a.get(TerrainLayer::Env).map(|t| (*c, t)))
            .collect();
        assert_eq!(trees.len(), placed);
        for (i, (a, tile)) in trees.iter().enumerate() {
            assert_eq!(tile.atlas, special.forest.atlas);
            for (b, _) in &trees[i + 1..] {
                let d = (a.0 - b.0).abs();
                assert!(d.x.max(d.y) > TREE_SPACING_RADIUS, "{a:?} too close to {b:?}");
            }
        }
    }

    #[test]
    fn ungenerated_surroundings_block_trees() {
        let cache = TerrainCache::new();
        let chunk = ChunkCoord::new(0, 0);
        let set = TerrainLayerSet::default().with(TerrainLayer::Sand);
        // Only the chunk itself is known, so edge cells see missing neighbors.
        let terrain: FxHashMap<_, _> = chunk.cells(8).map(|c| (c, set)).collect();
        cache.commit_terrain_batch(terrain.iter());

        let edge: Vec<_> = chunk
            .cells(8)
            .filter(|c| c.x() < TREE_BIOME_RADIUS || c.y() < TREE_BIOME_RADIUS)
            .collect();
        let mut atlas = FxHashMap::default();
        let mut rng = StdRng::seed_from_u64(1);
        let placed = place_trees(
            &edge,
            &terrain,
            &mut atlas,
            &cache,
            &SpecialTiles::default(),
            1.0,
            &mut rng,
        );
        assert_eq!(placed, 0);
    }

    #[test]
    fn palms_use_both_variants() {
        let cache = TerrainCache::new();
        let special = SpecialTiles::default();
        let mut seen = [false; 2];
        // Chunks far apart so spacing never interferes.
        for i in 0..40 {
            let chunk = ChunkCoord::new(i * 4, 0);
            let terrain = paint(&cache, chunk, TerrainLayerSet::default().with(TerrainLayer::Sand));
            let cells = vec![chunk.origin(8).offset(4, 4)];
            let mut atlas = FxHashMap::default();
            let mut rng = StdRng::seed_from_u64(i as u64);
            place_trees(&cells, &terrain, &mut atlas, &cache, &special, 1.0, &mut rng);

            let palm = atlas[&cells[0]].get(TerrainLayer::Env).unwrap();
            let variant = special.palms.iter().position(|p| p.atlas == palm.atlas).unwrap();
            seen[variant] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn committed_neighbor_trees_count_for_spacing() {
        let cache = TerrainCache::new();
        let chunk = ChunkCoord::new(0, 0);
        let terrain = paint(&cache, chunk, TerrainLayerSet::default().with(TerrainLayer::Sand));

        let mut tree = AtlasAssignment::default();
        tree.set(TerrainLayer::Env, TileRef::new(0, 4));
        cache.commit_atlas(CellCoord::new(-1, 4), tree);

        let cells = vec![CellCoord::new(2, 4), CellCoord::new(3, 4)];
        let mut atlas = FxHashMap::default();
        let mut rng = StdRng::seed_from_u64(2);
        let special = SpecialTiles::default();
        place_trees(&cells, &terrain, &mut atlas, &cache, &special, 1.0, &mut rng);

        assert!(!atlas.contains_key(&CellCoord::new(2, 4)));
        let palm = atlas[&CellCoord::new(3, 4)].get(TerrainLayer::Env).unwrap();
        assert!(special.palms.iter().any(|p| p.atlas == palm.atlas));
    }
}
