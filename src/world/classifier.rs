use crate::constants::*;
use crate::core::terrain::{TerrainLayer, TerrainLayerSet};

/// Maps a noise sample to the terrain layers present at a cell.
///
/// The bands overlap so neighboring biomes share border cells that the
/// autotiler can blend.
pub fn classify(n: f32) -> TerrainLayerSet {
    let mut set = TerrainLayerSet::default();
    if n < WATER_MAX {
        set = set.with(TerrainLayer::Water);
    }
    if n > SAND_MIN && n < SAND_MAX {
        set = set.with(TerrainLayer::Sand);
    }
    if n > GRASS_MIN && n < GRASS_MAX {
        set = set.with(TerrainLayer::Grass);
    }
    if n > CLIFF_MIN {
        set = set.with(TerrainLayer::Cliff);
    }
    set
}

/// Water deep enough to skip autotiling and use the fixed deep-water tile.
pub fn is_deep_water(n: f32) -> bool {
    n < DEEP_WATER_MAX
}
