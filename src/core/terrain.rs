use glam::UVec2;
use serde::{Deserialize, Serialize};

/// Number of terrain ids a [`TerrainMask`] can hold.
pub const MAX_TERRAIN_IDS: u8 = 32;

/// Autotiling terrain identifier, as referenced by tile peering rules.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerrainId(pub u8);

impl TerrainId {
    pub const WATER: TerrainId = TerrainId(0);
    pub const SAND: TerrainId = TerrainId(1);
    pub const GRASS: TerrainId = TerrainId(2);
    pub const CLIFF: TerrainId = TerrainId(3);
}

/// Presentation layers a cell can carry at once.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum TerrainLayer {
    Water = 0,
    Sand = 1,
    Grass = 2,
    Cliff = 3,
    Env = 4,
}

pub const LAYER_COUNT: usize = 5;

pub const ALL_LAYERS: [TerrainLayer; LAYER_COUNT] = [
    TerrainLayer::Water,
    TerrainLayer::Sand,
    TerrainLayer::Grass,
    TerrainLayer::Cliff,
    TerrainLayer::Env,
];

impl TerrainLayer {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Terrain painted on this layer. `Env` only carries decorations.
    pub fn terrain(self) -> Option<TerrainId> {
        match self {
            TerrainLayer::Water => Some(TerrainId::WATER),
            TerrainLayer::Sand => Some(TerrainId::SAND),
            TerrainLayer::Grass => Some(TerrainId::GRASS),
            TerrainLayer::Cliff => Some(TerrainId::CLIFF),
            TerrainLayer::Env => None,
        }
    }
}

/// Bitset of terrain ids seen at one cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TerrainMask(u32);

impl TerrainMask {
    pub const EMPTY: TerrainMask = TerrainMask(0);

    pub fn insert(&mut self, id: TerrainId) {
        debug_assert!(id.0 < MAX_TERRAIN_IDS);
        self.0 |= 1 << id.0;
    }

    pub fn contains(self, id: TerrainId) -> bool {
        id.0 < MAX_TERRAIN_IDS && self.0 & (1 << id.0) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<TerrainId> for TerrainMask {
    fn from_iter<I: IntoIterator<Item = TerrainId>>(iter: I) -> Self {
        let mut mask = TerrainMask::EMPTY;
        for id in iter {
            mask.insert(id);
        }
        mask
    }
}

/// Terrain present on each layer of a single cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TerrainLayerSet {
    layers: [Option<TerrainId>; LAYER_COUNT],
}

impl TerrainLayerSet {
    pub fn with(mut self, layer: TerrainLayer) -> Self {
        self.layers[layer.index()] = layer.terrain();
        self
    }

    pub fn get(&self, layer: TerrainLayer) -> Option<TerrainId> {
        self.layers[layer.index()]
    }

    pub fn has(&self, layer: TerrainLayer) -> bool {
        self.layers[layer.index()].is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Option::is_none)
    }

    /// Layers present, in layer order, with their terrain id.
    pub fn iter(&self) -> impl Iterator<Item = (TerrainLayer, TerrainId)> + '_ {
        ALL_LAYERS
            .iter()
            .filter_map(|layer| self.get(*layer).map(|id| (*layer, id)))
    }

    pub fn mask(&self) -> TerrainMask {
        self.layers.iter().flatten().copied().collect()
    }
}

/// Concrete tile reference: atlas coordinate plus alternative (variant/flip) id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct TileRef {
    pub atlas: UVec2,
    #[serde(default)]
    pub alternative: u16,
}

impl TileRef {
    /// Alternative id used for the horizontally flipped variant.
    pub const FLIP_H: u16 = 1;

    pub const fn new(x: u32, y: u32) -> Self {
        Self {
            atlas: UVec2::new(x, y),
            alternative: 0,
        }
    }

    pub fn flipped(self) -> Self {
        Self {
            alternative: Self::FLIP_H,
            ..self
        }
    }
}

/// Resolved tile for each layer of a single cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct AtlasAssignment {
    tiles: [Option<TileRef>; LAYER_COUNT],
}

impl AtlasAssignment {
    pub fn set(&mut self, layer: TerrainLayer, tile: TileRef) {
        self.tiles[layer.index()] = Some(tile);
    }

    pub fn get(&self, layer: TerrainLayer) -> Option<TileRef> {
        self.tiles[layer.index()]
    }

    pub fn has(&self, layer: TerrainLayer) -> bool {
        self.tiles[layer.index()].is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TerrainLayer, TileRef)> + '_ {
        ALL_LAYERS
            .iter()
            .filter_map(|layer| self.get(*layer).map(|tile| (*layer, tile)))
    }
}
