//! Tile-set metadata: which atlas tile paints which terrain, and what each
//! tile expects from its eight neighbors.

use std::collections::BTreeMap;
use std::path::Path;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::core::coords::{ALL_DIRECTIONS, Direction};
use crate::core::terrain::{MAX_TERRAIN_IDS, TerrainId, TileRef};
use crate::error::TilesetError;

fn default_probability() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileDefinition {
    pub atlas: UVec2,
    #[serde(default)]
    pub terrain: Option<TerrainId>,
    #[serde(default)]
    pub peering: BTreeMap<Direction, TerrainId>,
    #[serde(default = "default_probability")]
    pub probability: f32,
}

/// Tiles placed outside the autotiling rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialTiles {
    pub deep_water: TileRef,
    pub palms: [TileRef; 2],
    pub forest: TileRef,
}

impl Default for SpecialTiles {
    fn default() -> Self {
        Self {
            deep_water: TileRef::new(11, 0),
            palms: [TileRef::new(0, 4), TileRef::new(1, 4)],
            forest: TileRef::new(2, 4),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tileset {
    pub tiles: Vec<TileDefinition>,
    #[serde(default)]
    pub special: SpecialTiles,
}

impl Tileset {
    pub fn from_json_str(content: &str) -> Result<Self, TilesetError> {
        let tileset: Tileset = serde_json::from_str(content)?;
        tileset.validate()?;
        Ok(tileset)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TilesetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| TilesetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tileset = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded tileset {} with {} tiles",
            path.display(),
            tileset.tiles.len()
        );
        Ok(tileset)
    }

    fn validate(&self) -> Result<(), TilesetError> {
        for tile in &self.tiles {
            let ids = tile.terrain.iter().chain(tile.peering.values());
            if let Some(id) = ids.into_iter().find(|id| id.0 >= MAX_TERRAIN_IDS) {
                return Err(TilesetError::TerrainOutOfRange {
                    atlas: tile.atlas,
                    id: id.0,
                    max: MAX_TERRAIN_IDS - 1,
                });
            }
            if !tile.probability.is_finite() || tile.probability < 0.0 {
                return Err(TilesetError::InvalidWeight {
                    atlas: tile.atlas,
                    weight: tile.probability,
                });
            }
        }
        Ok(())
    }

    /// Default atlas: one row per terrain (water, sand, grass, cliff), decorations on row 4.
    ///
    /// Columns per row: 0-1 full centers (the second one rarer), 2-5 edges open
    /// to N/E/S/W, 6-9 outer corners open to NE/SE/SW/NW, 10 an isolated tile.
    pub fn builtin() -> Self {
        let terrains = [
            TerrainId::WATER,
            TerrainId::SAND,
            TerrainId::GRASS,
            TerrainId::CLIFF,
        ];
        let mut tiles = Vec::new();

        for (row, terrain) in terrains.into_iter().enumerate() {
            let row = row as u32;
            let full: BTreeMap<_, _> = ALL_DIRECTIONS.iter().map(|d| (*d, terrain)).collect();
            tiles.push(TileDefinition {
                atlas: UVec2::new(0, row),
                terrain: Some(terrain),
                peering: full.clone(),
                probability: 1.0,
            });
            tiles.push(TileDefinition {
                atlas: UVec2::new(1, row),
                terrain: Some(terrain),
                peering: full,
                probability: 0.25,
            });

            // An edge open to `side` drops the three directions facing it.
            for (i, side) in [
                Direction::North,
                Direction::East,
                Direction::South,
                Direction::West,
            ]
            .into_iter()
            .enumerate()
            {
                let peering = (3..=5).chain([2, 6]).map(|step| (side.rotated(step), terrain));
                tiles.push(TileDefinition {
                    atlas: UVec2::new(2 + i as u32, row),
                    terrain: Some(terrain),
                    peering: peering.collect(),
                    probability: 1.0,
                });
            }

            // An outer corner only needs the three directions opposite its open diagonal.
            for (i, corner) in [
                Direction::NorthEast,
                Direction::SouthEast,
                Direction::SouthWest,
                Direction::NorthWest,
            ]
            .into_iter()
            .enumerate()
            {
                let peering = (3..=5).map(|step| (corner.rotated(step), terrain));
                tiles.push(TileDefinition {
                    atlas: UVec2::new(6 + i as u32, row),
                    terrain: Some(terrain),
                    peering: peering.collect(),
                    probability: 1.0,
                });
            }

            tiles.push(TileDefinition {
                atlas: UVec2::new(10, row),
                terrain: Some(terrain),
                peering: BTreeMap::new(),
                probability: 1.0,
            });
        }

        Tileset {
            tiles,
            special: SpecialTiles::default(),
        }
    }
}
