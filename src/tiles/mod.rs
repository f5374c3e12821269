//! Tile-set metadata, the derived rule table and the autotile solver.

pub mod rules;
pub mod solver;
pub mod tileset;

pub use rules::{AutotileRuleTable, TileRule};
pub use tileset::{SpecialTiles, TileDefinition, Tileset};
