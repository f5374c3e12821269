use rustc_hash::FxHashMap;

use crate::core::coords::{ALL_DIRECTIONS, Direction};
use crate::core::terrain::{TerrainId, TileRef};
use crate::tiles::tileset::Tileset;

/// One candidate tile for a terrain together with its neighbor requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRule {
    pub tile: TileRef,
    /// Required terrain per direction, indexed by [`Direction::index`].
    pub peering: [Option<TerrainId>; 8],
    pub score: u8,
    pub weight: f32,
}

impl TileRule {
    pub fn new(tile: TileRef, peering: [Option<TerrainId>; 8], weight: f32) -> Self {
        let score = peering.iter().filter(|p| p.is_some()).count() as u8;
        Self {
            tile,
            peering,
            score,
            weight,
        }
    }

    pub fn requirements(&self) -> impl Iterator<Item = (Direction, TerrainId)> + '_ {
        ALL_DIRECTIONS
            .iter()
            .filter_map(|dir| self.peering[dir.index()].map(|id| (*dir, id)))
    }
}

/// Rules grouped by terrain, most specific first. Read-only once built.
#[derive(Debug, Default)]
pub struct AutotileRuleTable {
    rules: FxHashMap<TerrainId, Vec<TileRule>>,
}

impl AutotileRuleTable {
    pub fn new(tileset: &Tileset) -> Self {
        let mut rules: FxHashMap<TerrainId, Vec<TileRule>> = FxHashMap::default();

        for def in &tileset.tiles {
            let Some(terrain) = def.terrain else {
                continue;
            };
            let mut peering = [None; 8];
            for (dir, id) in &def.peering {
                peering[dir.index()] = Some(*id);
            }
            let tile = TileRef {
                atlas: def.atlas,
                alternative: 0,
            };
            rules
                .entry(terrain)
                .or_default()
                .push(TileRule::new(tile, peering, def.probability));
        }

        for list in rules.values_mut() {
            list.sort_by(|a, b| b.score.cmp(&a.score));
        }

        tracing::debug!(
            "Autotile table built: {} terrains, {} rules",
            rules.len(),
            rules.values().map(Vec::len).sum::<usize>()
        );

        Self { rules }
    }

    /// Rules for a terrain, sorted by descending specificity. Empty if none exist.
    pub fn rules_for(&self, terrain: TerrainId) -> &[TileRule] {
        self.rules.get(&terrain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn terrain_count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use glam::UVec2;

    use super::*;
    use crate::tiles::tileset::TileDefinition;

    fn def(x: u32, terrain: Option<TerrainId>, dirs: &[Direction]) -> TileDefinition {
        TileDefinition {
            atlas: UVec2::new(x, 0),
            terrain,
            peering: dirs
                .iter()
                .map(|d| (*d, terrain.unwrap_or(TerrainId::WATER)))
                .collect::<BTreeMap<_, _>>(),
            probability: 1.0,
        }
    }

    #[test]
    fn groups_and_sorts_by_specificity() {
        let tileset = Tileset {
            tiles: vec![
                def(0, Some(TerrainId::SAND), &[]),
                def(1, Some(TerrainId::SAND), &ALL_DIRECTIONS),
                def(2, Some(TerrainId::SAND), &[Direction::North, Direction::South]),
                def(3, Some(TerrainId::GRASS), &[Direction::East]),
                def(4, None, &ALL_DIRECTIONS),
            ],
            special: Default::default(),
        };
        let table = AutotileRuleTable::new(&tileset);

        assert_eq!(table.terrain_count(), 2);
        let scores: Vec<u8> = table
            .rules_for(TerrainId::SAND)
            .iter()
            .map(|r| r.score)
            .collect();
        assert_eq!(scores, vec![8, 2, 0]);
        assert_eq!(table.rules_for(TerrainId::GRASS).len(), 1);
        assert!(table.rules_for(TerrainId::CLIFF).is_empty());
    }

    #[test]
    fn rule_exposes_requirements() {
        let mut peering = [None; 8];
        peering[Direction::West.index()] = Some(TerrainId::GRASS);
        let rule = TileRule::new(TileRef::new(0, 0), peering, 1.0);
        assert_eq!(rule.score, 1);
        assert_eq!(
            rule.requirements().collect::<Vec<_>>(),
            vec![(Direction::West, TerrainId::GRASS)]
        );
    }
}
