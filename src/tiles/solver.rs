//! Bitmask autotiling: picks the most specific tile whose neighbor
//! requirements are satisfied, breaking ties by weight.

use rand::Rng;

use crate::core::terrain::{TerrainId, TerrainMask, TileRef};
use crate::tiles::rules::TileRule;

/// Anything with a selection weight.
pub trait Weighted {
    fn weight(&self) -> f32;
}

/// A tile with its selection weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedTile {
    pub tile: TileRef,
    pub weight: f32,
}

impl Weighted for WeightedTile {
    fn weight(&self) -> f32 {
        self.weight
    }
}

impl Weighted for TileRule {
    fn weight(&self) -> f32 {
        self.weight
    }
}

impl<T: Weighted> Weighted for &T {
    fn weight(&self) -> f32 {
        (**self).weight()
    }
}

/// Weight-proportional choice. Returns `None` only for an empty slice.
pub fn pick<'a, T: Weighted, R: Rng + ?Sized>(candidates: &'a [T], rng: &mut R) -> Option<&'a T> {
    match candidates {
        [] => None,
        [only] => Some(only),
        _ => {
            let total: f32 = candidates.iter().map(Weighted::weight).sum();
            if total <= 0.0 {
                return candidates.first();
            }
            let roll = rng.random_range(0.0..total);
            let mut cumulative = 0.0;
            for candidate in candidates {
                cumulative += candidate.weight();
                if cumulative >= roll {
                    return Some(candidate);
                }
            }
            // Float accumulation can land just under the roll.
            candidates.last()
        }
    }
}

/// Whether `rule` accepts the given neighborhood for a cell of `terrain`.
///
/// Sand accepts a Grass neighbor where it asks for Sand. Only that pair, only
/// in that direction.
pub fn rule_matches(terrain: TerrainId, neighbors: &[TerrainMask; 8], rule: &TileRule) -> bool {
    rule.requirements().all(|(dir, required)| {
        let present = neighbors[dir.index()];
        present.contains(required)
            || (terrain == TerrainId::SAND
                && required == TerrainId::SAND
                && present.contains(TerrainId::GRASS))
    })
}

/// Resolves the tile for one layer of one cell.
///
/// `rules` must be sorted by descending score. Falls back to the most specific
/// rule when nothing matches, and to `None` when there are no rules at all.
pub fn resolve<R: Rng + ?Sized>(
    terrain: TerrainId,
    neighbors: &[TerrainMask; 8],
    rules: &[TileRule],
    rng: &mut R,
) -> Option<TileRef> {
    let mut best_score = None;
    let mut candidates: Vec<&TileRule> = Vec::new();

    for rule in rules {
        if best_score.is_some_and(|best| rule.score < best) {
            break;
        }
        if rule_matches(terrain, neighbors, rule) {
            best_score = Some(rule.score);
            candidates.push(rule);
        }
    }

    match pick(&candidates, rng) {
        Some(rule) => Some(rule.tile),
        None => rules.first().map(|center| center.tile),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::core::coords::{ALL_DIRECTIONS, Direction};

    fn rule(x: u32, terrain: TerrainId, dirs: &[Direction], weight: f32) -> TileRule {
        let mut peering = [None; 8];
        for dir in dirs {
            peering[dir.index()] = Some(terrain);
        }
        TileRule::new(TileRef::new(x, 0), peering, weight)
    }

    fn uniform(id: TerrainId) -> [TerrainMask; 8] {
        [[id].into_iter().collect(); 8]
    }

    fn sorted(mut rules: Vec<TileRule>) -> Vec<TileRule> {
        rules.sort_by(|a, b| b.score.cmp(&a.score));
        rules
    }

    #[test]
    fn single_candidate_is_returned_without_rolling() {
        let tiles = [WeightedTile {
            tile: TileRef::new(3, 3),
            weight: 0.0,
        }];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick(&tiles, &mut rng).unwrap().tile, TileRef::new(3, 3));
        assert!(pick::<WeightedTile, _>(&[], &mut rng).is_none());
    }

    #[test]
    fn equal_weights_pick_uniformly() {
        let tiles: Vec<_> = (0..3)
            .map(|x| WeightedTile {
                tile: TileRef::new(x, 0),
                weight: 1.0,
            })
            .collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; 3];
        for _ in 0..30_000 {
            let chosen = pick(&tiles, &mut rng).unwrap();
            counts[chosen.tile.atlas.x as usize] += 1;
        }
        for count in counts {
            assert!((9_000..11_000).contains(&count), "counts: {counts:?}");
        }
    }

    #[test]
    fn heavy_weight_dominates_proportionally() {
        let tiles = [
            WeightedTile {
                tile: TileRef::new(0, 0),
                weight: 10.0,
            },
            WeightedTile {
                tile: TileRef::new(1, 0),
                weight: 1.0,
            },
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let mut heavy = 0usize;
        let mut light = 0usize;
        for _ in 0..22_000 {
            if pick(&tiles, &mut rng).unwrap().tile.atlas.x == 0 {
                heavy += 1;
            } else {
                light += 1;
            }
        }
        let ratio = heavy as f64 / light as f64;
        assert!((8.5..11.5).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn most_specific_match_wins() {
        let sand = TerrainId::SAND;
        let rules = sorted(vec![
            rule(0, sand, &ALL_DIRECTIONS, 1.0),
            rule(1, sand, &[Direction::South, Direction::West], 1.0),
            rule(2, sand, &[], 1.0),
        ]);
        let mut neighbors = uniform(sand);
        neighbors[Direction::North.index()] = TerrainMask::EMPTY;

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(resolve(sand, &neighbors, &rules, &mut rng), Some(TileRef::new(1, 0)));
        assert_eq!(
            resolve(sand, &uniform(sand), &rules, &mut rng),
            Some(TileRef::new(0, 0))
        );
    }

    #[test]
    fn ties_are_broken_among_equal_scores_only() {
        let grass = TerrainId::GRASS;
        let rules = sorted(vec![
            rule(0, grass, &ALL_DIRECTIONS, 1.0),
            rule(1, grass, &ALL_DIRECTIONS, 1.0),
            rule(2, grass, &[Direction::North], 100.0),
        ]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let tile = resolve(grass, &uniform(grass), &rules, &mut rng).unwrap();
            seen[tile.atlas.x as usize] = true;
        }
        assert_eq!(seen, [true, true, false]);
    }

    #[test]
    fn falls_back_to_center_when_nothing_matches() {
        let cliff = TerrainId::CLIFF;
        let rules = sorted(vec![
            rule(5, cliff, &[Direction::East], 1.0),
            rule(4, cliff, &ALL_DIRECTIONS, 1.0),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        let lonely = [TerrainMask::EMPTY; 8];
        assert_eq!(resolve(cliff, &lonely, &rules, &mut rng), Some(TileRef::new(4, 0)));
        assert_eq!(resolve(cliff, &lonely, &[], &mut rng), None);
    }

    #[test]
    fn sand_accepts_grass_neighbors_but_not_the_reverse() {
        let sand_rule = rule(0, TerrainId::SAND, &ALL_DIRECTIONS, 1.0);
        let grass_rule = rule(1, TerrainId::GRASS, &ALL_DIRECTIONS, 1.0);

        let mut mixed = uniform(TerrainId::SAND);
        mixed[Direction::East.index()] = [TerrainId::GRASS].into_iter().collect();
        assert!(rule_matches(TerrainId::SAND, &mixed, &sand_rule));

        let mut mixed = uniform(TerrainId::GRASS);
        mixed[Direction::East.index()] = [TerrainId::SAND].into_iter().collect();
        assert!(!rule_matches(TerrainId::GRASS, &mixed, &grass_rule));

        // Water never relaxes to anything.
        let water_rule = rule(2, TerrainId::WATER, &[Direction::North], 1.0);
        let mut shore = [TerrainMask::EMPTY; 8];
        shore[Direction::North.index()] = [TerrainId::SAND].into_iter().collect();
        assert!(!rule_matches(TerrainId::WATER, &shore, &water_rule));
    }

    #[test]
    fn resolution_is_deterministic_with_a_single_top_candidate() {
        let water = TerrainId::WATER;
        let rules = sorted(vec![
            rule(0, water, &ALL_DIRECTIONS, 1.0),
            rule(1, water, &[], 1.0),
        ]);
        let first = resolve(water, &uniform(water), &rules, &mut StdRng::seed_from_u64(1));
        let second = resolve(water, &uniform(water), &rules, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }
}
