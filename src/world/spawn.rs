use crate::constants::{SAFE_SPAWN_MAX, SAFE_SPAWN_MIN};
use crate::core::coords::CellCoord;
use crate::world::noise::NoiseSource;

/// Square spiral over cell offsets: (0,0), (1,0), (1,1), (0,1), (-1,1), ...
pub struct Spiral {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

impl Spiral {
    pub fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            dx: 0,
            dy: -1,
        }
    }
}

impl Default for Spiral {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Spiral {
    type Item = CellCoord;

    fn next(&mut self) -> Option<CellCoord> {
        let current = CellCoord::new(self.x, self.y);
        let (x, y) = (self.x, self.y);
        if x == y || (x < 0 && x == -y) || (x > 0 && x == 1 - y) {
            (self.dx, self.dy) = (-self.dy, self.dx);
        }
        self.x += self.dx;
        self.y += self.dy;
        Some(current)
    }
}

/// First cell outward from the origin whose noise lies in the dry, flat band.
///
/// Falls back to the origin when nothing within `max_radius` qualifies.
pub fn find_safe_spawn(noise: &dyn NoiseSource, max_radius: i32) -> CellCoord {
    let side = (max_radius.max(0) as usize).saturating_mul(2);
    let steps = side.saturating_mul(side);
    let found = Spiral::new()
        .take(steps)
        .find(|cell| (SAFE_SPAWN_MIN..=SAFE_SPAWN_MAX).contains(&noise.sample(*cell)));

    match found {
        Some(cell) => {
            tracing::info!("Safe spawn found at ({}, {})", cell.x(), cell.y());
            cell
        }
        None => {
            tracing::warn!("No safe spawn within radius {}, using origin", max_radius);
            CellCoord::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spiral_walks_rings_outward() {
        let first: Vec<_> = Spiral::new().take(9).map(|c| (c.x(), c.y())).collect();
        assert_eq!(
            first,
            vec![(0, 0), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)]
        );
        let ring: Vec<_> = Spiral::new().take(25).collect();
        assert!(ring.iter().all(|c| c.x().abs() <= 2 && c.y().abs() <= 2));
        let unique: std::collections::HashSet<_> = ring.iter().collect();
        assert_eq!(unique.len(), 25);
    }

    #[test]
    fn constant_safe_field_spawns_at_origin() {
        let noise = |_: CellCoord| 0.2_f32;
        assert_eq!(find_safe_spawn(&noise, 10), CellCoord::new(0, 0));
    }

    #[test]
    fn finds_nearest_dry_land() {
        // Ocean everywhere except a strip two cells east.
        let noise = |cell: CellCoord| if cell.x() >= 2 { 0.3_f32 } else { -0.5 };
        let spawn = find_safe_spawn(&noise, 10);
        assert_eq!(spawn.x(), 2);
        assert!(spawn.y().abs() <= 2);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let at_zero = |_: CellCoord| 0.0_f32;
        let at_top = |cell: CellCoord| if cell == CellCoord::new(1, 0) { 0.45_f32 } else { 0.9 };
        assert_eq!(find_safe_spawn(&at_zero, 3), CellCoord::new(0, 0));
        assert_eq!(find_safe_spawn(&at_top, 3), CellCoord::new(1, 0));
    }

    #[test]
    fn exhausted_search_falls_back_to_origin() {
        let cliffs = |_: CellCoord| 0.9_f32;
        assert_eq!(find_safe_spawn(&cliffs, 4), CellCoord::default());
        assert_eq!(find_safe_spawn(&cliffs, 0), CellCoord::default());
    }

    #[test]
    fn huge_radius_does_not_overflow_step_count() {
        let noise = |_: CellCoord| 0.2_f32;
        assert_eq!(find_safe_spawn(&noise, 30_000), CellCoord::new(0, 0));
        assert_eq!(find_safe_spawn(&noise, i32::MAX), CellCoord::new(0, 0));
    }
}
