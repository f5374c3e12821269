use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Global address of a single terrain cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct CellCoord(pub IVec2);

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    pub fn x(self) -> i32 {
        self.0.x
    }

    pub fn y(self) -> i32 {
        self.0.y
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self(self.0 + IVec2::new(dx, dy))
    }

    pub fn neighbor(self, direction: Direction) -> Self {
        Self(self.0 + direction.offset())
    }

    /// Chunk owning this cell (floor division, so negative cells land correctly).
    pub fn chunk(self, chunk_size: i32) -> ChunkCoord {
        ChunkCoord::new(
            self.0.x.div_euclid(chunk_size),
            self.0.y.div_euclid(chunk_size),
        )
    }

    /// Cell containing a world-space position.
    pub fn from_world(position: Vec2, tile_size: f32) -> Self {
        Self((position / tile_size).floor().as_ivec2())
    }

    /// World-space center of this cell.
    pub fn to_world(self, tile_size: f32) -> Vec2 {
        (self.0.as_vec2() + Vec2::splat(0.5)) * tile_size
    }

    /// All cells in the square window of the given radius around this cell.
    pub fn window(self, radius: i32) -> impl Iterator<Item = CellCoord> {
        (-radius..=radius).flat_map(move |dy| (-radius..=radius).map(move |dx| self.offset(dx, dy)))
    }
}

/// Address of a chunk in chunk space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ChunkCoord(pub IVec2);

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    pub fn origin(self, chunk_size: i32) -> CellCoord {
        CellCoord(self.0 * chunk_size)
    }

    /// Every cell owned by this chunk, row by row.
    pub fn cells(self, chunk_size: i32) -> impl Iterator<Item = CellCoord> {
        self.cells_with_margin(chunk_size, 0)
    }

    /// Cells owned by this chunk plus `margin` cells past every edge.
    pub fn cells_with_margin(
        self,
        chunk_size: i32,
        margin: i32,
    ) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin(chunk_size);
        (-margin..chunk_size + margin).flat_map(move |dy| {
            (-margin..chunk_size + margin).map(move |dx| origin.offset(dx, dy))
        })
    }

    pub fn contains(self, cell: CellCoord, chunk_size: i32) -> bool {
        cell.chunk(chunk_size) == self
    }

    pub fn chebyshev_distance(self, other: ChunkCoord) -> i32 {
        let d = (self.0 - other.0).abs();
        d.x.max(d.y)
    }

    pub fn distance_squared(self, other: ChunkCoord) -> i32 {
        (self.0 - other.0).length_squared()
    }

    /// Chunks within Chebyshev `radius` of this one.
    pub fn square(self, radius: i32) -> impl Iterator<Item = ChunkCoord> {
        (-radius..=radius).flat_map(move |dy| {
            (-radius..=radius).map(move |dx| ChunkCoord(self.0 + IVec2::new(dx, dy)))
        })
    }
}

/// The eight compass neighbors, clockwise from north. Y grows southwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

impl Direction {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::NorthEast => IVec2::new(1, -1),
            Direction::East => IVec2::new(1, 0),
            Direction::SouthEast => IVec2::new(1, 1),
            Direction::South => IVec2::new(0, 1),
            Direction::SouthWest => IVec2::new(-1, 1),
            Direction::West => IVec2::new(-1, 0),
            Direction::NorthWest => IVec2::new(-1, -1),
        }
    }

    /// Rotates clockwise by `steps` eighth-turns.
    pub fn rotated(self, steps: usize) -> Direction {
        ALL_DIRECTIONS[(self.index() + steps) % 8]
    }

    pub fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }
}
