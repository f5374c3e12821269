// World constants
pub const CHUNK_SIZE: i32 = 16;
pub const TILE_SIZE: f32 = 16.0;
pub const RENDER_DISTANCE: i32 = 2;
pub const GENERATION_DISTANCE: i32 = 3;
pub const DEFAULT_SEED: u32 = 2137;

// Cells classified beyond each chunk edge so autotiling sees real neighbors
pub const CHUNK_BUFFER: i32 = 3;

// Noise parameters
pub const NOISE_FREQUENCY: f32 = 0.01;
pub const FRACTAL_OCTAVES: i32 = 4;
pub const FRACTAL_LACUNARITY: f32 = 2.0;
pub const FRACTAL_GAIN: f32 = 0.5;

// Classifier bands (overlapping on purpose)
pub const WATER_MAX: f32 = 0.0;
pub const SAND_MIN: f32 = -0.025;
pub const SAND_MAX: f32 = 0.15;
pub const GRASS_MIN: f32 = 0.135;
pub const GRASS_MAX: f32 = 0.55;
pub const CLIFF_MIN: f32 = 0.535;
pub const DEEP_WATER_MAX: f32 = -0.2;

// Decoration
pub const TREE_FREQ: f32 = 0.05;
pub const TREE_BIOME_RADIUS: i32 = 2;
pub const TREE_SPACING_RADIUS: i32 = 3;

// Spawn search
pub const SPAWN_SEARCH_RADIUS: i32 = 64;
pub const SAFE_SPAWN_MIN: f32 = 0.0;
pub const SAFE_SPAWN_MAX: f32 = 0.45;

// Scheduling
pub const MAX_CHUNKS_DRAWN_PER_TICK: usize = 4;
