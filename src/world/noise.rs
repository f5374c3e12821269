//! Thread-safe scalar terrain field backed by FastNoiseLite

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

use crate::constants::{FRACTAL_GAIN, FRACTAL_LACUNARITY};
use crate::core::coords::CellCoord;

/// Deterministic scalar field sampled per cell.
///
/// Implementations must be pure so workers can share one instance without locking.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, cell: CellCoord) -> f32;
}

/// Seeded fractal simplex field.
pub struct NoiseField {
    noise: FastNoiseLite,
    pub seed: u32,
}

impl NoiseField {
    pub fn new(seed: u32, frequency: f32, octaves: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(octaves));
        noise.set_fractal_lacunarity(Some(FRACTAL_LACUNARITY));
        noise.set_fractal_gain(Some(FRACTAL_GAIN));
        noise.set_frequency(Some(frequency));
        NoiseField { noise, seed }
    }
}

impl NoiseSource for NoiseField {
    fn sample(&self, cell: CellCoord) -> f32 {
        self.noise.get_noise_2d(cell.x() as f32, cell.y() as f32)
    }
}

impl<F> NoiseSource for F
where
    F: Fn(CellCoord) -> f32 + Send + Sync,
{
    fn sample(&self, cell: CellCoord) -> f32 {
        self(cell)
    }
}
