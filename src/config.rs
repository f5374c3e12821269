use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Everything the world needs at process start.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WorldSettings {
    pub seed: u32,
    pub chunk_size: i32,
    /// World units per cell edge.
    pub tile_size: f32,
    pub render_distance: i32,
    pub generation_distance: i32,
    pub noise_frequency: f32,
    pub fractal_octaves: i32,
    pub tree_freq: f32,
    pub render_budget: usize,
    pub debug_overlay: bool,
    pub spawn_search_radius: i32,
    /// Defaults to one worker per core.
    pub worker_count: Option<usize>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            chunk_size: CHUNK_SIZE,
            tile_size: TILE_SIZE,
            render_distance: RENDER_DISTANCE,
            generation_distance: GENERATION_DISTANCE,
            noise_frequency: NOISE_FREQUENCY,
            fractal_octaves: FRACTAL_OCTAVES,
            tree_freq: TREE_FREQ,
            render_budget: MAX_CHUNKS_DRAWN_PER_TICK,
            debug_overlay: false,
            spawn_search_radius: SPAWN_SEARCH_RADIUS,
            worker_count: None,
        }
    }
}

impl WorldSettings {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.into(),
            })
        }

        if self.chunk_size <= 0 {
            return invalid("chunk_size", "must be positive");
        }
        if !(self.tile_size > 0.0) {
            return invalid("tile_size", "must be positive");
        }
        if self.render_distance < 0 {
            return invalid("render_distance", "must not be negative");
        }
        if self.render_distance > self.generation_distance {
            return invalid(
                "render_distance",
                format!(
                    "{} exceeds generation_distance {}; chunks would be drawn before they exist",
                    self.render_distance, self.generation_distance
                ),
            );
        }
        if !(0.0..=1.0).contains(&self.tree_freq) {
            return invalid("tree_freq", "must be within 0..=1");
        }
        if self.render_budget == 0 {
            return invalid("render_budget", "must be at least 1");
        }
        if self.fractal_octaves < 1 {
            return invalid("fractal_octaves", "must be at least 1");
        }
        if self.spawn_search_radius < 0 {
            return invalid("spawn_search_radius", "must not be negative");
        }
        Ok(())
    }
}
