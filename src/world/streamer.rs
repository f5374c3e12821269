//! Top-level handle the host application talks to.

use std::sync::Arc;

use glam::Vec2;

use crate::config::WorldSettings;
use crate::core::coords::CellCoord;
use crate::error::ConfigError;
use crate::tiles::rules::AutotileRuleTable;
use crate::tiles::tileset::Tileset;
use crate::world::cache::TerrainCache;
use crate::world::generator::ChunkGenerator;
use crate::world::loader::ChunkLoader;
use crate::world::noise::{NoiseField, NoiseSource};
use crate::world::scheduler::{ChunkRenderer, ChunkScheduler, TickStats};
use crate::world::spawn::find_safe_spawn;

pub struct WorldStreamer {
    settings: WorldSettings,
    noise: Arc<dyn NoiseSource>,
    rules: Arc<AutotileRuleTable>,
    cache: Arc<TerrainCache>,
    scheduler: ChunkScheduler,
}

impl WorldStreamer {
    pub fn new(settings: WorldSettings, tileset: &Tileset) -> Result<Self, ConfigError> {
        let noise = NoiseField::new(
            settings.seed,
            settings.noise_frequency,
            settings.fractal_octaves,
        );
        Self::with_noise(settings, tileset, Arc::new(noise))
    }

    /// Streams a world over an arbitrary elevation field. Rejects invalid settings.
    pub fn with_noise(
        settings: WorldSettings,
        tileset: &Tileset,
        noise: Arc<dyn NoiseSource>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let rules = Arc::new(AutotileRuleTable::new(tileset));
        let cache = Arc::new(TerrainCache::new());
        let generator = Arc::new(ChunkGenerator::new(
            Arc::clone(&noise),
            Arc::clone(&rules),
            tileset.special.clone(),
            Arc::clone(&cache),
            settings.chunk_size,
            settings.tree_freq,
            settings.seed,
        ));
        let loader = ChunkLoader::with_worker_count(settings.worker_count(), generator);
        let scheduler = ChunkScheduler::new(
            loader,
            settings.render_distance,
            settings.generation_distance,
            settings.render_budget,
            settings.debug_overlay,
        );

        tracing::info!(
            "World streamer ready: seed {}, chunk size {}, {} terrain rule sets",
            settings.seed,
            settings.chunk_size,
            rules.terrain_count()
        );

        Ok(Self {
            settings,
            noise,
            rules,
            cache,
            scheduler,
        })
    }

    /// World-space center of the spawn cell.
    pub fn find_spawn(&self) -> Vec2 {
        let cell = find_safe_spawn(self.noise.as_ref(), self.settings.spawn_search_radius);
        self.cell_to_world(cell)
    }

    pub fn tick(&mut self, focal_position: Vec2, renderer: &mut dyn ChunkRenderer) -> TickStats {
        let focal = self.cell_at(focal_position);
        self.scheduler.tick(focal, renderer)
    }

    /// False for water and for cells that are not generated yet.
    pub fn is_walkable(&self, position: Vec2) -> bool {
        self.cache.is_walkable(self.cell_at(position))
    }

    pub fn cell_at(&self, position: Vec2) -> CellCoord {
        CellCoord::from_world(position, self.settings.tile_size)
    }

    pub fn cell_to_world(&self, cell: CellCoord) -> Vec2 {
        cell.to_world(self.settings.tile_size)
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn rules(&self) -> &Arc<AutotileRuleTable> {
        &self.rules
    }

    pub fn cache(&self) -> &Arc<TerrainCache> {
        &self.cache
    }

    pub fn scheduler(&self) -> &ChunkScheduler {
        &self.scheduler
    }
}
