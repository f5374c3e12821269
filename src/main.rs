//! Headless tile-world streamer
//!
//! Walks a focal point across the world and logs what would be drawn.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use glam::Vec2;
use tracing_subscriber::EnvFilter;

use tilestream::{
    AtlasAssignment, CellCoord, ChunkCoord, ChunkRenderer, TickStats, Tileset, WorldSettings,
    WorldStreamer,
};

/// Infinite 2D tile world streamer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON world settings; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON tile-set metadata (built-in tile set when omitted)
    #[arg(long)]
    tileset: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u32>,

    #[arg(long)]
    render_distance: Option<i32>,

    #[arg(long)]
    generation_distance: Option<i32>,

    #[arg(long)]
    tree_freq: Option<f32>,

    /// Maximum chunks drawn per tick
    #[arg(long)]
    render_budget: Option<usize>,

    #[arg(long, default_value_t = false)]
    debug_overlay: bool,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Cells the focal point moves east per tick
    #[arg(long, default_value_t = 0.5)]
    speed: f32,

    /// Pause between ticks in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Log filter, e.g. "info" or "tilestream=debug" (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn settings(&self) -> Result<WorldSettings, tilestream::ConfigError> {
        let mut settings = match &self.config {
            Some(path) => WorldSettings::load(path)?,
            None => WorldSettings::default(),
        };
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(distance) = self.render_distance {
            settings.render_distance = distance;
        }
        if let Some(distance) = self.generation_distance {
            settings.generation_distance = distance;
        }
        if let Some(freq) = self.tree_freq {
            settings.tree_freq = freq;
        }
        if let Some(budget) = self.render_budget {
            settings.render_budget = budget;
        }
        settings.debug_overlay |= self.debug_overlay;
        Ok(settings)
    }
}

/// Renderer stand-in that only counts cells.
#[derive(Default)]
struct LogRenderer {
    drawn_cells: usize,
    undrawn_cells: usize,
    trees: usize,
}

impl ChunkRenderer for LogRenderer {
    fn draw_chunk(&mut self, chunk: ChunkCoord, cells: &[(CellCoord, AtlasAssignment)]) {
        let trees = cells
            .iter()
            .filter(|(_, tiles)| tiles.has(tilestream::TerrainLayer::Env))
            .count();
        tracing::debug!(
            "Draw chunk ({}, {}): {} cells, {} trees",
            chunk.0.x,
            chunk.0.y,
            cells.len(),
            trees
        );
        self.drawn_cells += cells.len();
        self.trees += trees;
    }

    fn undraw_chunk(&mut self, chunk: ChunkCoord, cells: &[CellCoord]) {
        tracing::debug!("Undraw chunk ({}, {})", chunk.0.x, chunk.0.y);
        self.undrawn_cells += cells.len();
    }

    fn draw_debug_overlay(&mut self, chunk: ChunkCoord) {
        tracing::trace!("Overlay on ({}, {})", chunk.0.x, chunk.0.y);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Invalid settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tileset = match &args.tileset {
        Some(path) => match Tileset::load(path) {
            Ok(tileset) => tileset,
            Err(e) => {
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Tileset::builtin(),
    };

    tracing::info!("Starting tile world with seed {}", settings.seed);
    let tile_size = settings.tile_size;
    let mut streamer = match WorldStreamer::new(settings, &tileset) {
        Ok(streamer) => streamer,
        Err(e) => {
            tracing::error!("Invalid settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let spawn = streamer.find_spawn();
    tracing::info!("Spawn at ({:.1}, {:.1})", spawn.x, spawn.y);

    let mut renderer = LogRenderer::default();
    let mut totals = TickStats::default();
    let mut position = spawn;
    for _ in 0..args.ticks {
        let stats = streamer.tick(position, &mut renderer);
        totals.dispatched += stats.dispatched;
        totals.enqueued += stats.enqueued;
        totals.undrawn += stats.undrawn;
        totals.drawn += stats.drawn;

        position += Vec2::new(args.speed * tile_size, 0.0);
        thread::sleep(Duration::from_millis(args.tick_ms));
    }

    let cell = streamer.cell_at(position);
    tracing::info!(
        "Focal point at cell ({}, {}), walkable: {}",
        cell.x(),
        cell.y(),
        streamer.is_walkable(position)
    );
    tracing::info!(
        "{} chunks dispatched, {} drawn, {} undrawn; {} cells drawn, {} undrawn, {} trees",
        totals.dispatched,
        totals.drawn,
        totals.undrawn,
        renderer.drawn_cells,
        renderer.undrawn_cells,
        renderer.trees
    );
    tracing::info!(
        "Cache holds {} terrain cells and {} tiled cells; {} chunks on screen",
        streamer.cache().terrain_len(),
        streamer.cache().atlas_len(),
        streamer.scheduler().drawn_count()
    );

    ExitCode::SUCCESS
}
