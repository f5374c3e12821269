//! Per-tick streaming decisions: what to generate, draw and undraw around the
//! focal point. Runs on the coordinating thread and never waits on workers.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::core::coords::{CellCoord, ChunkCoord};
use crate::core::terrain::AtlasAssignment;
use crate::world::cache::TerrainCache;
use crate::world::loader::ChunkLoader;

/// Presentation surface fed by the scheduler.
pub trait ChunkRenderer {
    /// Paint every cell of a generated chunk.
    fn draw_chunk(&mut self, chunk: ChunkCoord, cells: &[(CellCoord, AtlasAssignment)]);

    /// Erase the given cells of a chunk that left the render radius.
    fn undraw_chunk(&mut self, chunk: ChunkCoord, cells: &[CellCoord]);

    fn draw_debug_overlay(&mut self, _chunk: ChunkCoord) {}

    fn erase_debug_overlay(&mut self, _chunk: ChunkCoord) {}
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub dispatched: usize,
    pub enqueued: usize,
    pub undrawn: usize,
    pub drawn: usize,
}

pub struct ChunkScheduler {
    loader: ChunkLoader,
    cache: Arc<TerrainCache>,
    chunk_size: i32,
    render_distance: i32,
    generation_distance: i32,
    render_budget: usize,
    debug_overlay: bool,
    drawn: FxHashSet<ChunkCoord>,
    draw_queue: VecDeque<ChunkCoord>,
    queued: FxHashSet<ChunkCoord>,
    focal: Option<ChunkCoord>,
}

impl ChunkScheduler {
    pub fn new(
        loader: ChunkLoader,
        render_distance: i32,
        generation_distance: i32,
        render_budget: usize,
        debug_overlay: bool,
    ) -> Self {
        debug_assert!(render_distance <= generation_distance);
        let cache = Arc::clone(loader.generator().cache());
        let chunk_size = loader.generator().chunk_size();
        Self {
            loader,
            cache,
            chunk_size,
            render_distance,
            generation_distance,
            render_budget,
            debug_overlay,
            drawn: FxHashSet::default(),
            draw_queue: VecDeque::new(),
            queued: FxHashSet::default(),
            focal: None,
        }
    }

    pub fn tick(&mut self, focal_cell: CellCoord, renderer: &mut dyn ChunkRenderer) -> TickStats {
        let focal = focal_cell.chunk(self.chunk_size);
        if self.focal != Some(focal) {
            tracing::debug!("Focal chunk is now ({}, {})", focal.0.x, focal.0.y);
            self.focal = Some(focal);
        }

        let stats = TickStats {
            dispatched: self.request_generation(focal),
            enqueued: self.enqueue_ready(focal),
            undrawn: self.unload_distant(focal, renderer),
            drawn: self.draw_budgeted(renderer),
        };

        if stats != TickStats::default() {
            tracing::debug!(
                "Tick: {} dispatched, {} queued, {} undrawn, {} drawn ({} pending)",
                stats.dispatched,
                stats.enqueued,
                stats.undrawn,
                stats.drawn,
                self.loader.pending_count()
            );
        }
        stats
    }

    /// Dispatch every missing chunk in the generation radius, nearest first.
    fn request_generation(&self, focal: ChunkCoord) -> usize {
        let mut missing: Vec<ChunkCoord> = focal
            .square(self.generation_distance)
            .filter(|c| !self.loader.is_pending(*c))
            .filter(|c| !self.cache.has_chunk_atlas(*c, self.chunk_size))
            .collect();
        missing.sort_by_key(|c| c.distance_squared(focal));

        missing
            .into_iter()
            .filter(|c| self.loader.request_chunk(*c))
            .count()
    }

    fn enqueue_ready(&mut self, focal: ChunkCoord) -> usize {
        let mut ready: Vec<ChunkCoord> = focal
            .square(self.render_distance)
            .filter(|c| !self.drawn.contains(c) && !self.queued.contains(c))
            .filter(|c| self.cache.has_chunk_atlas(*c, self.chunk_size))
            .collect();
        ready.sort_by_key(|c| c.distance_squared(focal));

        for chunk in &ready {
            self.queued.insert(*chunk);
            self.draw_queue.push_back(*chunk);
        }
        ready.len()
    }

    /// Undraw everything outside the render radius at once. Cached data stays.
    fn unload_distant(&mut self, focal: ChunkCoord, renderer: &mut dyn ChunkRenderer) -> usize {
        let radius = self.render_distance;
        let leaving: Vec<ChunkCoord> = self
            .drawn
            .iter()
            .filter(|c| c.chebyshev_distance(focal) > radius)
            .copied()
            .collect();

        for chunk in &leaving {
            let cells: Vec<CellCoord> = chunk.cells(self.chunk_size).collect();
            renderer.undraw_chunk(*chunk, &cells);
            if self.debug_overlay {
                renderer.erase_debug_overlay(*chunk);
            }
            self.drawn.remove(chunk);
        }

        let queued = &mut self.queued;
        self.draw_queue.retain(|c| {
            let keep = c.chebyshev_distance(focal) <= radius;
            if !keep {
                queued.remove(c);
            }
            keep
        });

        leaving.len()
    }

    fn draw_budgeted(&mut self, renderer: &mut dyn ChunkRenderer) -> usize {
        let mut drawn = 0;
        while drawn < self.render_budget {
            let Some(chunk) = self.draw_queue.pop_front() else {
                break;
            };
            self.queued.remove(&chunk);

            let Some(cells) = self.cache.chunk_atlas(chunk, self.chunk_size) else {
                tracing::warn!("Chunk {:?} queued without tiles, skipping", chunk);
                continue;
            };
            renderer.draw_chunk(chunk, &cells);
            if self.debug_overlay {
                renderer.draw_debug_overlay(chunk);
            }
            self.drawn.insert(chunk);
            drawn += 1;
        }
        drawn
    }

    pub fn is_drawn(&self, chunk: ChunkCoord) -> bool {
        self.drawn.contains(&chunk)
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn.len()
    }

    pub fn queued_count(&self) -> usize {
        self.draw_queue.len()
    }

    pub fn focal_chunk(&self) -> Option<ChunkCoord> {
        self.focal
    }

    pub fn loader(&self) -> &ChunkLoader {
        &self.loader
    }

    pub fn cache(&self) -> &Arc<TerrainCache> {
        &self.cache
    }
}
