//! Background chunk generation with worker threads
//!
//! Requests go out over a crossbeam channel and are fire-and-forget: workers
//! publish results straight into the shared cache, and the caller observes
//! completion by polling it. The in-flight set keeps each chunk from being
//! generated twice.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, unbounded};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::core::coords::ChunkCoord;
use crate::world::generator::ChunkGenerator;

/// Request for chunk generation
#[derive(Clone, Copy, Debug)]
pub struct ChunkGenRequest {
    pub coord: ChunkCoord,
}

/// Manages background chunk generation with worker threads
pub struct ChunkLoader {
    request_tx: Option<Sender<ChunkGenRequest>>,
    in_flight: Arc<Mutex<FxHashSet<ChunkCoord>>>,
    generated: Arc<AtomicUsize>,
    generator: Arc<ChunkGenerator>,
    workers: Vec<JoinHandle<()>>,
}

impl ChunkLoader {
    /// Create a ChunkLoader with one worker per CPU core
    pub fn new(generator: Arc<ChunkGenerator>) -> Self {
        Self::with_worker_count(num_cpus::get(), generator)
    }

    /// Create a ChunkLoader with a specific number of workers
    pub fn with_worker_count(num_workers: usize, generator: Arc<ChunkGenerator>) -> Self {
        let num_workers = num_workers.max(1);
        let (request_tx, request_rx) = unbounded::<ChunkGenRequest>();
        let in_flight = Arc::new(Mutex::new(FxHashSet::default()));
        let generated = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let rx = request_rx.clone();
            let generator = Arc::clone(&generator);
            let in_flight = Arc::clone(&in_flight);
            let generated = Arc::clone(&generated);

            let spawned = thread::Builder::new()
                .name(format!("chunk-gen-{}", worker_id))
                .spawn(move || {
                    while let Ok(req) = rx.recv() {
                        generator.generate_chunk(req.coord);
                        generated.fetch_add(1, Ordering::SeqCst);
                        // Released only after the atlas is published.
                        in_flight.lock().remove(&req.coord);
                    }
                });

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => tracing::error!("Failed to spawn chunk worker {}: {}", worker_id, e),
            }
        }

        tracing::info!("Chunk loader started with {} workers", workers.len());

        ChunkLoader {
            request_tx: Some(request_tx),
            in_flight,
            generated,
            generator,
            workers,
        }
    }

    /// Queue a chunk for generation unless it is in flight or already generated.
    ///
    /// Returns `true` if this call dispatched the chunk.
    pub fn request_chunk(&self, coord: ChunkCoord) -> bool {
        {
            let mut in_flight = self.in_flight.lock();
            if in_flight.contains(&coord) {
                return false;
            }
            // The cache lock nests inside the in-flight lock on purpose. Workers
            // publish the atlas before dropping their marker and never hold both,
            // so this check cannot miss a chunk in between or deadlock.
            let generated = self
                .generator
                .cache()
                .has_chunk_atlas(coord, self.generator.chunk_size());
            if generated {
                return false;
            }
            in_flight.insert(coord);
        }

        let sent = self
            .request_tx
            .as_ref()
            .is_some_and(|tx| tx.send(ChunkGenRequest { coord }).is_ok());
        if !sent {
            tracing::warn!("Chunk workers are gone, dropping request for {:?}", coord);
            self.in_flight.lock().remove(&coord);
            return false;
        }

        tracing::trace!("Dispatched chunk ({}, {})", coord.0.x, coord.0.y);
        true
    }

    /// Check if a chunk is currently being generated
    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.in_flight.lock().contains(&coord)
    }

    pub fn pending_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Number of pipeline runs that published their chunk
    pub fn generated_count(&self) -> usize {
        self.generated.load(Ordering::SeqCst)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn generator(&self) -> &Arc<ChunkGenerator> {
        &self.generator
    }
}

impl Drop for ChunkLoader {
    fn drop(&mut self) {
        // Closing the channel lets workers finish queued chunks and exit.
        self.request_tx.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("Chunk worker panicked");
            }
        }
    }
}
