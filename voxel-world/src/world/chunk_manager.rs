use cgmath::Vector3;
use hashbrown::HashMap;
use itertools::iproduct;
use log::{debug, trace};

use crate::WorldConfig;
use crate::rendering::MeshBackend;
use crate::timing::TimerManager;
use crate::world::block::Block;
use crate::world::chunk::Chunk;
use crate::world::chunk_data::ChunkData;
use crate::world::generation_queue::GenerationQueue;
use crate::world::location::{ChunkLocation, LocalChunkLocation, WorldLocation};
use crate::world::meshing::direction::Direction;
use crate::world::meshing::{ChunkMeshGenerator, DeferredResolution, MeshOutput, NeighborChunks};
use crate::world::worldgen::{HeightMap, PerlinHeightMap, WorldGenerator};

/// What a single [ChunkManager::update_world] call did
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdateStats {
    pub enqueued: usize,
    pub generated: usize,
    /// Queue entries for chunks that were already loaded when popped
    pub stale_skipped: usize,
    pub faces_resolved: usize,
    pub faces_appended: usize,
    pub unloaded: usize,
}

pub struct ChunkManager<H = PerlinHeightMap> {
    chunks: HashMap<ChunkLocation, Chunk>,
    generation_queue: GenerationQueue,
    generator: WorldGenerator<H>,
    timer: TimerManager,
}

impl ChunkManager {
    pub fn new(config: &WorldConfig) -> Self {
        Self::with_generator(WorldGenerator::new(config.seed, &config.terrain))
    }

    /// Looks up the block at a world location within the given chunk.
    /// The horizontal coordinates are wrapped into the chunk, `None` is returned for a missing chunk or
    /// a y outside of the world.
    pub fn get_block_in_chunk(world_location: Vector3<i32>, chunk: Option<&Chunk>) -> Option<Block> {
        chunk?.get_block(LocalChunkLocation::new(world_location).wrap_horizontally())
    }
}

impl<H: HeightMap> ChunkManager<H> {
    pub fn with_generator(generator: WorldGenerator<H>) -> Self {
        Self {
            chunks: HashMap::new(),
            generation_queue: GenerationQueue::new(),
            generator,
            timer: TimerManager::new(),
        }
    }

    /// Streams the world around the viewer: queues missing chunks, generates up to `chunks_per_frame`
    /// of them and unloads chunks that are too far away
    pub fn update_world(
        &mut self,
        viewer_position: Vector3<f32>,
        view_distance: i32,
        chunks_per_frame: usize,
        backend: &mut impl MeshBackend,
    ) -> UpdateStats {
        self.timer.start("update_world");

        self.timer.start("enqueue");
        let enqueued = self.enqueue_chunks_around(viewer_position, view_distance);
        self.timer.end("enqueue");

        self.timer.start("generate");
        let mut stats = self.process_generation_queue(chunks_per_frame);
        self.timer.end("generate");

        self.timer.start("unload");
        stats.unloaded = self.unload_distant_chunks(viewer_position, view_distance, backend);
        self.timer.end("unload");

        stats.enqueued = enqueued;
        self.timer.end("update_world");

        if stats.generated > 0 || stats.unloaded > 0 {
            debug!(
                "Generated {} and unloaded {} chunks, {} loaded, {} queued",
                stats.generated,
                stats.unloaded,
                self.chunks.len(),
                self.generation_queue.len()
            );
        }
        trace!("{stats:?}");

        stats
    }

    /// Queues every chunk in the square of `view_distance` chunks around the viewer that is not loaded yet.
    /// Returns the number of queued chunks.
    pub fn enqueue_chunks_around(&mut self, viewer_position: Vector3<f32>, view_distance: i32) -> usize {
        let viewer_chunk = ChunkLocation::from_world_location_f32(viewer_position);

        let mut enqueued = 0;
        for (dx, dz) in iproduct!(-view_distance..=view_distance, -view_distance..=view_distance) {
            let location = viewer_chunk + ChunkLocation::new(dx, dz);
            if self.chunks.contains_key(&location) {
                continue;
            }

            self.generation_queue
                .insert(location, location.distance_to(viewer_chunk));
            enqueued += 1;
        }

        enqueued
    }

    /// Generates the nearest queued chunks. Stale entries do not count against `chunks_per_frame`.
    ///
    /// Every call of [ChunkManager::enqueue_chunks_around] queues all missing chunks again, so while the viewer
    /// waits for a large area the queue fills up with duplicates. Popping through all of them can stall a frame.
    pub fn process_generation_queue(&mut self, chunks_per_frame: usize) -> UpdateStats {
        let mut stats = UpdateStats::default();

        while stats.generated < chunks_per_frame {
            let Some((location, distance)) = self.generation_queue.pop() else {
                break;
            };

            if self.chunks.contains_key(&location) {
                stats.stale_skipped += 1;
                continue;
            }

            trace!("Generating chunk {location:?} at distance {distance}");
            let resolution = self.generate_chunk(location);

            stats.generated += 1;
            stats.faces_resolved += resolution.resolved;
            stats.faces_appended += resolution.appended;
        }

        stats
    }

    /// Generates and meshes a chunk, then resolves the faces its horizontal neighbors deferred towards it.
    /// Does nothing if the chunk is loaded already.
    pub fn generate_chunk(&mut self, location: ChunkLocation) -> DeferredResolution {
        if self.chunks.contains_key(&location) {
            return DeferredResolution::default();
        }

        let data = self.generator.get_chunk_data_at(location);

        let mut chunk = Chunk::new(location, data);
        chunk.set_mesh(self.mesh_with_neighbors(location, chunk.data()));
        self.chunks.insert(location, chunk);

        let mut resolution = DeferredResolution::default();
        for offset in Direction::HORIZONTAL.iter().filter_map(|dir| dir.chunk_offset()) {
            resolution += self.resolve_deferred_faces(location + offset);
        }

        resolution
    }

    /// Retries the deferred faces of a loaded chunk against its currently loaded neighbors
    pub fn resolve_deferred_faces(&mut self, location: ChunkLocation) -> DeferredResolution {
        let has_deferred_faces = self
            .chunks
            .get(&location)
            .is_some_and(|chunk| !chunk.deferred_faces().is_empty());
        if !has_deferred_faces {
            return DeferredResolution::default();
        }

        // Taken out of the map, so the neighbors can be borrowed while it is mutated
        let Some(mut chunk) = self.chunks.remove(&location) else {
            return DeferredResolution::default();
        };

        let neighbors = NeighborChunks::new(location, |loc| self.chunks.get(&loc).map(Chunk::data));
        let resolution = chunk.resolve_deferred_faces(&neighbors);

        self.chunks.insert(location, chunk);

        resolution
    }

    /// Removes every chunk further than twice the view distance from the viewer on either axis
    /// and destroys its GPU buffers. Returns the number of removed chunks.
    pub fn unload_distant_chunks(
        &mut self,
        viewer_position: Vector3<f32>,
        view_distance: i32,
        backend: &mut impl MeshBackend,
    ) -> usize {
        let viewer_chunk = ChunkLocation::from_world_location_f32(viewer_position);
        let unload_distance = view_distance * 2;

        let distant: Vec<ChunkLocation> = self
            .chunks
            .keys()
            .filter(|location| location.axis_distance_to(viewer_chunk) > unload_distance)
            .copied()
            .collect();

        let removed: Vec<Chunk> = distant
            .iter()
            .filter_map(|location| self.chunks.remove(location))
            .collect();

        let num_removed = removed.len();
        release_chunk_buffers(removed, backend);

        num_removed
    }

    /// Unloads everything and forgets all queued chunks
    pub fn clear_chunks(&mut self, backend: &mut impl MeshBackend) {
        let removed: Vec<Chunk> = self.chunks.drain().map(|(_, chunk)| chunk).collect();
        debug!("Clearing {} chunks", removed.len());

        release_chunk_buffers(removed, backend);
        self.generation_queue.clear();
    }

    pub fn get_block(&self, location: WorldLocation) -> Option<Block> {
        let (chunk_location, local_location) = location.separate()?;
        let chunk = self.chunks.get(&chunk_location)?;

        Some(chunk.data().get_block(local_location))
    }

    /// Replaces a block in a loaded chunk and re-meshes everything that can see it.
    /// Returns the previous block, or `None` if the location is not loaded.
    pub fn set_block(&mut self, location: WorldLocation, block: Block) -> Option<Block> {
        let (chunk_location, local_location) = location.separate()?;
        let chunk = self.chunks.get_mut(&chunk_location)?;

        let previous = chunk.data().get_block(local_location);
        if previous == block {
            return Some(previous);
        }
        chunk.set_block(local_location, block);

        self.remesh_chunk(chunk_location);
        for dir in Direction::HORIZONTAL {
            if let Some(offset) = dir.chunk_offset()
                && local_location.is_on_edge(dir)
            {
                self.remesh_chunk(chunk_location + offset);
            }
        }

        Some(previous)
    }

    pub fn get_chunk(&self, location: ChunkLocation) -> Option<&Chunk> {
        self.chunks.get(&location)
    }

    pub fn chunks(&self) -> &HashMap<ChunkLocation, Chunk> {
        &self.chunks
    }

    pub(crate) fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.chunks.values_mut()
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn queue_len(&self) -> usize {
        self.generation_queue.len()
    }

    pub fn timer(&self) -> &TimerManager {
        &self.timer
    }

    pub fn generator(&self) -> &WorldGenerator<H> {
        &self.generator
    }

    fn remesh_chunk(&mut self, location: ChunkLocation) {
        let Some(mut chunk) = self.chunks.remove(&location) else {
            return;
        };

        let output = self.mesh_with_neighbors(location, chunk.data());
        chunk.set_mesh(output);

        self.chunks.insert(location, chunk);
    }

    fn mesh_with_neighbors(&self, location: ChunkLocation, data: &ChunkData) -> MeshOutput {
        let neighbors = NeighborChunks::new(location, |loc| self.chunks.get(&loc).map(Chunk::data));
        ChunkMeshGenerator::generate_culled_mesh(data, &neighbors)
    }
}

/// Destroys the buffers of removed chunks, waiting for the device only once
fn release_chunk_buffers(chunks: Vec<Chunk>, backend: &mut impl MeshBackend) {
    let buffers: Vec<_> = chunks
        .into_iter()
        .filter_map(|mut chunk| chunk.take_buffers())
        .collect();

    if buffers.is_empty() {
        return;
    }

    backend.wait_idle();
    for buffers in buffers {
        backend.destroy_buffers(buffers);
    }
}
