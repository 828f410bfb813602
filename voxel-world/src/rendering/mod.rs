use anyhow::Result;
use hashbrown::HashSet;

use crate::world::mesh::Vertex;

pub mod camera;
pub mod frustum;
pub mod gpu;

/// Opaque id of a buffer owned by a [MeshBackend]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BufferHandle(pub u64);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MeshBuffers {
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
}

/// The part of the graphics device the world needs: creating and destroying mesh buffers.
pub trait MeshBackend {
    fn upload_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<MeshBuffers>;

    /// Must only be called after [MeshBackend::wait_idle], once no submitted work references the buffers anymore
    fn destroy_buffers(&mut self, buffers: MeshBuffers);

    /// Blocks until the device has finished all submitted work
    fn wait_idle(&mut self);
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BackendStats {
    pub uploads: usize,
    pub destroyed: usize,
    pub waits: usize,
    pub uploaded_bytes: usize,
}

/// A call made on a [HeadlessMeshBackend]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BackendEvent {
    Upload(MeshBuffers),
    Wait,
    Destroy(MeshBuffers),
}

/// A [MeshBackend] without a device. It hands out handles and keeps track of which ones are alive.
#[derive(Debug, Default)]
pub struct HeadlessMeshBackend {
    next_handle: u64,
    live_buffers: HashSet<BufferHandle>,
    pub stats: BackendStats,
    /// Every call in order
    pub events: Vec<BackendEvent>,
}

impl HeadlessMeshBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_buffers(&self) -> usize {
        self.live_buffers.len()
    }

    fn create_buffer(&mut self) -> BufferHandle {
        let handle = BufferHandle(self.next_handle);
        self.next_handle += 1;
        self.live_buffers.insert(handle);
        handle
    }
}

impl MeshBackend for HeadlessMeshBackend {
    fn upload_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<MeshBuffers> {
        self.stats.uploads += 1;
        self.stats.uploaded_bytes += size_of_val(vertices) + size_of_val(indices);

        let buffers = MeshBuffers {
            vertex_buffer: self.create_buffer(),
            index_buffer: self.create_buffer(),
        };
        self.events.push(BackendEvent::Upload(buffers));

        Ok(buffers)
    }

    fn destroy_buffers(&mut self, buffers: MeshBuffers) {
        self.stats.destroyed += 1;
        self.events.push(BackendEvent::Destroy(buffers));
        self.live_buffers.remove(&buffers.vertex_buffer);
        self.live_buffers.remove(&buffers.index_buffer);
    }

    fn wait_idle(&mut self) {
        self.stats.waits += 1;
        self.events.push(BackendEvent::Wait);
    }
}
