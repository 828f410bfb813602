use anyhow::{Context, Result};
use hashbrown::HashMap;
use log::{info, warn};
use wgpu::util::DeviceExt;

use crate::rendering::{BufferHandle, MeshBackend, MeshBuffers};
use crate::world::mesh::Vertex;

/// Chunk mesh buffers on a wgpu device
pub struct WgpuMeshBackend {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,

    buffers: HashMap<BufferHandle, wgpu::Buffer>,
    next_handle: u64,
}

impl WgpuMeshBackend {
    /// Creates a device without a surface, e.g. for running the world simulation headless
    pub async fn new_headless() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("WGPU could not find a compatible adapter")?;

        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Chunk mesh device"),
                ..Default::default()
            })
            .await
            .context("Could not request device and queue")?;

        Ok(Self::new(device, queue))
    }

    pub fn new_headless_blocking() -> Result<Self> {
        pollster::block_on(Self::new_headless())
    }

    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Looks up the buffer behind a handle, e.g. to bind it in a render pass
    pub fn buffer(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(&handle)
    }

    pub fn num_buffers(&self) -> usize {
        self.buffers.len()
    }

    fn create_buffer(&mut self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> BufferHandle {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                usage,
                contents,
            });

        let handle = BufferHandle(self.next_handle);
        self.next_handle += 1;
        self.buffers.insert(handle, buffer);

        handle
    }
}

impl MeshBackend for WgpuMeshBackend {
    fn upload_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<MeshBuffers> {
        if vertices.is_empty() || indices.is_empty() {
            anyhow::bail!("Cannot create GPU buffers for an empty mesh");
        }

        let vertex_buffer = self.create_buffer(
            "Chunk vertex buffer",
            bytemuck::cast_slice(vertices),
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );
        let index_buffer = self.create_buffer(
            "Chunk index buffer",
            bytemuck::cast_slice(indices),
            wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        );

        Ok(MeshBuffers {
            vertex_buffer,
            index_buffer,
        })
    }

    fn destroy_buffers(&mut self, buffers: MeshBuffers) {
        for handle in [buffers.vertex_buffer, buffers.index_buffer] {
            match self.buffers.remove(&handle) {
                Some(buffer) => buffer.destroy(),
                None => warn!("Tried to destroy unknown buffer {handle:?}"),
            }
        }
    }

    fn wait_idle(&mut self) {
        if let Err(err) = self.device.poll(wgpu::PollType::Wait) {
            warn!("Waiting for the device failed: {err}");
        }
    }
}
