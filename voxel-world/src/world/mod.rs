use cgmath::Vector3;

pub mod block;
pub mod chunk;
pub mod chunk_data;
pub mod chunk_manager;
pub mod chunk_renderer;
pub mod generation_queue;
pub mod location;
pub mod mesh;
pub mod meshing;
pub mod worldgen;

pub const CHUNK_SIZE_X: usize = 16;
pub const CHUNK_SIZE_Y: usize = 64;
pub const CHUNK_SIZE_Z: usize = 16;

pub const CHUNK_VOLUME: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

pub fn chunk_dimensions() -> Vector3<i32> {
    Vector3::new(CHUNK_SIZE_X as i32, CHUNK_SIZE_Y as i32, CHUNK_SIZE_Z as i32)
}
