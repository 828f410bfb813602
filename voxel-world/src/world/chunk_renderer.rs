use anyhow::Result;
use cgmath::Matrix4;
use log::trace;

use crate::rendering::frustum::Frustum;
use crate::rendering::{MeshBackend, MeshBuffers};
use crate::world::chunk_manager::ChunkManager;
use crate::world::location::ChunkLocation;
use crate::world::worldgen::HeightMap;

/// Everything needed to issue one indexed draw of a chunk
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub location: ChunkLocation,
    pub buffers: MeshBuffers,
    pub index_count: u32,
    pub model_matrix: Matrix4<f32>,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RenderStats {
    pub visible: usize,
    pub culled: usize,
    /// Meshes uploaded during this frame
    pub uploaded: usize,
    /// Visible chunks without any faces
    pub empty: usize,
    /// Outdated buffer pairs destroyed after re-uploading
    pub released: usize,
}

#[derive(Debug, Default)]
pub struct FramePlan {
    pub draw_calls: Vec<DrawCall>,
    pub stats: RenderStats,
}

/// Collects the draw calls for all chunks intersecting the frustum.
///
/// Visible chunks whose mesh changed since the last upload are uploaded first. Their previous buffers are
/// destroyed at the end, after waiting for the device once.
pub fn prepare_visible_chunks<H: HeightMap>(
    chunk_manager: &mut ChunkManager<H>,
    frustum: &Frustum,
    backend: &mut impl MeshBackend,
) -> Result<FramePlan> {
    let mut stale_buffers = Vec::new();
    let result = collect_draw_calls(chunk_manager, frustum, backend, &mut stale_buffers);

    // Also on error, as the buffers are detached from their chunks already
    let released = stale_buffers.len();
    if released > 0 {
        backend.wait_idle();
        for buffers in stale_buffers {
            backend.destroy_buffers(buffers);
        }
    }

    let mut plan = result?;
    plan.stats.released = released;
    Ok(plan)
}

fn collect_draw_calls<H: HeightMap>(
    chunk_manager: &mut ChunkManager<H>,
    frustum: &Frustum,
    backend: &mut impl MeshBackend,
    stale_buffers: &mut Vec<MeshBuffers>,
) -> Result<FramePlan> {
    let mut plan = FramePlan::default();

    for chunk in chunk_manager.chunks_mut() {
        let sphere = chunk.bounding_sphere();
        if !frustum.is_sphere_visible(sphere.center, sphere.radius) {
            plan.stats.culled += 1;
            continue;
        }
        plan.stats.visible += 1;

        if !chunk.is_uploaded() {
            stale_buffers.extend(chunk.take_buffers());

            let buffers = if chunk.mesh().is_empty() {
                None
            } else {
                trace!("Uploading chunk {:?} with {} faces", chunk.location, chunk.mesh().num_faces());
                plan.stats.uploaded += 1;
                Some(backend.upload_mesh(chunk.vertices(), chunk.indices())?)
            };

            chunk.mark_uploaded(buffers);
        }

        match chunk.buffers() {
            Some(buffers) => plan.draw_calls.push(DrawCall {
                location: chunk.location,
                buffers,
                index_count: chunk.indices().len() as u32,
                model_matrix: chunk.model_matrix(),
            }),
            None => plan.stats.empty += 1,
        }
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Vector3};

    use crate::rendering::HeadlessMeshBackend;
    use crate::rendering::camera::{Camera, Projection};
    use crate::rendering::frustum::Frustum;
    use crate::world::block::Block;
    use crate::world::chunk_manager::ChunkManager;
    use crate::world::chunk_renderer::prepare_visible_chunks;
    use crate::world::location::{ChunkLocation, WorldLocation};
    use crate::world::worldgen::{FlatHeightMap, WorldGenerator};

    /// Looking straight along +x from above the origin
    fn frustum() -> Frustum {
        let projection = Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0);
        let camera = Camera::new((8.0, 30.0, 8.0), Deg(0.0), Deg(0.0), projection);
        Frustum::from_view_projection(&camera.view_projection())
    }

    fn manager() -> ChunkManager<FlatHeightMap> {
        ChunkManager::with_generator(WorldGenerator::with_height_map(FlatHeightMap(10.0), 0.0))
    }

    #[test]
    fn test_chunks_are_uploaded_once() {
        let mut manager = manager();
        let mut backend = HeadlessMeshBackend::new();
        manager.update_world(Vector3::new(8.0, 30.0, 8.0), 1, 100, &mut backend);

        let plan = prepare_visible_chunks(&mut manager, &frustum(), &mut backend).unwrap();
        assert!(plan.stats.visible > 0);
        assert_eq!(plan.stats.visible + plan.stats.culled, 9);
        assert_eq!(plan.stats.uploaded, plan.stats.visible);
        assert_eq!(plan.draw_calls.len(), plan.stats.visible);
        assert_eq!(backend.stats.uploads, plan.stats.visible);

        let plan = prepare_visible_chunks(&mut manager, &frustum(), &mut backend).unwrap();
        assert_eq!(plan.stats.uploaded, 0);
        assert_eq!(plan.draw_calls.len(), plan.stats.visible);
        assert_eq!(backend.stats.waits, 0);
    }

    #[test]
    fn test_chunks_behind_the_camera_are_culled() {
        let mut manager = manager();
        let mut backend = HeadlessMeshBackend::new();
        manager.generate_chunk(ChunkLocation::new(-5, 0));
        manager.generate_chunk(ChunkLocation::new(3, 0));

        let plan = prepare_visible_chunks(&mut manager, &frustum(), &mut backend).unwrap();

        assert_eq!(plan.stats.culled, 1);
        assert_eq!(plan.draw_calls.len(), 1);
        assert_eq!(plan.draw_calls[0].location, ChunkLocation::new(3, 0));
        assert!(!manager.get_chunk(ChunkLocation::new(-5, 0)).unwrap().is_uploaded());
    }

    #[test]
    fn test_changed_mesh_is_uploaded_again() {
        let mut manager = manager();
        let mut backend = HeadlessMeshBackend::new();
        manager.generate_chunk(ChunkLocation::new(2, 0));
        prepare_visible_chunks(&mut manager, &frustum(), &mut backend).unwrap();
        assert_eq!(backend.live_buffers(), 2);

        // Digging at the edge re-meshes both chunks
        manager.generate_chunk(ChunkLocation::new(3, 0));
        manager.set_block(WorldLocation(Vector3::new(47, 10, 4)), Block::AIR);
        assert!(!manager.get_chunk(ChunkLocation::new(2, 0)).unwrap().is_uploaded());

        let plan = prepare_visible_chunks(&mut manager, &frustum(), &mut backend).unwrap();

        assert_eq!(plan.stats.uploaded, 2);
        assert_eq!(plan.stats.released, 1);
        assert_eq!(backend.stats.waits, 1);
        assert_eq!(backend.stats.destroyed, 1);
        assert_eq!(backend.live_buffers(), 4);

        let index_count = plan
            .draw_calls
            .iter()
            .find(|draw_call| draw_call.location == ChunkLocation::new(2, 0))
            .unwrap()
            .index_count;
        assert_eq!(
            index_count as usize,
            manager.get_chunk(ChunkLocation::new(2, 0)).unwrap().indices().len()
        );
    }

    #[test]
    fn test_empty_chunk_is_not_uploaded() {
        let mut manager =
            ChunkManager::with_generator(WorldGenerator::with_height_map(FlatHeightMap(-10.0), 0.0));
        let mut backend = HeadlessMeshBackend::new();
        manager.generate_chunk(ChunkLocation::new(1, 0));

        let plan = prepare_visible_chunks(&mut manager, &frustum(), &mut backend).unwrap();

        assert_eq!(plan.stats.empty, 1);
        assert!(plan.draw_calls.is_empty());
        assert_eq!(backend.stats.uploads, 0);
        assert!(manager.get_chunk(ChunkLocation::new(1, 0)).unwrap().is_uploaded());
    }
}
