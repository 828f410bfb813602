use cgmath::{InnerSpace, Matrix4, Rad, Vector3};

use crate::rendering::MeshBuffers;
use crate::world::block::Block;
use crate::world::chunk_data::ChunkData;
use crate::world::location::{ChunkLocation, LocalChunkLocation, OutsideBounds, WithinBounds};
use crate::world::mesh::{ChunkMesh, Vertex};
use crate::world::meshing::quad::Quad;
use crate::world::meshing::{ChunkMeshGenerator, DeferredResolution, MeshOutput, NeighborChunks};
use crate::world::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vector3<f32>,
    pub radius: f32,
}

/// A loaded chunk: its blocks, its mesh and the state of the mesh on the GPU.
#[derive(Debug)]
pub struct Chunk {
    pub location: ChunkLocation,
    data: ChunkData,

    mesh: ChunkMesh,
    /// Faces at the chunk border whose neighbor chunk was not loaded while meshing
    deferred_faces: Vec<Quad>,

    model_matrix: Matrix4<f32>,
    bounding_sphere: BoundingSphere,

    uploaded: bool,
    buffers: Option<MeshBuffers>,
}

impl Chunk {
    /// Creates a chunk without any mesh. Call [Chunk::set_mesh] or [Chunk::generate_mesh] to build it.
    pub fn new(location: ChunkLocation, data: ChunkData) -> Self {
        let origin = location.to_world_location_f32();
        let half_extents = Vector3::new(CHUNK_SIZE_X as f32, CHUNK_SIZE_Y as f32, CHUNK_SIZE_Z as f32) / 2.0;

        Self {
            location,
            data,
            mesh: ChunkMesh::new(),
            deferred_faces: Vec::new(),
            model_matrix: Matrix4::from_translation(origin) * Matrix4::from_scale(1.0) * Matrix4::from_angle_y(Rad(0.0)),
            bounding_sphere: BoundingSphere {
                center: origin + half_extents,
                radius: half_extents.magnitude(),
            },
            uploaded: false,
            buffers: None,
        }
    }

    /// Meshes this chunk on its own. All faces on the horizontal chunk borders are deferred.
    pub fn generate_mesh(&mut self) {
        let output = ChunkMeshGenerator::generate_culled_mesh(&self.data, &NeighborChunks::none());
        self.set_mesh(output);
    }

    /// Replaces the mesh and all deferred faces
    pub fn set_mesh(&mut self, output: MeshOutput) {
        self.mesh = output.mesh;
        self.deferred_faces = output.deferred_faces;
        self.uploaded = false;
    }

    pub fn resolve_deferred_faces(&mut self, neighbor_chunks: &NeighborChunks) -> DeferredResolution {
        if self.deferred_faces.is_empty() {
            return DeferredResolution::default();
        }

        let resolution =
            ChunkMeshGenerator::resolve_deferred_faces(&self.data, &mut self.mesh, &mut self.deferred_faces, neighbor_chunks);

        if resolution.appended > 0 {
            self.uploaded = false;
        }

        resolution
    }

    pub fn data(&self) -> &ChunkData {
        &self.data
    }

    pub fn get_block(&self, local_location: LocalChunkLocation<OutsideBounds>) -> Option<Block> {
        self.data.try_get_block(local_location)
    }

    /// Only changes the block data. The mesh stays as it is until the chunk is meshed again.
    pub fn set_block(&mut self, local_location: LocalChunkLocation<WithinBounds>, block: Block) {
        self.data.set_block(local_location, block);
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.mesh.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.mesh.indices
    }

    pub fn deferred_faces(&self) -> &[Quad] {
        &self.deferred_faces
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model_matrix
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    /// Whether the GPU buffers reflect the current mesh
    pub fn is_uploaded(&self) -> bool {
        self.uploaded
    }

    /// GPU buffers of the last upload. Empty meshes are never uploaded and have none.
    pub fn buffers(&self) -> Option<MeshBuffers> {
        self.buffers
    }

    pub fn mark_uploaded(&mut self, buffers: Option<MeshBuffers>) {
        self.buffers = buffers;
        self.uploaded = true;
    }

    /// Detaches the GPU buffers so they can be destroyed. The chunk needs to be uploaded again afterwards.
    pub fn take_buffers(&mut self) -> Option<MeshBuffers> {
        self.uploaded = false;
        self.buffers.take()
    }
}
