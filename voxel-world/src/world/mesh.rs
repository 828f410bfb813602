use bytemuck::{Pod, Zeroable};
use cgmath::{Vector2, Vector3};
use static_assertions::const_assert_eq;
use wgpu::vertex_attr_array;

use crate::world::meshing::quad::{QUAD_INDICES, QUAD_TEX_COORDS, Quad};

/// Geometry of a chunk in chunk local space. Every face owns its 4 vertices, nothing is shared between faces.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_quad(&mut self, quad: &Quad) {
        let base_index = self.vertices.len() as u32;
        let normal = quad.direction.normal();

        for (position, tex_coords) in quad.corners().into_iter().zip(QUAD_TEX_COORDS) {
            self.vertices
                .push(Vertex::new(position, normal, tex_coords, quad.texture_index as i32));
        }

        self.indices
            .extend(QUAD_INDICES.iter().map(|i| base_index + i));
    }

    pub fn num_faces(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub tex_coords: Vector2<f32>,
    pub texture_index: i32,
}

const_assert_eq!(size_of::<Vertex>(), 36);

impl Vertex {
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>, tex_coords: Vector2<f32>, texture_index: i32) -> Self {
        Self {
            position,
            normal,
            tex_coords,
            texture_index,
        }
    }

    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2, 3 => Sint32];

        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as _,
            attributes: &ATTRIBUTES,
            step_mode: wgpu::VertexStepMode::Vertex,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector2, Vector3};

    use crate::world::location::LocalChunkLocation;
    use crate::world::mesh::{ChunkMesh, Vertex};
    use crate::world::meshing::direction::Direction;
    use crate::world::meshing::quad::Quad;

    #[test]
    fn test_push_quad() {
        let position = LocalChunkLocation::new(Vector3::new(1, 2, 3))
            .try_into_checked()
            .unwrap();
        let mut mesh = ChunkMesh::new();

        mesh.push_quad(&Quad::new(position, Direction::YPos, 4));
        mesh.push_quad(&Quad::new(position, Direction::XPos, 3));

        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);

        assert_eq!(
            mesh.vertices[0],
            Vertex::new(Vector3::new(1.0, 3.0, 3.0), Vector3::new(0.0, 1.0, 0.0), Vector2::new(0.0, 1.0), 4)
        );
        assert_eq!(
            mesh.vertices[6],
            Vertex::new(Vector3::new(2.0, 3.0, 4.0), Vector3::new(1.0, 0.0, 0.0), Vector2::new(1.0, 0.0), 3)
        );
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_vertex_layout_matches_struct() {
        assert_eq!(Vertex::layout().array_stride, 36);
    }
}
