use std::ops::AddAssign;

use enum_map::EnumMap;
use strum::IntoEnumIterator;

use crate::world::block::Block;
use crate::world::chunk_data::ChunkData;
use crate::world::location::{ChunkLocation, LocalChunkLocation, WithinBounds};
use crate::world::mesh::ChunkMesh;
use crate::world::meshing::direction::Direction;
use crate::world::meshing::quad::Quad;

pub mod direction;
pub mod quad;

/// What lies on the other side of a block face.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NeighborBlock {
    Solid,
    Air,
    /// The neighboring chunk is not loaded yet
    Unknown,
}

impl NeighborBlock {
    /// A location without a block (e.g. above the world) counts as air
    fn from_block(block: Option<Block>) -> Self {
        match block {
            Some(block) if !block.is_air() => NeighborBlock::Solid,
            _ => NeighborBlock::Air,
        }
    }
}

/// Block data of the four horizontally adjacent chunks, if they are loaded
#[derive(Default)]
pub struct NeighborChunks<'a> {
    chunks: EnumMap<Direction, Option<&'a ChunkData>>,
}

impl<'a> NeighborChunks<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new<F: Fn(ChunkLocation) -> Option<&'a ChunkData>>(around: ChunkLocation, get_chunk: F) -> Self {
        let mut chunks = EnumMap::default();

        for dir in Direction::HORIZONTAL {
            if let Some(offset) = dir.chunk_offset() {
                chunks[dir] = get_chunk(around + offset);
            }
        }

        Self { chunks }
    }

    pub fn get(&self, direction: Direction) -> Option<&'a ChunkData> {
        self.chunks[direction]
    }
}

/// Faces of a chunk whose visibility is known, plus the faces that wait for a neighbor chunk
#[derive(Debug, Default)]
pub struct MeshOutput {
    pub mesh: ChunkMesh,
    pub deferred_faces: Vec<Quad>,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DeferredResolution {
    /// Deferred faces whose neighbor is loaded now
    pub resolved: usize,
    /// Resolved faces that turned out to be visible and were added to the mesh
    pub appended: usize,
}

impl AddAssign for DeferredResolution {
    fn add_assign(&mut self, rhs: Self) {
        self.resolved += rhs.resolved;
        self.appended += rhs.appended;
    }
}

pub struct ChunkMeshGenerator;

impl ChunkMeshGenerator {
    pub fn neighbor_block(
        data: &ChunkData,
        neighbor_chunks: &NeighborChunks,
        position: LocalChunkLocation<WithinBounds>,
        direction: Direction,
    ) -> NeighborBlock {
        let neighbor_location = position + direction;

        if let Some(same_chunk_neighbor) = neighbor_location.try_into_checked() {
            return NeighborBlock::from_block(Some(data.get_block(same_chunk_neighbor)));
        }

        // Chunks are never stacked, so there is nothing above or below the chunk
        if direction.chunk_offset().is_none() {
            return NeighborBlock::Air;
        }

        match neighbor_chunks.get(direction) {
            Some(neighbor) => NeighborBlock::from_block(neighbor.try_get_block(neighbor_location.wrap_horizontally())),
            None => NeighborBlock::Unknown,
        }
    }

    pub fn generate_culled_mesh(data: &ChunkData, neighbor_chunks: &NeighborChunks) -> MeshOutput {
        let mut output = MeshOutput::default();

        for pos in LocalChunkLocation::iter() {
            let block = data.get_block(pos);
            if block.is_air() {
                continue;
            }

            for dir in Direction::iter() {
                let quad = Quad::new(pos, dir, block.texture_for(dir));

                match Self::neighbor_block(data, neighbor_chunks, pos, dir) {
                    NeighborBlock::Air => output.mesh.push_quad(&quad),
                    NeighborBlock::Unknown => output.deferred_faces.push(quad),
                    NeighborBlock::Solid => {}
                }
            }
        }

        output
    }

    /// Decides every deferred face whose neighbor chunk is loaded now. Visible ones are appended to `mesh`,
    /// and all decided faces are removed from `deferred_faces`.
    pub fn resolve_deferred_faces(
        data: &ChunkData,
        mesh: &mut ChunkMesh,
        deferred_faces: &mut Vec<Quad>,
        neighbor_chunks: &NeighborChunks,
    ) -> DeferredResolution {
        let mut resolution = DeferredResolution::default();

        deferred_faces.retain(|quad| match Self::neighbor_block(data, neighbor_chunks, quad.position, quad.direction) {
            NeighborBlock::Unknown => true,
            NeighborBlock::Air => {
                mesh.push_quad(quad);
                resolution.resolved += 1;
                resolution.appended += 1;
                false
            }
            NeighborBlock::Solid => {
                resolution.resolved += 1;
                false
            }
        });

        resolution
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use crate::world::block::Block;
    use crate::world::chunk_data::ChunkData;
    use crate::world::location::{ChunkLocation, LocalChunkLocation, WithinBounds};
    use crate::world::meshing::direction::Direction;
    use crate::world::meshing::{ChunkMeshGenerator, NeighborBlock, NeighborChunks};

    fn loc(x: i32, y: i32, z: i32) -> LocalChunkLocation<WithinBounds> {
        LocalChunkLocation::new(Vector3::new(x, y, z))
            .try_into_checked()
            .unwrap()
    }

    #[test]
    fn test_isolated_block_has_six_faces() {
        let mut data = ChunkData::default();
        data.set_block(loc(8, 30, 8), Block::STONE);

        let output = ChunkMeshGenerator::generate_culled_mesh(&data, &NeighborChunks::none());

        assert_eq!(output.mesh.vertices.len(), 24);
        assert_eq!(output.mesh.indices.len(), 36);
        assert!(output.deferred_faces.is_empty());
    }

    #[test]
    fn test_enclosed_block_has_no_faces() {
        let mut data = ChunkData::default();
        data.set_block(loc(8, 30, 8), Block::DIRT);
        for dir in [
            Direction::XPos,
            Direction::XNeg,
            Direction::YPos,
            Direction::YNeg,
            Direction::ZPos,
            Direction::ZNeg,
        ] {
            let neighbor = (loc(8, 30, 8) + dir).try_into_checked().unwrap();
            data.set_block(neighbor, Block::STONE);
        }

        let output = ChunkMeshGenerator::generate_culled_mesh(&data, &NeighborChunks::none());

        // 7 blocks in a plus shape: each outer block shows 5 faces, the center none
        assert_eq!(output.mesh.num_faces(), 6 * 5);
        assert!(output.deferred_faces.is_empty());
        for dir in Direction::HORIZONTAL.into_iter().chain([Direction::YPos, Direction::YNeg]) {
            assert_eq!(
                ChunkMeshGenerator::neighbor_block(&data, &NeighborChunks::none(), loc(8, 30, 8), dir),
                NeighborBlock::Solid
            );
        }
    }

    #[test]
    fn test_vertical_world_edges_are_visible() {
        let mut data = ChunkData::default();
        data.set_block(loc(4, 0, 4), Block::STONE);
        data.set_block(loc(4, 63, 4), Block::STONE);
        let neighbors = NeighborChunks::none();

        assert_eq!(
            ChunkMeshGenerator::neighbor_block(&data, &neighbors, loc(4, 0, 4), Direction::YNeg),
            NeighborBlock::Air
        );
        assert_eq!(
            ChunkMeshGenerator::neighbor_block(&data, &neighbors, loc(4, 63, 4), Direction::YPos),
            NeighborBlock::Air
        );

        let output = ChunkMeshGenerator::generate_culled_mesh(&data, &neighbors);
        assert_eq!(output.mesh.num_faces(), 12);
    }

    #[test]
    fn test_boundary_faces_are_deferred_without_neighbors() {
        let mut data = ChunkData::default();
        data.set_block(loc(15, 10, 0), Block::GRASS);

        let output = ChunkMeshGenerator::generate_culled_mesh(&data, &NeighborChunks::none());

        assert_eq!(output.mesh.num_faces(), 4);
        assert_eq!(output.deferred_faces.len(), 2);
        assert!(
            output
                .deferred_faces
                .iter()
                .any(|quad| quad.direction == Direction::XPos && quad.texture_index == 3)
        );
        assert!(
            output
                .deferred_faces
                .iter()
                .any(|quad| quad.direction == Direction::ZNeg)
        );
    }

    #[test]
    fn test_boundary_faces_resolve_against_neighbor_edge() {
        let mut data = ChunkData::default();
        data.set_block(loc(15, 10, 5), Block::STONE);
        data.set_block(loc(0, 10, 5), Block::STONE);

        let mut right = ChunkData::default();
        right.set_block(loc(0, 10, 5), Block::STONE);
        let left = ChunkData::default();

        let origin = ChunkLocation::new(0, 0);
        let neighbors = NeighborChunks::new(origin, |location| {
            if location == ChunkLocation::new(1, 0) {
                Some(&right)
            } else if location == ChunkLocation::new(-1, 0) {
                Some(&left)
            } else {
                None
            }
        });

        assert_eq!(
            ChunkMeshGenerator::neighbor_block(&data, &neighbors, loc(15, 10, 5), Direction::XPos),
            NeighborBlock::Solid
        );
        assert_eq!(
            ChunkMeshGenerator::neighbor_block(&data, &neighbors, loc(0, 10, 5), Direction::XNeg),
            NeighborBlock::Air
        );
        assert_eq!(
            ChunkMeshGenerator::neighbor_block(&data, &neighbors, loc(0, 10, 5), Direction::ZPos),
            NeighborBlock::Air
        );
        assert_eq!(
            ChunkMeshGenerator::neighbor_block(&data, &neighbors, loc(5, 10, 15), Direction::ZPos),
            NeighborBlock::Unknown
        );
    }

    #[test]
    fn test_resolve_deferred_faces() {
        let mut data = ChunkData::default();
        data.set_block(loc(15, 10, 5), Block::STONE);
        data.set_block(loc(15, 11, 5), Block::STONE);

        let mut output = ChunkMeshGenerator::generate_culled_mesh(&data, &NeighborChunks::none());
        let faces_before = output.mesh.num_faces();
        assert_eq!(
            output
                .deferred_faces
                .iter()
                .filter(|quad| quad.direction == Direction::XPos)
                .count(),
            2
        );

        let mut right = ChunkData::default();
        right.set_block(loc(0, 10, 5), Block::DIRT);
        let neighbors = NeighborChunks::new(ChunkLocation::new(0, 0), |location| {
            (location == ChunkLocation::new(1, 0)).then_some(&right)
        });

        let resolution = ChunkMeshGenerator::resolve_deferred_faces(&data, &mut output.mesh, &mut output.deferred_faces, &neighbors);

        assert_eq!(resolution.resolved, 2);
        assert_eq!(resolution.appended, 1);
        assert_eq!(output.mesh.num_faces(), faces_before + 1);
        assert!(
            output
                .deferred_faces
                .iter()
                .all(|quad| quad.direction != Direction::XPos)
        );
    }
}
