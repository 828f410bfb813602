use cgmath::{Vector2, Vector3};

use crate::world::location::{LocalChunkLocation, WithinBounds};
use crate::world::meshing::direction::Direction;

/// One face of a block, described by the block it belongs to and the direction it is facing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Quad {
    pub position: LocalChunkLocation<WithinBounds>,
    pub direction: Direction,
    pub texture_index: u8,
}

/// Texture coordinates of the four corners, in the same order as [Quad::corners]
pub const QUAD_TEX_COORDS: [Vector2<f32>; 4] = [
    Vector2 { x: 0.0, y: 1.0 },
    Vector2 { x: 1.0, y: 1.0 },
    Vector2 { x: 1.0, y: 0.0 },
    Vector2 { x: 0.0, y: 0.0 },
];

/// Two triangles, relative to the first vertex of the quad
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

impl Quad {
    pub fn new(position: LocalChunkLocation<WithinBounds>, direction: Direction, texture_index: u8) -> Self {
        Self {
            position,
            direction,
            texture_index,
        }
    }

    /// Corners of this face in chunk local space
    pub fn corners(&self) -> [Vector3<f32>; 4] {
        let origin = self.position.to_f32();
        face_corner_offsets(self.direction).map(|offset| origin + offset)
    }
}

#[rustfmt::skip]
fn face_corner_offsets(direction: Direction) -> [Vector3<f32>; 4] {
    let v = Vector3::new;
    match direction {
        Direction::YPos => [v(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 1.0, 1.0), v(0.0, 1.0, 1.0)],
        Direction::YNeg => [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(0.0, 0.0, 1.0)],
        Direction::ZPos => [v(0.0, 0.0, 1.0), v(1.0, 0.0, 1.0), v(1.0, 1.0, 1.0), v(0.0, 1.0, 1.0)],
        Direction::ZNeg => [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 0.0)],
        Direction::XNeg => [v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0), v(0.0, 1.0, 1.0), v(0.0, 1.0, 0.0)],
        Direction::XPos => [v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, 0.0)],
    }
}
