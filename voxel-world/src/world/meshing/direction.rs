use cgmath::Vector3;
use strum_macros::EnumIter;

use crate::world::location::ChunkLocation;

/// Outward direction of a block face.
///
/// `ZPos` is the front, `ZNeg` the back, `XNeg` the left and `XPos` the right face of a block.
#[derive(EnumIter, enum_map::Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    XPos,
    XNeg,
    YPos,
    YNeg,
    ZPos,
    ZNeg,
}

impl Direction {
    pub fn to_vec(self) -> Vector3<i32> {
        match self {
            Direction::XPos => Vector3::unit_x(),
            Direction::XNeg => -Vector3::unit_x(),
            Direction::YPos => Vector3::unit_y(),
            Direction::YNeg => -Vector3::unit_y(),
            Direction::ZPos => Vector3::unit_z(),
            Direction::ZNeg => -Vector3::unit_z(),
        }
    }

    pub fn normal(self) -> Vector3<f32> {
        let v = self.to_vec();
        Vector3::new(v.x as f32, v.y as f32, v.z as f32)
    }

    /// The offset to the chunk that lies in this direction. Chunks are only stacked horizontally, so vertical directions have none.
    pub fn chunk_offset(self) -> Option<ChunkLocation> {
        match self {
            Direction::XPos => Some(ChunkLocation::new(1, 0)),
            Direction::XNeg => Some(ChunkLocation::new(-1, 0)),
            Direction::ZPos => Some(ChunkLocation::new(0, 1)),
            Direction::ZNeg => Some(ChunkLocation::new(0, -1)),
            Direction::YPos | Direction::YNeg => None,
        }
    }

    pub const HORIZONTAL: [Direction; 4] = [Direction::XPos, Direction::XNeg, Direction::ZPos, Direction::ZNeg];
}

impl From<Direction> for Vector3<i32> {
    fn from(value: Direction) -> Self {
        value.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use crate::world::meshing::direction::Direction;

    #[test]
    fn test_normals_are_unit_axes() {
        for dir in Direction::iter() {
            let v = dir.to_vec();
            assert_eq!(v.x.abs() + v.y.abs() + v.z.abs(), 1);
            assert_eq!(dir.normal(), v.map(|c| c as f32));
        }
    }

    #[test]
    fn test_only_horizontal_directions_cross_chunks() {
        for dir in Direction::iter() {
            assert_eq!(dir.chunk_offset().is_some(), Direction::HORIZONTAL.contains(&dir));
        }
    }
}
