use std::marker::PhantomData;
use std::ops::{Add, Deref, Sub};

use cgmath::Vector3;
use itertools::iproduct;

use crate::vector_utils::{DivEuclid, MapElemWise, RemEuclid};
use crate::world::meshing::direction::Direction;
use crate::world::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, chunk_dimensions};

/// An absolute block location in the world.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WorldLocation(pub Vector3<i32>);

impl WorldLocation {
    pub fn new(chunk_location: ChunkLocation, local_location: LocalChunkLocation) -> Self {
        let origin = Vector3::new(
            chunk_location.x * CHUNK_SIZE_X as i32,
            0,
            chunk_location.z * CHUNK_SIZE_Z as i32,
        );
        Self(origin + local_location.location)
    }

    /// Splits this location into the chunk containing it and the position inside of that chunk.
    /// Returns `None` if the location lies below or above the world, as chunks are never stacked vertically.
    pub fn separate(self) -> Option<(ChunkLocation, LocalChunkLocation<WithinBounds>)> {
        let chunk = self.0.div_euclid(chunk_dimensions());
        if chunk.y != 0 {
            return None;
        }

        let local = LocalChunkLocation::new_unchecked(self.0.rem_euclid(chunk_dimensions()));
        Some((ChunkLocation::new(chunk.x, chunk.z), local))
    }
}

/// The location of a specific chunk in the world.
/// Chunks span the full world height, so only the horizontal axes are stored.
/// Each ChunkLocation unit will be equal to one chunk width when rendering.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ChunkLocation {
    pub x: i32,
    pub z: i32,
}

impl ChunkLocation {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn from_world_location_f32(location: Vector3<f32>) -> Self {
        Self::new(
            (location.x / CHUNK_SIZE_X as f32).floor() as i32,
            (location.z / CHUNK_SIZE_Z as f32).floor() as i32,
        )
    }

    /// World space position of this chunk's origin corner
    pub fn to_world_location_f32(self) -> Vector3<f32> {
        Vector3::new((self.x * CHUNK_SIZE_X as i32) as f32, 0.0, (self.z * CHUNK_SIZE_Z as i32) as f32)
    }

    /// Euclidean distance in chunk units
    pub fn distance_to(self, other: ChunkLocation) -> f32 {
        let d = self - other;
        ((d.x * d.x + d.z * d.z) as f32).sqrt()
    }

    /// The larger one of both per-axis distances
    pub fn axis_distance_to(self, other: ChunkLocation) -> i32 {
        let d = self - other;
        d.x.abs().max(d.z.abs())
    }
}

impl Add for ChunkLocation {
    type Output = ChunkLocation;

    fn add(self, rhs: Self) -> Self::Output {
        ChunkLocation::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for ChunkLocation {
    type Output = ChunkLocation;

    fn sub(self, rhs: Self) -> Self::Output {
        ChunkLocation::new(self.x - rhs.x, self.z - rhs.z)
    }
}

/// A local location inside of a specific chunk.
/// The generic type `State` signals whether it is confirmed that the location is within the chunk boundaries.
/// It can be either one of [WithinBounds] or [OutsideBounds].
/// When creating a new object, the State=OutsideBounds is assumed. To get a State=WithinBounds the method [LocalChunkLocation::try_into_checked] can be called.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LocalChunkLocation<State = OutsideBounds> {
    location: Vector3<i32>,
    phantom: PhantomData<State>,
}

/// Marker type for [LocalChunkLocation]
/// It known for the local location to be within the chunk boundaries.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WithinBounds;

/// Marker type for [LocalChunkLocation]
/// It is unknown whether the local location is within the chunk boundaries.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct OutsideBounds;

impl LocalChunkLocation {
    pub fn iter() -> impl Iterator<Item = LocalChunkLocation<WithinBounds>> {
        iproduct!(0..(CHUNK_SIZE_X as i32), 0..(CHUNK_SIZE_Y as i32), 0..(CHUNK_SIZE_Z as i32))
            .map(|coords| LocalChunkLocation::new_unchecked(coords.into()))
    }
}

impl LocalChunkLocation<OutsideBounds> {
    pub fn new(location: Vector3<i32>) -> Self {
        Self {
            location,
            phantom: PhantomData,
        }
    }

    pub fn try_into_checked(self) -> Option<LocalChunkLocation<WithinBounds>> {
        Self::validate_boundaries(self.location).then(|| LocalChunkLocation::new_unchecked(self.location))
    }

    /// Moves a location that lies just outside of the chunk to the opposite edge,
    /// which is where the same block lies inside of the horizontally adjacent chunk.
    pub fn wrap_horizontally(self) -> Self {
        let dims = chunk_dimensions();
        Self::new(Vector3::new(
            self.location.x.rem_euclid(dims.x),
            self.location.y,
            self.location.z.rem_euclid(dims.z),
        ))
    }

    fn validate_boundaries(location: Vector3<i32>) -> bool {
        (0..CHUNK_SIZE_X as i32).contains(&location.x)
            && (0..CHUNK_SIZE_Y as i32).contains(&location.y)
            && (0..CHUNK_SIZE_Z as i32).contains(&location.z)
    }
}

impl<T> LocalChunkLocation<T> {
    pub fn to_f32(self) -> Vector3<f32> {
        self.location.map_elem_wise(|v| v as f32)
    }
}

impl<T, A: Into<Vector3<i32>>> Add<A> for LocalChunkLocation<T> {
    type Output = LocalChunkLocation<OutsideBounds>;

    fn add(self, rhs: A) -> Self::Output {
        LocalChunkLocation::new(self.location + rhs.into())
    }
}

impl LocalChunkLocation<WithinBounds> {
    pub(crate) fn new_unchecked(location: Vector3<i32>) -> Self {
        LocalChunkLocation {
            location,
            phantom: PhantomData,
        }
    }

    /// Whether the block at this location touches the chunk edge in the given horizontal direction
    pub fn is_on_edge(self, direction: Direction) -> bool {
        (self + direction).try_into_checked().is_none()
    }
}

impl<T> Deref for LocalChunkLocation<T> {
    type Target = Vector3<i32>;

    fn deref(&self) -> &Self::Target {
        &self.location
    }
}
