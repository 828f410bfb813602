use cgmath::Vector3;
use itertools::iproduct;
use noise::{NoiseFn, Perlin};

use crate::TerrainConfig;
use crate::world::block::Block;
use crate::world::chunk_data::ChunkData;
use crate::world::location::{ChunkLocation, LocalChunkLocation};
use crate::world::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

/// Number of dirt blocks between the grass surface and the stone below it
const DIRT_DEPTH: i32 = 5;

/// Terrain surface height above the ground level, for every world column
pub trait HeightMap {
    fn height_at(&self, world_x: i32, world_z: i32) -> f64;
}

pub struct PerlinHeightMap {
    perlin: Perlin,
    sample_scale: f64,
    max_height: f64,
}

impl PerlinHeightMap {
    pub fn new(seed: u32, config: &TerrainConfig) -> Self {
        Self {
            perlin: Perlin::new(seed),
            sample_scale: config.sample_scale(),
            max_height: config.max_height,
        }
    }
}

impl HeightMap for PerlinHeightMap {
    fn height_at(&self, world_x: i32, world_z: i32) -> f64 {
        let noise = self
            .perlin
            .get([world_x as f64 * self.sample_scale, world_z as f64 * self.sample_scale]);

        // [-1, 1] -> [0, max_height]
        ((noise + 1.0) / 2.0 * self.max_height).clamp(0.0, self.max_height)
    }
}

/// The same height everywhere
#[derive(Copy, Clone, Debug)]
pub struct FlatHeightMap(pub f64);

impl HeightMap for FlatHeightMap {
    fn height_at(&self, _world_x: i32, _world_z: i32) -> f64 {
        self.0
    }
}

pub struct WorldGenerator<H = PerlinHeightMap> {
    height_map: H,
    ground_level: f64,
}

impl WorldGenerator {
    pub fn new(seed: u32, config: &TerrainConfig) -> Self {
        Self::with_height_map(PerlinHeightMap::new(seed, config), config.ground_level)
    }
}

impl<H: HeightMap> WorldGenerator<H> {
    pub fn with_height_map(height_map: H, ground_level: f64) -> Self {
        Self { height_map, ground_level }
    }

    /// World y of the grass block in the given column
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        (self.ground_level + self.height_map.height_at(world_x, world_z)).floor() as i32
    }

    pub fn get_chunk_data_at(&self, chunk_location: ChunkLocation) -> ChunkData {
        let mut data = ChunkData::default();

        for (x, z) in iproduct!(0..CHUNK_SIZE_X as i32, 0..CHUNK_SIZE_Z as i32) {
            let surface = self.surface_height(
                chunk_location.x * CHUNK_SIZE_X as i32 + x,
                chunk_location.z * CHUNK_SIZE_Z as i32 + z,
            );

            // Everything above the surface stays air
            for y in 0..=surface.min(CHUNK_SIZE_Y as i32 - 1) {
                let (Some(pos), Some(block)) = (
                    LocalChunkLocation::new(Vector3::new(x, y, z)).try_into_checked(),
                    block_in_column(y, surface),
                ) else {
                    continue;
                };
                data.set_block(pos, block);
            }
        }

        data
    }
}

/// The block at height `y` of a column whose grass surface is at `surface`. Air is `None`.
pub fn block_in_column(y: i32, surface: i32) -> Option<Block> {
    if y < surface - DIRT_DEPTH {
        Some(Block::STONE)
    } else if y < surface {
        Some(Block::DIRT)
    } else if y == surface {
        Some(Block::GRASS)
    } else {
        None
    }
}
