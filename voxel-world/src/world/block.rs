use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::world::meshing::direction::Direction;

/// A single voxel: its material and the terrain texture used for each face group.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Block {
    pub ty: BlockType,
    pub top_texture: u8,
    pub side_texture: u8,
    pub bottom_texture: u8,
}

impl Block {
    pub const AIR: Block = Block::new(BlockType::Air, 0, 0, 0);
    pub const GRASS: Block = Block::new(
        BlockType::Grass,
        TerrainTexture::GrassTop.layer(),
        TerrainTexture::GrassSide.layer(),
        TerrainTexture::Dirt.layer(),
    );
    pub const DIRT: Block = Block::uniform(BlockType::Dirt, TerrainTexture::Dirt);
    pub const STONE: Block = Block::uniform(BlockType::Stone, TerrainTexture::Stone);
    pub const OAK_LOG: Block = Block::new(
        BlockType::OakLog,
        TerrainTexture::OakLogTop.layer(),
        TerrainTexture::OakLog.layer(),
        TerrainTexture::OakLogTop.layer(),
    );

    pub const fn new(ty: BlockType, top_texture: u8, side_texture: u8, bottom_texture: u8) -> Self {
        Self {
            ty,
            top_texture,
            side_texture,
            bottom_texture,
        }
    }

    const fn uniform(ty: BlockType, texture: TerrainTexture) -> Self {
        Self::new(ty, texture.layer(), texture.layer(), texture.layer())
    }

    pub fn is_air(&self) -> bool {
        self.ty == BlockType::Air
    }

    /// Texture used when rendering the face pointing into `direction`
    pub fn texture_for(&self, direction: Direction) -> u8 {
        match direction {
            Direction::YPos => self.top_texture,
            Direction::YNeg => self.bottom_texture,
            Direction::XPos | Direction::XNeg | Direction::ZPos | Direction::ZNeg => self.side_texture,
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, EnumIter)]
pub enum BlockType {
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    OakLog = 4,
}

/// Layers of the global terrain texture array. Layer 0 is unused, so the first texture starts at 1.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, EnumIter)]
pub enum TerrainTexture {
    Stone = 1,
    Dirt = 2,
    GrassSide = 3,
    GrassTop = 4,
    OakLog = 5,
    OakLogTop = 6,
}

pub const TERRAIN_TEXTURE_COUNT: usize = 6;

impl TerrainTexture {
    /// All textures in layer order
    pub fn all() -> impl Iterator<Item = TerrainTexture> {
        TerrainTexture::iter()
    }

    pub const fn layer(self) -> u8 {
        self as u8
    }

    pub fn file_name(self) -> &'static str {
        match self {
            TerrainTexture::Stone => "stone.png",
            TerrainTexture::Dirt => "dirt.png",
            TerrainTexture::GrassSide => "grass_block_side.png",
            TerrainTexture::GrassTop => "grass_block_top.png",
            TerrainTexture::OakLog => "oak_log.png",
            TerrainTexture::OakLogTop => "oak_log_top.png",
        }
    }
}
