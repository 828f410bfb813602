pub mod rendering;
pub mod timing;
pub mod vector_utils;
pub mod world;

#[derive(Clone, Debug)]
pub struct WorldConfig {
    pub seed: u32,
    /// Radius in chunks of the square that is kept loaded around the viewer
    pub view_distance: i32,
    /// Maximum number of chunks generated per update
    pub chunks_per_frame: usize,
    pub terrain: TerrainConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            view_distance: 10,
            chunks_per_frame: 5,
            terrain: TerrainConfig::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TerrainConfig {
    pub ground_level: f64,
    pub max_height: f64,
    pub noise_frequency: f64,
    /// Applied to the world coordinates on top of the frequency
    pub noise_scale: f64,
}

impl TerrainConfig {
    /// Factor from world block coordinates to noise space
    pub fn sample_scale(&self) -> f64 {
        self.noise_frequency * self.noise_scale
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            ground_level: 0.0,
            max_height: 50.0,
            noise_frequency: 0.1,
            noise_scale: 0.1,
        }
    }
}
