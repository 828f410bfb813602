use anyhow::Result;
use cgmath::{Deg, InnerSpace, Rad, Vector3};
use clap::Parser;
use log::{LevelFilter, debug, info};
use voxel_world::WorldConfig;
use voxel_world::rendering::camera::{Camera, Projection};
use voxel_world::rendering::frustum::Frustum;
use voxel_world::rendering::gpu::WgpuMeshBackend;
use voxel_world::rendering::{HeadlessMeshBackend, MeshBackend};
use voxel_world::world::block::TerrainTexture;
use voxel_world::world::chunk_manager::ChunkManager;
use voxel_world::world::chunk_renderer::prepare_visible_chunks;

/// Flies a camera through the world and streams chunks around it, without opening a window
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Radius of loaded chunks around the camera
    #[arg(short, long, default_value_t = 10)]
    view_distance: i32,

    #[arg(short, long, default_value_t = 5)]
    chunks_per_frame: usize,

    #[arg(short, long, default_value_t = 0)]
    seed: u32,

    /// Number of simulated frames
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,

    /// Blocks the camera moves per frame
    #[arg(long, default_value_t = 0.5)]
    speed: f32,

    /// Upload meshes to a real GPU instead of only counting them
    #[arg(long)]
    gpu: bool,

    /// Randomly turn while flying
    #[arg(long)]
    wander: bool,
}

/// Height the camera keeps above the terrain surface
const HOVER_HEIGHT: f32 = 20.0;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("wgpu_hal", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();

    if args.gpu {
        let mut backend = WgpuMeshBackend::new_headless_blocking()?;
        run(&args, &mut backend)?;
        info!("{} GPU buffers left", backend.num_buffers());
    } else {
        let mut backend = HeadlessMeshBackend::new();
        run(&args, &mut backend)?;
        info!("{:?}, {} buffers left", backend.stats, backend.live_buffers());
    }

    Ok(())
}

fn run(args: &Args, backend: &mut impl MeshBackend) -> Result<()> {
    let config = WorldConfig {
        seed: args.seed,
        view_distance: args.view_distance,
        chunks_per_frame: args.chunks_per_frame,
        ..Default::default()
    };
    info!("Starting with {config:?}");

    for texture in TerrainTexture::all() {
        debug!("Texture layer {}: {}", texture.layer(), texture.file_name());
    }

    let mut chunk_manager = ChunkManager::new(&config);
    let mut camera = Camera::new(
        (0.0, 45.0, 0.0),
        Deg(0.0),
        Deg(-20.0),
        Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0),
    );
    let mut rng = fastrand::Rng::with_seed(u64::from(args.seed));

    for tick in 0..args.ticks {
        if args.wander {
            camera.yaw += Rad((rng.f64() - 0.5) * 0.1);
        }
        let forward = camera.forward();
        camera.position += Vector3::new(forward.x, 0.0, forward.z).normalize() * args.speed;

        let surface = chunk_manager
            .generator()
            .surface_height(camera.position.x.floor() as i32, camera.position.z.floor() as i32);
        camera.position.y = surface as f32 + HOVER_HEIGHT;

        let update = chunk_manager.update_world(
            camera.world_position(),
            config.view_distance,
            config.chunks_per_frame,
            backend,
        );

        let frustum = Frustum::from_view_projection(&camera.view_projection());
        let plan = prepare_visible_chunks(&mut chunk_manager, &frustum, backend)?;

        if tick % 60 == 0 {
            info!(
                "Tick {tick}: {} chunks loaded, {} queued, {} drawn, {} culled, {:?}",
                chunk_manager.num_chunks(),
                chunk_manager.queue_len(),
                plan.draw_calls.len(),
                plan.stats.culled,
                update
            );
            for (name, duration) in chunk_manager.timer().get_all() {
                debug!("{name}: {duration:?}");
            }
        }
    }

    chunk_manager.clear_chunks(backend);

    Ok(())
}
