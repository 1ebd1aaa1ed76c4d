mod app;
mod worldgen;

use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};
use scree_sim::SimConfig;

use crate::worldgen::TerrainParams;

#[derive(Parser, Debug)]
#[command(name = "scree", about = "Voxel sandbox with falling blocks")]
struct Args {
    /// Terrain seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Half-width of the ground slab, in cells
    #[arg(long, default_value_t = 50)]
    half_width: i32,
    /// Generate only the flat slab, no hills
    #[arg(long)]
    flat: bool,
    /// Physics and streaming tunables
    #[arg(long, default_value = "scree.toml")]
    config: PathBuf,
    /// Window width in pixels
    #[arg(long, default_value_t = 800)]
    width: i32,
    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    height: i32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    // an absent tunables file means stock behavior
    let cfg = if args.config.exists() {
        match SimConfig::from_path(&args.config) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("failed to load {}: {}", args.config.display(), e);
                SimConfig::default()
            }
        }
    } else {
        SimConfig::default()
    };
    let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
    fastrand::seed(seed);
    info!("seed {}", seed);

    let (mut rl, thread) = raylib::init()
        .size(args.width, args.height)
        .title("scree")
        .build();
    rl.set_target_fps(60);

    let terrain = TerrainParams {
        half_width: args.half_width,
        flat: args.flat,
    };
    let mut app = app::App::new(&mut rl, &thread, cfg, &terrain);

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        app.step(&mut rl, &thread, dt);
        app.render(&mut rl, &thread);
    }
}
