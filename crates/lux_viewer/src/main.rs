//! Lux viewer: renders the demo scene progressively, presenting snapshots at
//! the configured frame rate, or in one batch.

mod present;
mod scene;

use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use lux_math::Vec3;
use lux_renderer::{render_parallel, FrameScheduler, RenderConfig, World};

use crate::present::{numbered_path, save_frame, save_png, Presenter};

#[derive(Debug, Parser)]
#[command(author, version, about = "Interruptible CPU path tracer", long_about = None)]
struct Args {
    /// JSON render config; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Equirectangular RGB skybox image
    #[arg(long)]
    skybox: Option<PathBuf>,

    /// OBJ mesh placed in the middle of the scene
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Final image
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Overrides the configured width
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Overrides the configured height
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Overrides the configured worker count
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u64).range(1..))]
    workers: Option<u64>,

    /// Camera moves around the origin before the final frame. Each one
    /// restarts rendering and the interrupted frame is saved as a numbered PNG
    #[arg(long, default_value_t = 0)]
    orbits: usize,

    /// Orbit angle per move, in radians
    #[arg(long, default_value_t = 0.05)]
    orbit_step: f32,

    /// Move the camera after this many presentations instead of waiting for
    /// the frame to finish
    #[arg(long)]
    restart_after: Option<usize>,

    /// Overwrite this PNG with every presented snapshot
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Render in one pass on the rayon pool and exit
    #[arg(long)]
    batch: bool,
}

fn load_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(workers) = args.workers {
        config.worker_count = workers as usize;
    }
    config.validate()?;
    Ok(config)
}

fn run_progressive(world: World, args: &Args) -> Result<()> {
    let frame_time = world.config.frame_interval();
    let mut scheduler = FrameScheduler::new(world);
    let mut presenter = Presenter::new(args.snapshot.clone());

    for orbit in 0..=args.orbits {
        if orbit > 0 {
            let world = scheduler
                .world_mut()
                .context("scene is still shared with render workers")?;
            world.camera.orbit_y(args.orbit_step, Vec3::ZERO);
            log::info!("Camera moved ({}/{}), restarting frame", orbit, args.orbits);
        }

        scheduler
            .start_frame()
            .context("failed to spawn render workers")?;

        let last = orbit == args.orbits;
        let mut presentations = 0;
        while scheduler.needs_presentation() {
            thread::sleep(frame_time);

            let fb = scheduler.acquire_framebuffer_for_presentation();
            let presented = presenter.present(fb);
            scheduler.resume_after_presentation();
            presented?;

            presentations += 1;
            log::debug!("Presented at {:.1}%", scheduler.progress_percent());

            if !last && args.restart_after.is_some_and(|n| presentations >= n) {
                break;
            }
        }

        if !last {
            save_frame(&mut scheduler, &numbered_path(&args.output, orbit))?;
        }
    }

    log::info!("{} snapshots presented", presenter.presented());
    save_frame(&mut scheduler, &args.output)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    log::info!(
        "Rendering {}x{}, {} samples/pixel, {} bounces, {} workers",
        config.width,
        config.height,
        config.samples_per_pixel_axis * config.samples_per_pixel_axis,
        config.max_bounces,
        config.worker_count
    );

    let world = scene::demo_world(config, args.skybox.as_deref(), args.mesh.as_deref())?;

    if args.batch {
        let fb = render_parallel(&world);
        return save_png(&fb, &args.output);
    }

    run_progressive(world, &args)
}
