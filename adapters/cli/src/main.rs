#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Snail Run experience.

mod autopilot;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snail_run_core::WorldTuning;
use snail_run_rendering::{Color, Presentation, RenderingBackend, Scene};
use snail_run_rendering_macroquad::MacroquadBackend;
use snail_run_system_bootstrap::Bootstrap;
use snail_run_system_chunk_generation::{ChunkGenerator, Config as GeneratorConfig};
use snail_run_system_frame_driver::{
    Clock, Config as DriverConfig, FrameDriver, ManualClock, NullSink, TracingObserver,
};
use snail_run_world::{query, World};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use self::autopilot::Autopilot;

const WINDOW_TITLE: &str = "Snail Run";
const SKY: Color = Color::from_rgb_u8(0x9e, 0xd2, 0xff);

/// Command-line arguments accepted by the Snail Run binary.
#[derive(Debug, Parser)]
#[command(name = "snail-run", about = "Endless side-scrolling platformer")]
struct CliArgs {
    /// Seed for terrain generation. A fresh seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding any subset of the default tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_enum, conflicts_with = "swap_interval")]
    vsync: Option<VsyncMode>,
    /// Explicit swap interval requested from the platform.
    #[arg(long, value_name = "FRAMES")]
    swap_interval: Option<i32>,
    /// Simulate without opening a window.
    #[arg(long)]
    headless: bool,
    /// Number of frames simulated by a headless run.
    #[arg(long, default_value_t = 600, requires = "headless")]
    frames: u32,
    /// Fixed frame length in milliseconds used by a headless run.
    #[arg(long, default_value_t = 16.0, requires = "headless")]
    frame_ms: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VsyncMode {
    On,
    Off,
}

/// Entry point for the Snail Run command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("snail_run=info".parse()?))
        .init();

    let args = CliArgs::parse();
    let tuning = load_tuning(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "starting run");

    let (mut driver, mut world) = boot(tuning, seed)?;
    driver.observe(TracingObserver);
    println!("{}", Bootstrap::default().welcome_banner(&world));

    if args.headless {
        let frame = frame_length(args.frame_ms)?;
        run_headless(&mut driver, &mut world, args.frames, frame);
        let player = query::player(&world);
        println!(
            "frames={} score={} lives={} camera_x={:.1} chunks={}",
            args.frames,
            player.score,
            player.lives,
            query::camera_x(&world),
            query::chunk_count(&world),
        );
        return Ok(());
    }

    let backend = configure_backend(args.vsync, args.swap_interval, args.show_fps);
    let scene = Scene::for_world(&world).context("invalid viewport")?;
    let presentation = Presentation::new(WINDOW_TITLE, SKY, scene);
    backend.run(presentation, move |input, scene| {
        let mut actions = input.actions;
        let _ = driver.frame(&mut world, input.now, &mut actions, scene);
    })
}

fn load_tuning(path: Option<&Path>) -> Result<WorldTuning> {
    let tuning = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read tuning file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse tuning file {}", path.display()))?
        }
        None => WorldTuning::default(),
    };
    tuning.validate().context("invalid tuning")?;
    Ok(tuning)
}

fn boot(tuning: WorldTuning, seed: u64) -> Result<(FrameDriver, World)> {
    let generator = ChunkGenerator::new(GeneratorConfig::new(
        seed,
        tuning.generation.clone(),
        tuning.ground_y,
    ))
    .context("invalid generation tuning")?;
    let bootstrap = Bootstrap::from_tuning(&tuning);
    let mut driver = FrameDriver::new(DriverConfig::from_tuning(&tuning), generator);
    let mut world = World::with_tuning(tuning);
    let _ = driver.start(&mut world, &bootstrap);
    Ok((driver, world))
}

fn frame_length(frame_ms: f32) -> Result<Duration> {
    Duration::try_from_secs_f32(frame_ms / 1_000.0)
        .with_context(|| format!("invalid frame length {frame_ms}ms"))
}

fn run_headless(driver: &mut FrameDriver, world: &mut World, frames: u32, frame: Duration) {
    let autopilot = Autopilot;
    let mut clock = ManualClock::default();
    for _ in 0..frames {
        clock.advance(frame);
        let mut actions = autopilot.actions(world);
        let _ = driver.frame(world, clock.now(), &mut actions, &mut NullSink);
    }
}

fn configure_backend(
    vsync: Option<VsyncMode>,
    swap_interval: Option<i32>,
    show_fps: bool,
) -> MacroquadBackend {
    let backend = MacroquadBackend::new().with_show_fps(show_fps);
    match vsync {
        Some(mode) => backend.with_vsync(mode == VsyncMode::On),
        None => backend.with_swap_interval(swap_interval),
    }
}
