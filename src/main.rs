use anyhow::{Context, Result};
use boba3d::cli::Cli;
use boba3d::config::AppConfig;
use boba3d::container::MemoryContainer;
use boba3d::scheduler::ManualScheduler;
use boba3d::state::ViewState;
use boba3d::terminal::{wall_clock_ms, TerminalContainer, TerminalScheduler};
use boba3d::{run, SceneView};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

/// Headless runs draw this many frames unless `--frames` says otherwise
const HEADLESS_FRAMES: u64 = 60;

fn main() -> Result<()> {
    // Logs go to stderr; redirect it (`2>boba3d.log`) to keep the picture clean
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }),
    };
    cli.apply(&mut config);

    let mut rng = match config.view.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let state = config.render.view_state();

    if cli.headless {
        return headless(&config, cli.frames.unwrap_or(HEADLESS_FRAMES), state, &mut rng);
    }

    let mut container = TerminalContainer::new();
    let mut view = SceneView::mount(&mut container, config.view.preset, state, &mut rng)
        .context("failed to mount scene view")?;
    let mut scheduler = TerminalScheduler::new(config.view.frame_rate, cli.frames);
    let frames = run(&mut view, &mut container, &mut scheduler).context("render loop failed")?;
    log::info!("drew {} frames", frames);

    Ok(())
}

/// Renders into memory with simulated frame timestamps and prints what was drawn
fn headless(config: &AppConfig, frames: u64, state: ViewState, rng: &mut StdRng) -> Result<()> {
    let [width, height] = config.view.headless_size;
    let mut container = MemoryContainer::new(width, height);
    let mut view = SceneView::mount(&mut container, config.view.preset, state, rng)
        .context("failed to mount scene view")?;

    let step_ms = 1000.0 / config.view.frame_rate.max(1) as f64;
    let mut scheduler = ManualScheduler::new(wall_clock_ms(), step_ms);
    scheduler.frames(frames);
    let drawn = run(&mut view, &mut container, &mut scheduler).context("render loop failed")?;

    let colors: HashSet<u32> = container.last_frame().iter().map(|c| c.to_hex()).collect();
    let camera = view.camera().position;
    println!("preset:     {}", view.preset());
    println!("surface:    {}x{}", width, height);
    println!("frames:     {}", drawn);
    println!("primitives: {}", view.scene().len());
    println!(
        "camera:     ({:.2}, {:.2}, {:.2})",
        camera.x, camera.y, camera.z
    );
    println!("colors:     {}", colors.len());

    Ok(())
}
