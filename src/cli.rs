// cli.rs - Command-line interface configuration
use crate::config::AppConfig;
use crate::preset::ScenePreset;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "boba3d", version)]
#[command(about = "Console-based 3D scene viewer", long_about = None)]
pub struct Cli {
    /// Scene to show
    #[arg(long, value_enum)]
    pub preset: Option<ScenePreset>,

    /// Configuration file (defaults to ./boba3d.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Seed for pearl placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Render into memory instead of the terminal and print a summary
    #[arg(long)]
    pub headless: bool,

    /// Shade primitives with a point light instead of flat color
    #[arg(long)]
    pub shaded: bool,

    /// Start in wireframe mode
    #[arg(long)]
    pub wireframe: bool,

    /// Start with the debug overlay shown
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Overrides configuration values with the flags that were given
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(preset) = self.preset {
            config.view.preset = preset;
        }
        if let Some(fps) = self.fps {
            config.view.frame_rate = fps;
        }
        if self.seed.is_some() {
            config.view.seed = self.seed;
        }
        config.render.shading |= self.shaded;
        config.render.wireframe |= self.wireframe;
        config.render.debug |= self.debug;
    }
}
