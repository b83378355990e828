//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `boba3d.toml` in the working directory, or the file passed with `--config`
//! 3. Environment variables (`BOBA3D_SECTION__KEY`)
//! 4. Command-line flags, applied by the binary

use crate::preset::ScenePreset;
use crate::state::ViewState;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "boba3d.toml";
pub const ENV_PREFIX: &str = "BOBA3D_";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub view: ViewConfig,
    pub render: RenderConfig,
}

/// Which scene to mount and how often to redraw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub preset: ScenePreset,
    /// Target frames per second of the render loop
    pub frame_rate: u32,
    /// Seed for pearl placement; random when unset
    pub seed: Option<u64>,
    /// Client size used when rendering without a terminal
    pub headless_size: [usize; 2],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            preset: ScenePreset::Cup,
            frame_rate: 60,
            seed: None,
            headless_size: [80, 48],
        }
    }
}

/// Initial renderer toggles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub shading: bool,
    pub wireframe: bool,
    pub debug: bool,
}

impl RenderConfig {
    pub fn view_state(&self) -> ViewState {
        ViewState {
            debug: self.debug,
            paused: false,
            wireframe: self.wireframe,
            shading: self.shading,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("configuration error: {0}")]
    Invalid(#[from] figment::Error),
}

impl AppConfig {
    /// Load configuration from the working directory and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Path::new(DEFAULT_CONFIG_FILE))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::figment(path).extract().map_err(ConfigError::from)
    }

    fn figment(path: &Path) -> Figment {
        // A missing file contributes nothing; defaults come from serde
        Figment::new()
            .merge(Toml::file(path))
            // BOBA3D_VIEW__PRESET=cube -> view.preset = "cube"
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
