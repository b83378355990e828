//! boba3d - a console-based 3D scene viewer
//!
//! A [`SceneView`](view::SceneView) mounts one of the [`ScenePreset`](preset::ScenePreset)s
//! into a [`Container`](container::Container), redraws it from a
//! [`DisplayScheduler`](scheduler::DisplayScheduler) until torn down, and
//! detaches its drawing surface on unmount.

pub mod camera;
pub mod cli;
pub mod config;
pub mod container;
pub mod controls;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod input;
pub mod math;
pub mod preset;
pub mod renderer;
pub mod scene;
pub mod scheduler;
pub mod state;
pub mod surface;
pub mod terminal;
pub mod vertex;
pub mod view;

pub use error::{Result, ViewError};
pub use preset::ScenePreset;
pub use view::{run, CancelToken, FrameStatus, SceneView};
