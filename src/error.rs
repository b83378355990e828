use std::io;

/// Errors raised while mounting, drawing into, or tearing down a scene view
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("container already holds a drawing surface")]
    SurfaceAttached,
    #[error("container has no drawing surface to remove")]
    NoSurface,
}

pub type Result<T> = std::result::Result<T, ViewError>;
