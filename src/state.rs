/// View toggles driven by keyboard commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Enable debug overlay
    pub debug: bool,
    /// Animation paused; controls and redraws keep running
    pub paused: bool,
    /// Wireframe mode enabled
    pub wireframe: bool,
    /// Per-pixel point-light shading instead of flat color
    pub shading: bool,
}
