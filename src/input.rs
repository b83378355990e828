/// Input delivered to a mounted view, in surface pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    /// Negative is wheel up (zoom in)
    Wheel { delta_y: f64 },
    Command(Command),
}

/// Keyboard shortcuts understood by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    ToggleDebug,
    ToggleWireframe,
    ResetView,
}
