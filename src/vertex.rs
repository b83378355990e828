use glam::DVec3;

/// Vertex structure with clip-space depth, screen position, and world normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// World-space position, used for lighting
    pub position: DVec3,
    /// Normalized device depth in `[-1, 1]`, smaller is nearer
    pub depth: f64,
    pub screen_position: [f64; 2],
    pub normal: DVec3,
}
