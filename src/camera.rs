use glam::{DMat4, DVec3, DVec4};

/// Perspective camera with a vertical field of view in degrees
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: DVec3,
    /// Unit view direction; the camera starts out looking down -Z
    direction: DVec3,
}

/// A point after projection onto the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub screen: [f64; 2],
    /// Normalized device depth in `[-1, 1]`
    pub depth: f64,
}

impl PerspectiveCamera {
    pub fn new(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        PerspectiveCamera {
            fov,
            aspect,
            near,
            far,
            position: DVec3::ZERO,
            direction: DVec3::NEG_Z,
        }
    }

    /// Aspect ratio for a surface of the given size; a zero height counts as one
    pub fn aspect_for(width: usize, height: usize) -> f64 {
        width as f64 / height.max(1) as f64
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.aspect = Self::aspect_for(width, height);
    }

    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    pub fn look_at(&mut self, target: DVec3) {
        let direction = target - self.position;
        if direction.length_squared() > f64::EPSILON {
            self.direction = direction.normalize();
        }
    }

    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_to_rh(self.position, self.direction, DVec3::Y)
    }

    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Projects a world-space point onto a `width` × `height` surface.
    ///
    /// Returns `None` for points in front of the near plane, which the
    /// rasterizer cannot interpolate across.
    pub fn project(
        view_projection: &DMat4,
        near: f64,
        point: DVec3,
        width: usize,
        height: usize,
    ) -> Option<Projected> {
        let clip: DVec4 = *view_projection * point.extend(1.0);
        if clip.w < near {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Projected {
            screen: [
                (ndc.x + 1.0) / 2.0 * width as f64,
                (1.0 - ndc.y) / 2.0 * height as f64,
            ],
            depth: ndc.z,
        })
    }
}
