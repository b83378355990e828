//! Orbit controls: pointer drag rotates the camera around a target point,
//! the wheel moves it closer or further away.
//!
//! Drag state belongs to each controls instance, so several views can
//! coexist without sharing input.

use crate::camera::PerspectiveCamera;
use glam::DVec3;
use std::f64::consts::PI;

const EPS: f64 = 1e-6;

/// Position around a target as radius, polar angle from +Y, and azimuth around Y
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Spherical {
    radius: f64,
    phi: f64,
    theta: f64,
}

impl Spherical {
    fn from_offset(offset: DVec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Spherical::default();
        }
        Spherical {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> DVec3 {
        let sin_phi = self.phi.sin();
        DVec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Initial configuration of the orbit controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsSettings {
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub enable_zoom: bool,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: DVec3,
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub enable_zoom: bool,
    pub enable_rotate: bool,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub min_polar_angle: f64,
    pub max_polar_angle: f64,

    /// Rotation still to be applied, eased out over frames when damping
    spherical_delta: Spherical,
    scale: f64,
    /// Last pointer position while a drag is in progress
    drag: Option<[f64; 2]>,
    /// Camera position and target to restore on reset
    saved: (DVec3, DVec3),
}

impl OrbitControls {
    pub fn new(camera: &PerspectiveCamera, settings: ControlsSettings) -> Self {
        OrbitControls {
            target: DVec3::ZERO,
            enable_damping: settings.enable_damping,
            damping_factor: settings.damping_factor,
            enable_zoom: settings.enable_zoom,
            enable_rotate: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            drag: None,
            saved: (camera.position, DVec3::ZERO),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if self.enable_rotate {
            self.drag = Some([x, y]);
        }
    }

    /// Feeds a pointer move; `client_height` scales a full-height drag to one turn
    pub fn pointer_move(&mut self, x: f64, y: f64, client_height: usize) {
        let Some([last_x, last_y]) = self.drag else {
            return;
        };
        let height = client_height.max(1) as f64;
        self.rotate_left(2.0 * PI * (x - last_x) / height * self.rotate_speed);
        self.rotate_up(2.0 * PI * (y - last_y) / height * self.rotate_speed);
        self.drag = Some([x, y]);
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Negative deltas (wheel up) move the camera closer
    pub fn wheel(&mut self, delta_y: f64) {
        if !self.enable_zoom || delta_y == 0.0 {
            return;
        }
        let zoom_scale = 0.95_f64.powf(self.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= zoom_scale;
        } else {
            self.scale /= zoom_scale;
        }
    }

    fn rotate_left(&mut self, angle: f64) {
        self.spherical_delta.theta -= angle;
    }

    fn rotate_up(&mut self, angle: f64) {
        self.spherical_delta.phi -= angle;
    }

    /// Applies pending rotation and zoom to the camera.
    ///
    /// With damping enabled only a fraction of the pending rotation lands each
    /// call, so the camera eases toward the last drag target over several
    /// frames. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let previous = camera.position;
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        if self.enable_damping {
            spherical.theta += self.spherical_delta.theta * self.damping_factor;
            spherical.phi += self.spherical_delta.phi * self.damping_factor;
        } else {
            spherical.theta += self.spherical_delta.theta;
            spherical.phi += self.spherical_delta.phi;
        }

        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            self.spherical_delta.theta *= 1.0 - self.damping_factor;
            self.spherical_delta.phi *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Spherical::default();
        }
        self.scale = 1.0;

        previous.distance_squared(camera.position) > EPS
    }

    /// Puts the camera back where it was when the controls were created
    pub fn reset(&mut self, camera: &mut PerspectiveCamera) {
        let (position, target) = self.saved;
        self.target = target;
        camera.position = position;
        camera.look_at(target);
        self.spherical_delta = Spherical::default();
        self.scale = 1.0;
        self.drag = None;
    }
}
