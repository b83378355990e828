use crate::camera::PerspectiveCamera;
use crate::controls::{ControlsSettings, OrbitControls};
use crate::geometry::{Geometry, Shape};
use crate::scene::{Material, Node, NodeId, NodeKind, Scene};
use crate::surface::Color;
use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

pub const CAMERA_FOV: f64 = 75.0;
pub const CAMERA_NEAR: f64 = 0.1;
pub const CAMERA_FAR: f64 = 1000.0;
pub const CAMERA_DISTANCE: f64 = 5.0;

pub const CUP_BACKGROUND: Color = Color::from_hex(0xADD8E6);
pub const PEARL_COUNT: usize = 20;
/// Pearls are kept inside this vertical band every frame
pub const PEARL_Y_LIMIT: f64 = 1.4;
/// Vertical band pearls are scattered over at construction, inside the clamp band.
/// Narrower than `(r - 0.5) * 2.6 - 0.7` on purpose, so the clamp never moves a new pearl.
pub const PEARL_SPAWN_Y: (f64, f64) = (-1.4, 1.2);
/// Horizontal half-extent pearls are scattered over at construction
pub const PEARL_SPAWN_XZ: f64 = 0.9;
pub const FLUID_REST_Y: f64 = -0.1;
pub const FLUID_AMPLITUDE: f64 = 0.05;
/// Angular speed of the fluid bob, radians per millisecond
pub const FLUID_FREQUENCY: f64 = 0.002;

pub const CUBE_SPIN: f64 = 0.01;

pub const CUP_CONTROLS: ControlsSettings = ControlsSettings {
    enable_damping: true,
    damping_factor: 0.25,
    enable_zoom: true,
};

/// Named scene presets a [`SceneView`](crate::view::SceneView) can mount
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ScenePreset {
    /// Boba tea cup with bobbing tea and pearls, orbit controls
    #[default]
    Cup,
    /// Spinning green cube
    Cube,
}

impl std::fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenePreset::Cup => write!(f, "cup"),
            ScenePreset::Cube => write!(f, "cube"),
        }
    }
}

/// Everything a preset hands to the view at mount time
#[derive(Debug)]
pub struct PresetScene {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: Option<OrbitControls>,
    pub animation: Animation,
}

/// Per-frame update of a preset, holding the handles it mutates
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    Cup { fluid: NodeId, pearls: Vec<NodeId> },
    Cube { cube: NodeId },
}

/// Vertical offset of the fluid at wall-clock time `now_ms`
pub fn fluid_offset(now_ms: f64) -> f64 {
    (now_ms * FLUID_FREQUENCY).sin() * FLUID_AMPLITUDE + FLUID_REST_Y
}

impl Animation {
    pub fn step(&self, scene: &mut Scene, now_ms: f64) {
        match self {
            Animation::Cup { fluid, pearls } => {
                scene.node_mut(*fluid).position.y = fluid_offset(now_ms);
                for &pearl in pearls {
                    let position = &mut scene.node_mut(pearl).position;
                    position.y = position.y.clamp(-PEARL_Y_LIMIT, PEARL_Y_LIMIT);
                }
            }
            Animation::Cube { cube } => {
                let rotation = &mut scene.node_mut(*cube).rotation;
                rotation.x += CUBE_SPIN;
                rotation.y += CUBE_SPIN;
            }
        }
    }
}

impl ScenePreset {
    pub fn has_controls(self) -> bool {
        matches!(self, ScenePreset::Cup)
    }

    /// Builds the preset's primitives, camera and controls for a surface
    /// with the given aspect ratio
    pub fn build<R: Rng + ?Sized>(self, aspect: f64, rng: &mut R) -> PresetScene {
        let mut camera = PerspectiveCamera::new(CAMERA_FOV, aspect, CAMERA_NEAR, CAMERA_FAR);
        camera.position.z = CAMERA_DISTANCE;

        let (scene, animation) = match self {
            ScenePreset::Cup => build_cup(rng),
            ScenePreset::Cube => build_cube(),
        };
        let controls = self
            .has_controls()
            .then(|| OrbitControls::new(&camera, CUP_CONTROLS));

        log::debug!(
            "built {} preset: {} primitives, controls {}",
            self,
            scene.len(),
            if controls.is_some() { "on" } else { "off" }
        );

        PresetScene {
            scene,
            camera,
            controls,
            animation,
        }
    }
}

fn build_cup<R: Rng + ?Sized>(rng: &mut R) -> (Scene, Animation) {
    let mut scene = Scene::new();
    scene.background = Some(CUP_BACKGROUND);

    let cup = Rc::new(Geometry::new(Shape::Cylinder {
        radius_top: 1.0,
        radius_bottom: 1.0,
        height: 3.0,
        radial_segments: 32,
    }));
    scene.add(Node::new(
        NodeKind::Container,
        cup,
        Material::translucent(Color::from_hex(0xFFFFFF), 0.3),
    ));

    let tea = Rc::new(Geometry::new(Shape::Cylinder {
        radius_top: 0.9,
        radius_bottom: 0.9,
        height: 2.8,
        radial_segments: 32,
    }));
    let fluid = scene.add(
        Node::new(
            NodeKind::Fluid,
            tea,
            Material::translucent(Color::from_hex(0xFFC0CB), 0.6),
        )
        .with_position(DVec3::new(0.0, FLUID_REST_Y, 0.0)),
    );

    // All pearls share one sphere
    let pearl = Rc::new(Geometry::new(Shape::Sphere {
        radius: 0.1,
        width_segments: 32,
        height_segments: 32,
    }));
    let pearl_material = Material::opaque(Color::from_hex(0x000000));
    let pearls = (0..PEARL_COUNT)
        .map(|_| {
            let (low, high) = PEARL_SPAWN_Y;
            let position = DVec3::new(
                (rng.gen::<f64>() - 0.5) * 2.0 * PEARL_SPAWN_XZ,
                low + rng.gen::<f64>() * (high - low),
                (rng.gen::<f64>() - 0.5) * 2.0 * PEARL_SPAWN_XZ,
            );
            scene.add_child(
                fluid,
                Node::new(NodeKind::Pearl, pearl.clone(), pearl_material).with_position(position),
            )
        })
        .collect();

    (scene, Animation::Cup { fluid, pearls })
}

fn build_cube() -> (Scene, Animation) {
    let mut scene = Scene::new();
    let geometry = Rc::new(Geometry::new(Shape::Cuboid {
        width: 1.0,
        height: 1.0,
        depth: 1.0,
    }));
    let cube = scene.add(Node::new(
        NodeKind::Cube,
        geometry,
        Material::opaque(Color::from_hex(0x00FF00)),
    ));
    (scene, Animation::Cube { cube })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    fn pearls(preset: &PresetScene) -> Vec<NodeId> {
        match &preset.animation {
            Animation::Cup { pearls, .. } => pearls.clone(),
            other => panic!("expected cup animation, got {:?}", other),
        }
    }

    #[test]
    fn pearls_start_inside_the_fluid() {
        for seed in 0..50 {
            let preset = ScenePreset::Cup.build(1.0, &mut StdRng::seed_from_u64(seed));
            for id in pearls(&preset) {
                let p = preset.scene.node(id).position;
                assert!((-0.9..=0.9).contains(&p.x), "x = {}", p.x);
                assert!((-0.9..=0.9).contains(&p.z), "z = {}", p.z);
                assert!((-1.4..=1.2).contains(&p.y), "y = {}", p.y);
            }
        }
    }

    #[test]
    fn pearl_clamp_is_a_no_op_for_fresh_pearls() {
        let mut preset = ScenePreset::Cup.build(1.0, &mut StdRng::seed_from_u64(7));
        let before: Vec<f64> = pearls(&preset)
            .iter()
            .map(|&id| preset.scene.node(id).position.y)
            .collect();
        preset.animation.step(&mut preset.scene, 0.0);
        let after: Vec<f64> = pearls(&preset)
            .iter()
            .map(|&id| preset.scene.node(id).position.y)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn pearl_clamp_pulls_strays_back() {
        let mut preset = ScenePreset::Cup.build(1.0, &mut StdRng::seed_from_u64(3));
        let ids = pearls(&preset);
        preset.scene.node_mut(ids[0]).position.y = 3.0;
        preset.scene.node_mut(ids[1]).position.y = -3.0;
        preset.animation.step(&mut preset.scene, 0.0);
        assert_eq!(preset.scene.node(ids[0]).position.y, PEARL_Y_LIMIT);
        assert_eq!(preset.scene.node(ids[1]).position.y, -PEARL_Y_LIMIT);
    }

    #[test]
    fn fluid_offset_is_periodic_and_bounded() {
        assert_eq!(fluid_offset(0.0), -0.1);
        let period = 1000.0 * PI;
        for i in 0..500 {
            let t = i as f64 * 37.3;
            let y = fluid_offset(t);
            assert!((-0.15 - 1e-12..=-0.05 + 1e-12).contains(&y));
            assert!((fluid_offset(t + period) - y).abs() < 1e-9);
        }
        assert!((fluid_offset(period / 4.0) - -0.05).abs() < 1e-12);
    }

    #[test]
    fn cube_spins_both_axes_each_step() {
        let mut preset = ScenePreset::Cube.build(1.0, &mut StdRng::seed_from_u64(0));
        let Animation::Cube { cube } = preset.animation.clone() else {
            panic!("expected cube animation");
        };
        for _ in 0..3 {
            preset.animation.step(&mut preset.scene, 0.0);
        }
        let rotation = preset.scene.node(cube).rotation;
        assert!((rotation.x - 0.03).abs() < 1e-12);
        assert!((rotation.y - 0.03).abs() < 1e-12);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn cube_preset_has_no_background_or_controls() {
        let preset = ScenePreset::Cube.build(1.0, &mut StdRng::seed_from_u64(0));
        assert!(preset.scene.background.is_none());
        assert!(preset.controls.is_none());
        assert_eq!(preset.scene.len(), 1);
        let (_, cube) = preset.scene.iter().next().unwrap();
        assert_eq!(cube.material, Material::opaque(Color::from_hex(0x00FF00)));
    }
}
