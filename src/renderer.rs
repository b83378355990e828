use crate::camera::PerspectiveCamera;
use crate::graphics::{draw_line, draw_triangle, Fill};
use crate::scene::{NodeId, Scene};
use crate::surface::{Color, Surface};
use crate::vertex::Vertex;
use glam::{DMat3, DMat4, DVec3};

/// Light position used when shading is switched on
pub const LIGHT_POSITION: DVec3 = DVec3::new(2.0, 2.0, 5.0);

/// Draws a scene as seen by a camera into a surface
#[derive(Debug, Clone)]
pub struct Renderer {
    /// Used when the scene has no background of its own
    pub clear_color: Color,
    pub wireframe: bool,
    pub shading: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer {
            clear_color: Color::BLACK,
            wireframe: false,
            shading: false,
        }
    }
}

impl Renderer {
    pub fn render(&self, scene: &Scene, camera: &PerspectiveCamera, surface: &mut Surface) {
        surface.clear(scene.background.unwrap_or(self.clear_color));
        if surface.is_empty() {
            return;
        }

        let view_projection = camera.view_projection();

        // Opaque first, then transparent far-to-near so blending sees what is behind
        let (mut transparent, opaque): (Vec<_>, Vec<_>) = scene
            .iter()
            .filter(|(_, node)| node.material.alpha() > 0.0)
            .map(|(id, node)| (id, scene.world_matrix(id), node.material.transparent))
            .partition(|&(_, _, transparent)| transparent);

        // Concentric primitives share a view depth, so sort by distance to the eye
        let distance = |matrix: &DMat4| {
            matrix
                .transform_point3(DVec3::ZERO)
                .distance_squared(camera.position)
        };
        transparent.sort_by(|(_, a, _), (_, b, _)| distance(b).total_cmp(&distance(a)));

        for (id, world, _) in opaque.into_iter().chain(transparent) {
            self.draw_node(scene, id, &world, &view_projection, camera.near, surface);
        }
    }

    fn draw_node(
        &self,
        scene: &Scene,
        id: NodeId,
        world: &DMat4,
        view_projection: &DMat4,
        near: f64,
        surface: &mut Surface,
    ) {
        let node = scene.node(id);
        let mesh = &node.geometry.mesh;
        let normal_matrix = DMat3::from_mat4(*world).inverse().transpose();
        let (width, height) = (surface.width(), surface.height());

        let vertices: Vec<Option<Vertex>> = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .map(|(&position, &normal)| {
                let position = world.transform_point3(position);
                let projected =
                    PerspectiveCamera::project(view_projection, near, position, width, height)?;
                Some(Vertex {
                    position,
                    depth: projected.depth,
                    screen_position: projected.screen,
                    normal: (normal_matrix * normal).normalize_or_zero(),
                })
            })
            .collect();

        let fill = Fill {
            color: node.material.color,
            alpha: node.material.alpha(),
            light: self.shading.then_some(LIGHT_POSITION),
        };

        for &[a, b, c] in &mesh.triangles {
            // Triangles crossing the near plane are dropped whole
            let (Some(v0), Some(v1), Some(v2)) = (&vertices[a], &vertices[b], &vertices[c]) else {
                continue;
            };
            if self.wireframe {
                draw_line(v0.screen_position, v1.screen_position, surface, fill.color);
                draw_line(v1.screen_position, v2.screen_position, surface, fill.color);
                draw_line(v2.screen_position, v0.screen_position, surface, fill.color);
            } else {
                draw_triangle(v0, v1, v2, surface, &fill);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Shape};
    use crate::scene::{Material, Node, NodeKind};
    use std::rc::Rc;

    fn camera(width: usize, height: usize) -> PerspectiveCamera {
        let mut camera =
            PerspectiveCamera::new(75.0, PerspectiveCamera::aspect_for(width, height), 0.1, 1000.0);
        camera.position.z = 5.0;
        camera
    }

    fn cube_scene(material: Material) -> Scene {
        let mut scene = Scene::new();
        scene.add(Node::new(
            NodeKind::Cube,
            Rc::new(Geometry::new(Shape::Cuboid {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            })),
            material,
        ));
        scene
    }

    #[test]
    fn cube_covers_center_and_leaves_corners_clear() {
        let scene = cube_scene(Material::opaque(Color::from_hex(0x00FF00)));
        let mut surface = Surface::new(64, 48);
        Renderer::default().render(&scene, &camera(64, 48), &mut surface);
        assert_eq!(surface.pixel(32, 24), Some(Color::from_hex(0x00FF00)));
        assert_eq!(surface.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn background_overrides_clear_color() {
        let mut scene = Scene::new();
        scene.background = Some(Color::from_hex(0xADD8E6));
        let mut surface = Surface::new(8, 8);
        Renderer::default().render(&scene, &camera(8, 8), &mut surface);
        assert!(surface
            .pixels()
            .iter()
            .all(|&p| p == Color::from_hex(0xADD8E6)));
    }

    #[test]
    fn translucent_primitive_tints_the_background() {
        let mut scene = cube_scene(Material::translucent(Color::WHITE, 0.5));
        scene.background = Some(Color::BLACK);
        let mut surface = Surface::new(64, 48);
        Renderer::default().render(&scene, &camera(64, 48), &mut surface);
        assert_eq!(surface.pixel(32, 24), Some(Color::rgb8(128, 128, 128)));
    }

    #[test]
    fn opaque_node_behind_translucent_one_shows_through() {
        let mut scene = cube_scene(Material::translucent(Color::WHITE, 0.5));
        let back = scene.add(Node::new(
            NodeKind::Pearl,
            Rc::new(Geometry::new(Shape::Cuboid {
                width: 0.5,
                height: 0.5,
                depth: 0.5,
            })),
            Material::opaque(Color::from_hex(0xFF0000)),
        ));
        scene.node_mut(back).position.z = -2.0;
        let mut surface = Surface::new(64, 48);
        Renderer::default().render(&scene, &camera(64, 48), &mut surface);
        // Half red, half white
        assert_eq!(surface.pixel(32, 24), Some(Color::rgb8(255, 128, 128)));
    }

    #[test]
    fn wireframe_leaves_face_interiors_unpainted() {
        let scene = cube_scene(Material::opaque(Color::from_hex(0x00FF00)));
        let mut surface = Surface::new(64, 48);
        let renderer = Renderer {
            wireframe: true,
            ..Renderer::default()
        };
        renderer.render(&scene, &camera(64, 48), &mut surface);
        let green = surface
            .pixels()
            .iter()
            .filter(|&&p| p == Color::from_hex(0x00FF00))
            .count();
        assert!(green > 0);
        assert!(green < 64 * 48 / 10);
    }

    #[test]
    fn shading_varies_brightness_above_ambient_floor() {
        let mut scene = cube_scene(Material::opaque(Color::from_hex(0x00FF00)));
        let cube = scene.roots().next().unwrap();
        scene.node_mut(cube).rotation = DVec3::new(0.5, 0.7, 0.0);
        let mut surface = Surface::new(64, 48);
        let renderer = Renderer {
            shading: true,
            ..Renderer::default()
        };
        renderer.render(&scene, &camera(64, 48), &mut surface);

        let shades: std::collections::BTreeSet<u8> = surface
            .pixels()
            .iter()
            .filter(|&&p| p != Color::BLACK)
            .map(|p| {
                assert_eq!((p.r, p.b), (0, 0), "lighting must only scale the base color");
                p.g
            })
            .collect();
        assert!(shades.len() >= 3, "expected several shades, got {:?}", shades);
        // 255 * 0.1 ambient, truncated
        assert!(*shades.iter().next().unwrap() >= 25);
        assert!(*shades.iter().last().unwrap() > 25);
    }

    #[test]
    fn zero_sized_surface_draws_nothing() {
        let scene = cube_scene(Material::opaque(Color::WHITE));
        let mut surface = Surface::new(0, 0);
        Renderer::default().render(&scene, &camera(0, 0), &mut surface);
        assert!(surface.pixels().is_empty());
    }
}
