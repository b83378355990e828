use crate::math::calculate_normal;
use glam::DVec3;
use std::f64::consts::PI;

/// Shape descriptor: dimensions and segment counts of a primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cylinder {
        radius_top: f64,
        radius_bottom: f64,
        height: f64,
        radial_segments: usize,
    },
    Sphere {
        radius: f64,
        width_segments: usize,
        height_segments: usize,
    },
    Cuboid {
        width: f64,
        height: f64,
        depth: f64,
    },
}

/// Indexed triangle mesh, counter-clockwise front faces seen from outside
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<DVec3>,
    pub normals: Vec<DVec3>,
    pub triangles: Vec<[usize; 3]>,
}

/// A shape together with its tessellated mesh, shared between primitives
#[derive(Debug, Clone)]
pub struct Geometry {
    pub shape: Shape,
    pub mesh: Mesh,
}

impl Geometry {
    pub fn new(shape: Shape) -> Self {
        Geometry {
            shape,
            mesh: shape.tessellate(),
        }
    }
}

impl Shape {
    pub fn tessellate(&self) -> Mesh {
        match *self {
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => cylinder(radius_top, radius_bottom, height, radial_segments.max(3)),
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments.max(3), height_segments.max(2)),
            Shape::Cuboid {
                width,
                height,
                depth,
            } => cuboid(width, height, depth),
        }
    }
}

impl Mesh {
    fn push(&mut self, position: DVec3, normal: DVec3) -> usize {
        self.positions.push(position);
        self.normals.push(normal);
        self.positions.len() - 1
    }
}

fn cylinder(radius_top: f64, radius_bottom: f64, height: f64, segments: usize) -> Mesh {
    let mut mesh = Mesh::default();
    let half_height = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    // Side wall: one ring at the top, one at the bottom
    let mut rings = [Vec::with_capacity(segments + 1), Vec::with_capacity(segments + 1)];
    for (ring, (radius, y)) in rings
        .iter_mut()
        .zip([(radius_top, half_height), (radius_bottom, -half_height)])
    {
        for ix in 0..=segments {
            let theta = ix as f64 / segments as f64 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            let normal = DVec3::new(sin, slope, cos).normalize();
            ring.push(mesh.push(DVec3::new(radius * sin, y, radius * cos), normal));
        }
    }
    for ix in 0..segments {
        let a = rings[0][ix];
        let b = rings[1][ix];
        let c = rings[1][ix + 1];
        let d = rings[0][ix + 1];
        mesh.triangles.push([a, b, d]);
        mesh.triangles.push([b, c, d]);
    }

    // Caps
    for (radius, y, top) in [
        (radius_top, half_height, true),
        (radius_bottom, -half_height, false),
    ] {
        if radius <= 0.0 {
            continue;
        }
        let normal = if top { DVec3::Y } else { DVec3::NEG_Y };
        let center = mesh.push(DVec3::new(0.0, y, 0.0), normal);
        let ring: Vec<usize> = (0..=segments)
            .map(|ix| {
                let theta = ix as f64 / segments as f64 * 2.0 * PI;
                let (sin, cos) = theta.sin_cos();
                mesh.push(DVec3::new(radius * sin, y, radius * cos), normal)
            })
            .collect();
        for ix in 0..segments {
            if top {
                mesh.triangles.push([center, ring[ix], ring[ix + 1]]);
            } else {
                mesh.triangles.push([center, ring[ix + 1], ring[ix]]);
            }
        }
    }

    mesh
}

fn sphere(radius: f64, width_segments: usize, height_segments: usize) -> Mesh {
    let mut mesh = Mesh::default();
    let mut grid = Vec::with_capacity(height_segments + 1);

    for iy in 0..=height_segments {
        let v = iy as f64 / height_segments as f64;
        let row: Vec<usize> = (0..=width_segments)
            .map(|ix| {
                let u = ix as f64 / width_segments as f64;
                let normal = DVec3::new(
                    -(u * 2.0 * PI).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * 2.0 * PI).sin() * (v * PI).sin(),
                );
                mesh.push(normal * radius, normal)
            })
            .collect();
        grid.push(row);
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            // The pole rows collapse to a point; skip their degenerate halves
            if iy != 0 {
                mesh.triangles.push([a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.triangles.push([b, c, d]);
            }
        }
    }

    mesh
}

fn cuboid(width: f64, height: f64, depth: f64) -> Mesh {
    let half = DVec3::new(width, height, depth) / 2.0;

    // Define cube vertices
    let corners = [
        DVec3::new(-1.0, -1.0, -1.0), // 0
        DVec3::new(1.0, -1.0, -1.0),  // 1
        DVec3::new(1.0, 1.0, -1.0),   // 2
        DVec3::new(-1.0, 1.0, -1.0),  // 3
        DVec3::new(-1.0, -1.0, 1.0),  // 4
        DVec3::new(1.0, -1.0, 1.0),   // 5
        DVec3::new(1.0, 1.0, 1.0),    // 6
        DVec3::new(-1.0, 1.0, 1.0),   // 7
    ]
    .map(|corner| corner * half);

    // Cube faces, wound counter-clockwise seen from outside
    let faces = [
        (3, 2, 1, 0),
        (6, 7, 4, 5),
        (7, 3, 0, 4),
        (2, 6, 5, 1),
        (0, 1, 5, 4),
        (7, 6, 2, 3),
    ];

    // Each face gets its own vertices so normals stay flat
    let mut mesh = Mesh::default();
    for (a, b, c, d) in faces {
        let normal = calculate_normal(corners[a], corners[b], corners[c]);
        let [a, b, c, d] = [a, b, c, d].map(|index| mesh.push(corners[index], normal));
        mesh.triangles.push([a, b, c]);
        mesh.triangles.push([a, c, d]);
    }
    mesh
}
