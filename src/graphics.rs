use crate::math::{apply_lighting, blend, calculate_light_intensity, edge_function};
use crate::surface::{Color, Surface};
use crate::vertex::Vertex;
use glam::DVec3;

/// How a triangle's pixels are colored
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    pub color: Color,
    /// Source alpha; 1.0 overwrites the destination
    pub alpha: f64,
    /// Point light for per-pixel shading; `None` draws flat color
    pub light: Option<DVec3>,
}

/// Draws a triangle into the surface, depth-tested against what is already there.
///
/// Back-facing (clockwise on screen) and degenerate triangles are skipped.
pub fn draw_triangle(v0: &Vertex, v1: &Vertex, v2: &Vertex, surface: &mut Surface, fill: &Fill) {
    let (width, height) = (surface.width(), surface.height());
    if width == 0 || height == 0 {
        return;
    }

    // Precompute area of the triangle
    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area <= 0.0 {
        return;
    }

    // Compute bounding box of the triangle, skipping it if entirely off-surface
    let min_x = v0.screen_position[0]
        .min(v1.screen_position[0])
        .min(v2.screen_position[0])
        .floor()
        .max(0.0);
    let max_x = v0.screen_position[0]
        .max(v1.screen_position[0])
        .max(v2.screen_position[0])
        .ceil()
        .min(width as f64 - 1.0);
    let min_y = v0.screen_position[1]
        .min(v1.screen_position[1])
        .min(v2.screen_position[1])
        .floor()
        .max(0.0);
    let max_y = v0.screen_position[1]
        .max(v1.screen_position[1])
        .max(v2.screen_position[1])
        .ceil()
        .min(height as f64 - 1.0);
    if min_x > max_x || min_y > max_y {
        return;
    }

    let (pixel_data, z_buffer) = surface.buffers_mut();

    // For each pixel in the bounding box
    for y in min_y as usize..=max_y as usize {
        for x in min_x as usize..=max_x as usize {
            let p = [x as f64 + 0.5, y as f64 + 0.5];

            let w0 = edge_function(&v1.screen_position, &v2.screen_position, &p);
            let w1 = edge_function(&v2.screen_position, &v0.screen_position, &p);
            let w2 = edge_function(&v0.screen_position, &v1.screen_position, &p);
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            // Normalize barycentric coordinates
            let (w0, w1, w2) = (w0 / area, w1 / area, w2 / area);

            // Depth test
            let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
            let offset = y * width + x;
            if depth >= z_buffer[offset] {
                continue;
            }
            z_buffer[offset] = depth;

            let color = match fill.light {
                Some(light_pos) => {
                    let position = v0.position * w0 + v1.position * w1 + v2.position * w2;
                    let normal =
                        (v0.normal * w0 + v1.normal * w1 + v2.normal * w2).normalize_or_zero();
                    let intensity = calculate_light_intensity(normal, position, light_pos);
                    apply_lighting(fill.color, intensity)
                }
                None => fill.color,
            };

            pixel_data[offset] = if fill.alpha >= 1.0 {
                color
            } else {
                blend(color, pixel_data[offset], fill.alpha)
            };
        }
    }
}

/// Draws a line between two points using Bresenham's algorithm
pub fn draw_line(from: [f64; 2], to: [f64; 2], surface: &mut Surface, color: Color) {
    // Far off-surface endpoints would make the walk needlessly long
    let limit = (surface.width().max(surface.height()) as f64 + 1.0) * 4.0;
    if from.iter().chain(&to).any(|c| !c.is_finite() || c.abs() > limit) {
        return;
    }

    let (mut x0, mut y0, x1, y1) = (
        from[0].round() as isize,
        from[1].round() as isize,
        to[0].round() as isize,
        to[1].round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        if x0 >= 0 && y0 >= 0 {
            surface.set_pixel(x0 as usize, y0 as usize, color);
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
