use crate::surface::Color;
use glam::DVec3;

/// Edge function used in rasterization
///
/// Positive when `c` lies to the right of `a -> b` in y-down screen space,
/// which is where counter-clockwise (front-facing) triangles put their interior.
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Calculates the light intensity based on the normal vector and light position
pub fn calculate_light_intensity(normal: DVec3, position: DVec3, light_pos: DVec3) -> f64 {
    let light_dir = (light_pos - position).normalize_or_zero();
    normal.dot(light_dir).max(0.1) // Ensure a minimum ambient light
}

/// Applies lighting to a color
pub fn apply_lighting(color: Color, intensity: f64) -> Color {
    let scale = |channel: u8| (channel as f64 * intensity).clamp(0.0, 255.0) as u8;
    Color::rgb8(scale(color.r), scale(color.g), scale(color.b))
}

/// Blends `src` over `dst` with the given source alpha
pub fn blend(src: Color, dst: Color, alpha: f64) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |s: u8, d: u8| (s as f64 * alpha + d as f64 * (1.0 - alpha)).round() as u8;
    Color::rgb8(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_function_sign_follows_winding() {
        // Counter-clockwise in y-up space, flipped to y-down screen space
        let a = [0.0, 0.0];
        let b = [1.0, 0.0];
        let c = [0.0, -1.0];
        assert!(edge_function(&a, &b, &c) > 0.0);
        assert!(edge_function(&a, &c, &b) < 0.0);
    }

    #[test]
    fn normal_of_xy_triangle_points_along_z() {
        let n = calculate_normal(DVec3::ZERO, DVec3::X, DVec3::Y);
        assert!((n - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn light_intensity_has_ambient_floor() {
        let facing_away = calculate_light_intensity(DVec3::Z, DVec3::ZERO, -DVec3::Z * 5.0);
        assert_eq!(facing_away, 0.1);
        let facing = calculate_light_intensity(DVec3::Z, DVec3::ZERO, DVec3::Z * 5.0);
        assert!((facing - 1.0).abs() < 1e-12);
    }

    #[test]
    fn blend_mixes_by_alpha() {
        let out = blend(Color::WHITE, Color::BLACK, 0.5);
        assert_eq!(out, Color::rgb8(128, 128, 128));
        assert_eq!(blend(Color::WHITE, Color::BLACK, 1.0), Color::WHITE);
        assert_eq!(apply_lighting(Color::WHITE, 0.5), Color::rgb8(127, 127, 127));
    }
}
