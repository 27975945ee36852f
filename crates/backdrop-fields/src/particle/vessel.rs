//! Vessel deformation applied to the particle cloud.
//!
//! `shaders/particles.wgsl` computes the same thing per vertex and fragment;
//! the two must stay in step.

use glam::{Vec2, Vec3};

pub const ROTATION_SPEED: f32 = 0.08;
pub const PULSE_SPEED: f32 = 0.3;
pub const PULSE_FREQUENCY: f32 = 3.0;
pub const PULSE_AMPLITUDE: f32 = 0.1;
pub const VESSEL_SCALE: f32 = 2.75;
pub const VESSEL_HEIGHT_OFFSET: f32 = -1.2;
/// Point size in pixels is `size · POINT_SIZE_SCALE / −view_z`.
pub const POINT_SIZE_SCALE: f32 = 128.0;

/// Hermite step, as in GLSL/WGSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Ring mask over the planar radius: 0 inside 0.3 and outside 1.0, 1 at 0.7.
#[inline]
pub fn vessel_factor(radius: f32) -> f32 {
    smoothstep(0.3, 0.7, radius) * (1.0 - smoothstep(0.7, 1.0, radius))
}

/// Deformed world position of a cloud point at `time`.
pub fn displace(pos: Vec3, time: f32) -> Vec3 {
    let radius = Vec2::new(pos.x, pos.z).length();
    let angle = pos.z.atan2(pos.x) + time * ROTATION_SPEED;
    let vessel = vessel_factor(radius);

    let pulse = (time * PULSE_SPEED + radius * PULSE_FREQUENCY).sin() * PULSE_AMPLITUDE;
    let r = (radius + pulse) * vessel;

    Vec3::new(
        angle.cos() * r,
        pos.y * vessel + VESSEL_HEIGHT_OFFSET,
        angle.sin() * r,
    ) * VESSEL_SCALE
}

/// Point diameter in pixels for a point at view-space depth `view_z`
/// (negative in front of the camera).
#[inline]
pub fn point_size_px(size: f32, view_z: f32) -> f32 {
    size * (POINT_SIZE_SCALE / -view_z)
}

/// Alpha of a point sprite at `uv` (0..1 across the sprite), or `None` where
/// the fragment is discarded.
pub fn point_alpha(uv: Vec2, opacity: f32) -> Option<f32> {
    let center = uv - Vec2::splat(0.5);
    let dist = center.dot(center);
    if dist > 0.25 {
        return None;
    }
    Some((1.0 - smoothstep(0.2025, 0.25, dist)) * opacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn vessel_masks_inner_and_outer_points() {
        assert_eq!(vessel_factor(0.0), 0.0);
        assert_eq!(vessel_factor(0.3), 0.0);
        assert_eq!(vessel_factor(1.0), 0.0);
        assert_eq!(vessel_factor(1.3), 0.0);
        assert!((vessel_factor(0.7) - 1.0).abs() < EPS);
        assert!(vessel_factor(0.5) > 0.0 && vessel_factor(0.5) < 1.0);
    }

    #[test]
    fn masked_points_collapse_to_the_axis() {
        let p = displace(Vec3::new(0.1, 0.9, 0.05), 3.0);
        assert!(p.x.abs() < EPS && p.z.abs() < EPS);
        assert!((p.y - VESSEL_HEIGHT_OFFSET * VESSEL_SCALE).abs() < EPS);
    }

    #[test]
    fn ring_points_rotate_with_time() {
        let pos = Vec3::new(0.7, 1.0, 0.0);
        let p0 = displace(pos, 0.0);
        let r0 = (0.7 + (0.7_f32 * 3.0).sin() * 0.1) * VESSEL_SCALE;
        assert!((p0.x - r0).abs() < 1e-4);
        assert!(p0.z.abs() < 1e-4);
        assert!((p0.y - (1.0 + VESSEL_HEIGHT_OFFSET) * VESSEL_SCALE).abs() < 1e-4);

        let t = 10.0;
        let p1 = displace(pos, t);
        let angle = p1.z.atan2(p1.x);
        assert!((angle - t * ROTATION_SPEED).abs() < 1e-4);
    }

    #[test]
    fn point_size_shrinks_with_depth() {
        assert!((point_size_px(0.2, -5.0) - 5.12).abs() < EPS);
        assert!(point_size_px(0.2, -10.0) < point_size_px(0.2, -5.0));
    }

    #[test]
    fn sprite_alpha_is_a_soft_disc() {
        assert_eq!(point_alpha(Vec2::splat(0.5), 0.4), Some(0.4));
        assert_eq!(point_alpha(Vec2::ZERO, 0.4), None);
        // Just inside the rim: faded but not discarded.
        let rim = point_alpha(Vec2::new(0.5 + 0.49, 0.5), 1.0);
        assert!(matches!(rim, Some(a) if a > 0.0 && a < 1.0));
    }
}
