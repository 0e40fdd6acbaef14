//! Blending helpers shared by the reconciliation step.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Ease-out curve `t * (2 - t)`: fast catch-up, smooth settle.
pub fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

/// Wraps an angle into `(-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Blends `from → to` along the shortest arc; the result is wrapped.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(from + wrap_angle(to - from) * t)
}

/// Distance in the XZ (ground) plane.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}
