//! Ray vs. wall-geometry intersection using the slab method.
//!
//! Each wall is tested independently by clipping the ray's parametric
//! interval against the three pairs of axis-aligned planes; the nearest
//! accepted hit across all walls wins.

use glam::Vec3;

use crate::aabb::Aabb;
use crate::geometry::AabbGeometry;

/// Direction components smaller than this are treated as parallel to the slab.
pub const PARALLEL_EPSILON: f32 = 1e-4;

/// Segments shorter than this cannot form a valid ray.
pub const MIN_SEGMENT_LENGTH: f32 = 1e-4;

/// A finite ray with a unit direction. Distances along it are world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
}

impl Ray {
    /// Creates a ray from an origin, a direction of any non-zero length and a
    /// maximum distance. Returns `None` for a degenerate direction or a
    /// negative / non-finite distance.
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Self> {
        if !origin.is_finite() || !direction.is_finite() {
            return None;
        }
        if !(max_distance.is_finite() && max_distance >= 0.0) {
            return None;
        }
        let len = direction.length();
        if len < MIN_SEGMENT_LENGTH {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / len,
            max_distance,
        })
    }

    /// Creates the ray covering the segment `from → to`. Returns `None` when
    /// the segment is shorter than [`MIN_SEGMENT_LENGTH`].
    pub fn between(from: Vec3, to: Vec3) -> Option<Self> {
        let delta = to - from;
        Self::new(from, delta, delta.length())
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest intersection of a ray with the wall geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// Distance from the ray origin, `>= 0`.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Axis-aligned face normal pointing back toward the ray origin.
    pub normal: Vec3,
}

/// Intersects `ray` with a single box, accepting hits up to `max_distance`.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb, max_distance: f32) -> Option<RaycastHit> {
    let mut t_min = 0.0_f32;
    let mut t_max = max_distance;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        let min = aabb.min[axis];
        let max = aabb.max[axis];

        if d.abs() < PARALLEL_EPSILON {
            if o < min || o > max {
                return None;
            }
            continue;
        }

        let inv_d = 1.0 / d;
        let mut t1 = (min - o) * inv_d;
        let mut t2 = (max - o) * inv_d;
        let mut sign = -1.0;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
            sign = 1.0;
        }

        if t1 > t_min {
            t_min = t1;
            normal = Vec3::ZERO;
            normal[axis] = sign;
        }
        t_max = t_max.min(t2);

        if t_min > t_max {
            return None;
        }
    }

    if t_min < 0.0 || t_min > max_distance {
        return None;
    }

    // Origin on or inside the box: no slab tightened the interval.
    if normal == Vec3::ZERO {
        normal = facing_normal(ray.direction);
    }

    Some(RaycastHit {
        distance: t_min,
        point: ray.at(t_min),
        normal,
    })
}

/// Casts `ray` against every wall and returns the nearest hit.
pub fn raycast(ray: &Ray, geometry: &AabbGeometry) -> Option<RaycastHit> {
    let mut best: Option<RaycastHit> = None;
    let mut cap = ray.max_distance;

    for wall in geometry.walls() {
        let Some(hit) = ray_aabb(ray, wall, cap) else {
            continue;
        };
        if best.is_none_or(|b| hit.distance < b.distance) {
            cap = hit.distance;
            best = Some(hit);
        }
    }

    best
}

/// Casts the segment `from → to`. Degenerate segments never hit.
pub fn raycast_segment(from: Vec3, to: Vec3, geometry: &AabbGeometry) -> Option<RaycastHit> {
    let ray = Ray::between(from, to)?;
    raycast(&ray, geometry)
}

/// Unit axis normal opposing the dominant component of `direction`.
fn facing_normal(direction: Vec3) -> Vec3 {
    let abs = direction.abs();
    let axis = if abs.x >= abs.y && abs.x >= abs.z {
        0
    } else if abs.y >= abs.z {
        1
    } else {
        2
    };
    let mut normal = Vec3::ZERO;
    normal[axis] = -direction[axis].signum();
    normal
}
