//! Authoritative collision for hit validation: axis-aligned wall geometry,
//! slab-method raycasts, and the [`CollisionService`] that owns a level's
//! geometry for its whole lifetime.
//!
//! The service is an explicitly owned value. Whatever validates shots holds
//! it (or a reference to it) and drives the lifecycle
//! `new → initialize → raycast* → destroy`.

mod aabb;
mod error;
mod geometry;
mod raycast;
mod service;


pub use aabb::{Aabb, Axis, WallSpec};
pub use error::GeometryError;
pub use geometry::{
    AabbGeometry, ARENA_HALF_EXTENT, LevelGeometry, WALL_HEIGHT, WALL_THICKNESS,
};
pub use raycast::{
    MIN_SEGMENT_LENGTH, PARALLEL_EPSILON, Ray, RaycastHit, ray_aabb, raycast, raycast_segment,
};
pub use service::{CollisionService, GeometrySource, HitVerdict, ServiceState};
