//! Geometry error types.

use std::path::PathBuf;

use crate::aabb::Axis;

/// Errors raised while building or loading level geometry.
///
/// None of these are fatal to the server: [`crate::CollisionService`] logs
/// them and falls back to the built-in perimeter.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// A wall or bounds field is NaN or infinite.
    #[error("field `{field}` is not a finite number")]
    NonFinite {
        /// Name of the offending field (e.g. `"minX"`).
        field: &'static str,
    },

    /// `min > max` on one axis.
    #[error("inverted extent on {axis} axis: min {min} > max {max}")]
    Inverted {
        /// Axis whose extent is inverted.
        axis: Axis,
        /// Minimum supplied.
        min: f32,
        /// Maximum supplied.
        max: f32,
    },

    /// The level declared no walls at all.
    #[error("level geometry contains no walls")]
    EmptyWalls,

    /// The JSON document could not be parsed into a level.
    #[error("failed to parse level JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The RON document could not be parsed into a level.
    #[error("failed to parse level RON: {0}")]
    Ron(#[source] ron::error::SpannedError),

    /// The level file extension is neither `.json` nor `.ron`.
    #[error("unsupported level file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Failed to read the level file.
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
}
