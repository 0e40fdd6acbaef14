use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// One of the three world axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a [`Vec3`].
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Axis-aligned box in world units.
///
/// Invariant: `min <= max` on every axis. [`Aabb::new`] sorts its corners;
/// [`Aabb::try_from`] on a [`WallSpec`] rejects inverted input instead.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two corners, sorting components so that
    /// `min <= max` on every axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Returns the smallest AABB enclosing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Six-scalar wall description as it appears in level files.
///
/// Field names follow the level format (`minX`, `maxX`, ...). Converting to an
/// [`Aabb`] validates that every field is finite and `min <= max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSpec {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl WallSpec {
    fn fields(&self) -> [(&'static str, f32); 6] {
        [
            ("minX", self.min_x),
            ("maxX", self.max_x),
            ("minY", self.min_y),
            ("maxY", self.max_y),
            ("minZ", self.min_z),
            ("maxZ", self.max_z),
        ]
    }
}

impl TryFrom<WallSpec> for Aabb {
    type Error = GeometryError;

    fn try_from(spec: WallSpec) -> Result<Self, Self::Error> {
        if let Some((field, _)) = spec.fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(GeometryError::NonFinite { field });
        }

        let min = Vec3::new(spec.min_x, spec.min_y, spec.min_z);
        let max = Vec3::new(spec.max_x, spec.max_y, spec.max_z);
        for axis in Axis::ALL {
            let i = axis.index();
            if min[i] > max[i] {
                return Err(GeometryError::Inverted {
                    axis,
                    min: min[i],
                    max: max[i],
                });
            }
        }

        Ok(Aabb { min, max })
    }
}

impl From<Aabb> for WallSpec {
    fn from(aabb: Aabb) -> Self {
        Self {
            min_x: aabb.min.x,
            max_x: aabb.max.x,
            min_y: aabb.min.y,
            max_y: aabb.max.y,
            min_z: aabb.min.z,
            max_z: aabb.max.z,
        }
    }
}
