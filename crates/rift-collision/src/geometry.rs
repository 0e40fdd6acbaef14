//! Level geometry: the immutable wall set a raycast runs against, and the
//! serialisable level description it is built from.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::aabb::{Aabb, WallSpec};
use crate::error::GeometryError;

/// Half-width of the default playable square, measured to the inner wall face.
pub const ARENA_HALF_EXTENT: f32 = 122.0;

/// Thickness of each default perimeter wall.
pub const WALL_THICKNESS: f32 = 3.0;

/// Height of each default perimeter wall.
pub const WALL_HEIGHT: f32 = 20.0;

/// Level geometry as supplied by the level loader: `{ walls, bounds }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelGeometry {
    pub walls: Vec<WallSpec>,
    pub bounds: WallSpec,
}

impl LevelGeometry {
    /// Parses a level from JSON.
    pub fn from_json(s: &str) -> Result<Self, GeometryError> {
        serde_json::from_str(s).map_err(GeometryError::Json)
    }

    /// Parses a level from RON.
    pub fn from_ron(s: &str) -> Result<Self, GeometryError> {
        ron::from_str(s).map_err(GeometryError::Ron)
    }

    /// Loads a level file, choosing the parser by extension (`.json`/`.ron`).
    pub fn load(path: &Path) -> Result<Self, GeometryError> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            Some("ron") => Self::from_ron(&contents),
            _ => Err(GeometryError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Validates every wall and the bounds, producing query-ready geometry.
    pub fn validate(&self) -> Result<AabbGeometry, GeometryError> {
        if self.walls.is_empty() {
            return Err(GeometryError::EmptyWalls);
        }
        let walls = self
            .walls
            .iter()
            .map(|w| Aabb::try_from(*w))
            .collect::<Result<Vec<_>, _>>()?;
        let bounds = Aabb::try_from(self.bounds)?;
        Ok(AabbGeometry { walls, bounds })
    }
}

impl From<&AabbGeometry> for LevelGeometry {
    fn from(geometry: &AabbGeometry) -> Self {
        Self {
            walls: geometry.walls.iter().copied().map(WallSpec::from).collect(),
            bounds: geometry.bounds.into(),
        }
    }
}

/// Validated wall boxes plus the playable bounding volume.
///
/// Wall order does not affect raycast results. The set is only ever replaced
/// wholesale or appended to.
#[derive(Clone, Debug, PartialEq)]
pub struct AabbGeometry {
    walls: Vec<Aabb>,
    bounds: Aabb,
}

impl AabbGeometry {
    /// Builds geometry from already-validated boxes.
    pub fn new(walls: Vec<Aabb>, bounds: Aabb) -> Self {
        Self { walls, bounds }
    }

    /// Geometry with no walls and a degenerate bounds box at the origin.
    pub fn empty() -> Self {
        Self {
            walls: Vec::new(),
            bounds: Aabb::new(Vec3::ZERO, Vec3::ZERO),
        }
    }

    /// Four exterior walls enclosing the default playable square.
    pub fn default_perimeter() -> Self {
        let inner = ARENA_HALF_EXTENT;
        let outer = ARENA_HALF_EXTENT + WALL_THICKNESS;
        let h = WALL_HEIGHT;

        let walls = vec![
            // north
            Aabb::new(Vec3::new(-outer, 0.0, -outer), Vec3::new(outer, h, -inner)),
            // south
            Aabb::new(Vec3::new(-outer, 0.0, inner), Vec3::new(outer, h, outer)),
            // west
            Aabb::new(Vec3::new(-outer, 0.0, -outer), Vec3::new(-inner, h, outer)),
            // east
            Aabb::new(Vec3::new(inner, 0.0, -outer), Vec3::new(outer, h, outer)),
        ];
        let bounds = Aabb::new(Vec3::new(-outer, 0.0, -outer), Vec3::new(outer, h, outer));

        Self { walls, bounds }
    }

    pub fn walls(&self) -> &[Aabb] {
        &self.walls
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Appends a validated wall.
    pub fn push(&mut self, wall: Aabb) {
        self.walls.push(wall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;

    const LEVEL_JSON: &str = r#"{
        "walls": [
            {"minX": -10, "maxX": 10, "minY": 0, "maxY": 5, "minZ": 4, "maxZ": 5}
        ],
        "bounds": {"minX": -20, "maxX": 20, "minY": 0, "maxY": 5, "minZ": -20, "maxZ": 20}
    }"#;

    #[test]
    fn test_default_perimeter_has_four_walls_inside_bounds() {
        let geometry = AabbGeometry::default_perimeter();
        assert_eq!(geometry.len(), 4);
        for wall in geometry.walls() {
            assert!(geometry.bounds().contains_point(wall.min));
            assert!(geometry.bounds().contains_point(wall.max));
        }
    }

    #[test]
    fn test_default_north_wall_matches_level_layout() {
        let geometry = AabbGeometry::default_perimeter();
        let north = geometry.walls()[0];
        assert_eq!(north.min, Vec3::new(-125.0, 0.0, -125.0));
        assert_eq!(north.max, Vec3::new(125.0, 20.0, -122.0));
    }

    #[test]
    fn test_level_from_json_validates() {
        let level = LevelGeometry::from_json(LEVEL_JSON).unwrap();
        let geometry = level.validate().unwrap();
        assert_eq!(geometry.len(), 1);
        assert_eq!(geometry.bounds().max.x, 20.0);
    }

    #[test]
    fn test_non_numeric_field_is_parse_error() {
        let bad = LEVEL_JSON.replace("\"maxX\": 10", "\"maxX\": \"ten\"");
        assert!(matches!(
            LevelGeometry::from_json(&bad),
            Err(GeometryError::Json(_))
        ));
    }

    #[test]
    fn test_empty_walls_rejected() {
        let level = LevelGeometry {
            walls: Vec::new(),
            bounds: AabbGeometry::default_perimeter().bounds().to_owned().into(),
        };
        assert!(matches!(level.validate(), Err(GeometryError::EmptyWalls)));
    }

    #[test]
    fn test_level_ron_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arena.ron");
        let level = LevelGeometry::from(&AabbGeometry::default_perimeter());
        std::fs::write(&path, ron::to_string(&level).unwrap()).unwrap();

        let loaded = LevelGeometry::load(&path).unwrap();
        assert_eq!(loaded, level);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arena.txt");
        std::fs::write(&path, LEVEL_JSON).unwrap();
        assert!(matches!(
            LevelGeometry::load(&path),
            Err(GeometryError::UnsupportedFormat(_))
        ));
    }
}
