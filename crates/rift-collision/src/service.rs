//! Owned collision service: holds the current level's geometry and answers
//! hit-validation and line-of-sight queries for the authority.

use std::path::Path;

use glam::Vec3;
use tracing::{debug, info, warn};

use crate::aabb::{Aabb, WallSpec};
use crate::geometry::{AabbGeometry, LevelGeometry};
use crate::raycast::{self, Ray, RaycastHit};

/// Lifecycle of a [`CollisionService`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceState {
    /// Constructed; no level loaded yet.
    Uninitialized,
    /// Geometry loaded and queries enabled.
    Active,
    /// Geometry discarded by [`CollisionService::clear`].
    Cleared,
}

/// Which geometry a load operation ended up installing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometrySource {
    /// The caller's level geometry.
    Explicit,
    /// The built-in perimeter, either requested or as a fallback.
    Default,
}

/// Outcome of validating a claimed hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitVerdict {
    /// Nothing between shooter and target.
    Clear,
    /// A wall blocks the segment.
    Blocked(RaycastHit),
    /// Collision is inactive; callers must treat this as "not blocked".
    Inconclusive,
}

impl HitVerdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, HitVerdict::Blocked(_))
    }
}

/// Authoritative collision geometry for one level.
///
/// Queries return `None` while the service is not [active](Self::is_active).
/// Geometry changes take `&mut self`, so they can never overlap a raycast.
#[derive(Debug)]
pub struct CollisionService {
    geometry: AabbGeometry,
    state: ServiceState,
    enforcement: bool,
}

impl Default for CollisionService {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionService {
    /// Creates an uninitialised service. Enforcement follows the
    /// `collision-checks` cargo feature.
    pub fn new() -> Self {
        Self::with_enforcement(cfg!(feature = "collision-checks"))
    }

    /// Creates an uninitialised service with an explicit enforcement toggle.
    pub fn with_enforcement(enforcement: bool) -> Self {
        Self {
            geometry: AabbGeometry::empty(),
            state: ServiceState::Uninitialized,
            enforcement,
        }
    }

    /// Loads level geometry, falling back to the default perimeter when
    /// `level` is absent or malformed. Always leaves the service active.
    pub fn initialize(&mut self, level: Option<LevelGeometry>) -> GeometrySource {
        let (geometry, source) = match level {
            Some(level) => Self::resolve(&level),
            None => {
                info!("no level geometry supplied, using default perimeter");
                (AabbGeometry::default_perimeter(), GeometrySource::Default)
            }
        };
        self.install(geometry);
        source
    }

    /// Loads level geometry from a `.json` or `.ron` file, falling back to
    /// the default perimeter when the file cannot be read or parsed.
    pub fn initialize_from_file(&mut self, path: &Path) -> GeometrySource {
        match LevelGeometry::load(path) {
            Ok(level) => self.initialize(Some(level)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "level file unusable, using default perimeter");
                self.install(AabbGeometry::default_perimeter());
                GeometrySource::Default
            }
        }
    }

    /// Swaps the whole geometry set at a level boundary. Same fallback rules
    /// as [`initialize`](Self::initialize).
    pub fn replace(&mut self, level: LevelGeometry) -> GeometrySource {
        let (geometry, source) = Self::resolve(&level);
        self.install(geometry);
        source
    }

    /// Appends one wall after validating its six fields. Malformed walls are
    /// logged and ignored. Returns whether the wall was added.
    pub fn add_wall(&mut self, wall: WallSpec) -> bool {
        match Aabb::try_from(wall) {
            Ok(aabb) => {
                self.geometry.push(aabb);
                debug!(walls = self.geometry.len(), "wall added");
                true
            }
            Err(e) => {
                warn!(error = %e, ?wall, "ignoring malformed wall");
                false
            }
        }
    }

    /// Discards the geometry and deactivates queries.
    pub fn clear(&mut self) {
        self.geometry = AabbGeometry::empty();
        self.state = ServiceState::Cleared;
        info!("collision geometry cleared");
    }

    /// Tears the service down at level unload.
    pub fn destroy(mut self) {
        self.clear();
    }

    /// `true` when geometry is loaded, the `collision-checks` feature is
    /// compiled in and runtime enforcement is enabled.
    pub fn is_active(&self) -> bool {
        self.state == ServiceState::Active
            && cfg!(feature = "collision-checks")
            && self.enforcement
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn enforcement(&self) -> bool {
        self.enforcement
    }

    /// Suppresses or re-enables collision checks without touching geometry.
    /// Enabling has no effect on queries when built without `collision-checks`.
    pub fn set_enforcement(&mut self, enabled: bool) {
        if self.enforcement != enabled {
            info!(enabled, "collision enforcement toggled");
        }
        if enabled && !cfg!(feature = "collision-checks") {
            warn!("collision-checks feature not compiled in, queries stay inconclusive");
        }
        self.enforcement = enabled;
    }

    pub fn geometry(&self) -> &AabbGeometry {
        &self.geometry
    }

    pub fn wall_count(&self) -> usize {
        self.geometry.len()
    }

    /// Returns true if `p` lies inside the playable bounds. Always false
    /// before a level is loaded.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.state == ServiceState::Active && self.geometry.bounds().contains_point(p)
    }

    /// Nearest wall hit on the segment `from → to`.
    pub fn raycast_segment(&self, from: Vec3, to: Vec3) -> Option<RaycastHit> {
        if !self.is_active() || self.geometry.is_empty() {
            return None;
        }
        raycast::raycast_segment(from, to, &self.geometry)
    }

    /// Nearest wall hit along `direction` within `max_distance`.
    pub fn raycast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        if !self.is_active() || self.geometry.is_empty() {
            return None;
        }
        let ray = Ray::new(origin, direction, max_distance)?;
        raycast::raycast(&ray, &self.geometry)
    }

    /// `true` if a wall lies between `from` and `to`.
    pub fn line_of_sight_blocked(&self, from: Vec3, to: Vec3) -> bool {
        self.raycast_segment(from, to).is_some()
    }

    /// Decides whether a hit claimed from `eye` on `target` is geometrically
    /// possible.
    pub fn validate_hit(&self, eye: Vec3, target: Vec3) -> HitVerdict {
        if !self.is_active() {
            return HitVerdict::Inconclusive;
        }
        match self.raycast_segment(eye, target) {
            Some(hit) => {
                debug!(distance = hit.distance, point = %hit.point, "claimed hit blocked by wall");
                HitVerdict::Blocked(hit)
            }
            None => HitVerdict::Clear,
        }
    }

    fn resolve(level: &LevelGeometry) -> (AabbGeometry, GeometrySource) {
        match level.validate() {
            Ok(geometry) => (geometry, GeometrySource::Explicit),
            Err(e) => {
                warn!(error = %e, "malformed level geometry, using default perimeter");
                (AabbGeometry::default_perimeter(), GeometrySource::Default)
            }
        }
    }

    fn install(&mut self, geometry: AabbGeometry) {
        info!(
            walls = geometry.len(),
            enforcement = self.enforcement,
            "collision geometry loaded"
        );
        self.geometry = geometry;
        self.state = ServiceState::Active;
    }
}

#[cfg(all(test, feature = "collision-checks"))]
mod tests {
    use super::*;

    fn wall(min_z: f32, max_z: f32) -> WallSpec {
        WallSpec {
            min_x: -10.0,
            max_x: 10.0,
            min_y: 0.0,
            max_y: 5.0,
            min_z,
            max_z,
        }
    }

    fn level() -> LevelGeometry {
        LevelGeometry {
            walls: vec![wall(4.0, 5.0)],
            bounds: WallSpec {
                min_x: -20.0,
                max_x: 20.0,
                min_y: 0.0,
                max_y: 5.0,
                min_z: -20.0,
                max_z: 20.0,
            },
        }
    }

    #[test]
    fn test_uninitialized_service_never_hits() {
        let service = CollisionService::with_enforcement(true);
        assert_eq!(service.state(), ServiceState::Uninitialized);
        assert!(!service.is_active());
        assert!(
            service
                .raycast_segment(Vec3::new(0.0, 1.0, -200.0), Vec3::new(0.0, 1.0, 200.0))
                .is_none()
        );
        assert_eq!(
            service.validate_hit(Vec3::ZERO, Vec3::Z),
            HitVerdict::Inconclusive
        );
    }

    #[test]
    fn test_initialize_without_level_uses_default() {
        let mut service = CollisionService::with_enforcement(true);
        assert_eq!(service.initialize(None), GeometrySource::Default);
        assert!(service.is_active());
        assert_eq!(service.wall_count(), 4);
    }

    #[test]
    fn test_initialize_with_explicit_level() {
        let mut service = CollisionService::with_enforcement(true);
        assert_eq!(service.initialize(Some(level())), GeometrySource::Explicit);
        assert_eq!(service.wall_count(), 1);
        assert!(service.line_of_sight_blocked(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 10.0)));
    }

    #[test]
    fn test_malformed_level_falls_back_to_default() {
        let mut bad = level();
        bad.walls.push(wall(5.0, 4.0));
        let mut service = CollisionService::with_enforcement(true);
        assert_eq!(service.initialize(Some(bad)), GeometrySource::Default);
        assert!(service.is_active());
        assert_eq!(service.wall_count(), 4);
    }

    #[test]
    fn test_unreadable_level_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = CollisionService::with_enforcement(true);
        let source = service.initialize_from_file(&dir.path().join("missing.json"));
        assert_eq!(source, GeometrySource::Default);
        assert!(service.is_active());
    }

    #[test]
    fn test_level_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yard.json");
        std::fs::write(&path, serde_json::to_string(&level()).unwrap()).unwrap();

        let mut service = CollisionService::with_enforcement(true);
        assert_eq!(service.initialize_from_file(&path), GeometrySource::Explicit);
        assert_eq!(service.wall_count(), 1);
    }

    #[test]
    fn test_add_wall_validates_fields() {
        let mut service = CollisionService::with_enforcement(true);
        service.initialize(Some(level()));

        assert!(!service.add_wall(wall(f32::NAN, 5.0)));
        assert!(!service.add_wall(wall(9.0, 8.0)));
        assert_eq!(service.wall_count(), 1);

        assert!(service.add_wall(wall(-5.0, -4.0)));
        assert_eq!(service.wall_count(), 2);
        assert!(service.line_of_sight_blocked(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -10.0)));
    }

    #[test]
    fn test_replace_swaps_whole_geometry() {
        let mut service = CollisionService::with_enforcement(true);
        service.initialize(None);
        assert_eq!(service.replace(level()), GeometrySource::Explicit);
        assert_eq!(service.wall_count(), 1);
        assert_eq!(service.geometry().bounds().max.x, 20.0);
    }

    #[test]
    fn test_clear_deactivates() {
        let mut service = CollisionService::with_enforcement(true);
        service.initialize(None);
        service.clear();
        assert_eq!(service.state(), ServiceState::Cleared);
        assert!(!service.is_active());
        assert_eq!(service.wall_count(), 0);
        assert!(
            !service.line_of_sight_blocked(Vec3::new(0.0, 1.0, -200.0), Vec3::new(0.0, 1.0, 200.0))
        );
    }

    #[test]
    fn test_enforcement_toggle_keeps_geometry() {
        let mut service = CollisionService::with_enforcement(true);
        service.initialize(None);
        service.set_enforcement(false);
        assert!(!service.is_active());
        assert_eq!(service.wall_count(), 4);
        assert_eq!(
            service.validate_hit(Vec3::new(0.0, 1.0, -200.0), Vec3::new(0.0, 1.0, 0.0)),
            HitVerdict::Inconclusive
        );

        service.set_enforcement(true);
        assert!(
            service
                .validate_hit(Vec3::new(0.0, 1.0, -200.0), Vec3::new(0.0, 1.0, 0.0))
                .is_blocked()
        );
    }

    #[test]
    fn test_validate_hit_clear_inside_arena() {
        let mut service = CollisionService::with_enforcement(true);
        service.initialize(None);
        assert_eq!(
            service.validate_hit(Vec3::new(0.0, 1.6, 0.0), Vec3::new(50.0, 1.0, 50.0)),
            HitVerdict::Clear
        );
    }

    #[test]
    fn test_raycast_ray_respects_max_distance() {
        let mut service = CollisionService::with_enforcement(true);
        service.initialize(None);
        let origin = Vec3::new(0.0, 1.0, 0.0);
        assert!(service.raycast_ray(origin, Vec3::X, 100.0).is_none());
        let hit = service.raycast_ray(origin, Vec3::X, 200.0).unwrap();
        assert!((hit.distance - 122.0).abs() < 1e-4);
        assert_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_contains_point_uses_bounds() {
        let mut service = CollisionService::with_enforcement(true);
        assert!(!service.contains_point(Vec3::ZERO));
        service.initialize(None);
        assert!(service.contains_point(Vec3::new(0.0, 1.0, 0.0)));
        assert!(!service.contains_point(Vec3::new(0.0, 1.0, 500.0)));
    }

    #[test]
    fn test_destroy_consumes_service() {
        let mut service = CollisionService::with_enforcement(true);
        service.initialize(None);
        service.destroy();
    }
}

#[cfg(all(test, not(feature = "collision-checks")))]
mod disabled_tests {
    use super::*;

    #[test]
    fn test_runtime_toggle_cannot_enable_compiled_out_checks() {
        let mut service = CollisionService::new();
        assert!(!service.enforcement());
        service.set_enforcement(true);
        assert_eq!(service.initialize(None), GeometrySource::Default);

        assert_eq!(service.state(), ServiceState::Active);
        assert_eq!(service.wall_count(), 4);
        assert!(!service.is_active());
        assert!(
            service
                .raycast_segment(Vec3::new(0.0, 1.0, -200.0), Vec3::new(0.0, 1.0, 200.0))
                .is_none()
        );
        assert_eq!(
            service.validate_hit(Vec3::new(0.0, 1.0, -200.0), Vec3::new(0.0, 1.0, 0.0)),
            HitVerdict::Inconclusive
        );
    }
}
