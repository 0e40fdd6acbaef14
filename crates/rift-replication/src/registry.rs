//! Set of remote participant views keyed by [`EntityId`].
//!
//! Each snapshot round is a complete replacement list: ids seen for the first
//! time are spawned (and their renderable asset requested), known ids are
//! forwarded to their view, and ids missing from the round are despawned with
//! their asset released exactly once. The local participant is never
//! represented as a remote view.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use crate::snapshot::{EntityId, EntitySnapshot};
use crate::tuning::InterpolationTuning;
use crate::view::{DisplayChange, RemoteEntityView, RenderPose};
use crate::wire::SnapshotRound;

// ---------------------------------------------------------------------------
// AssetLifecycle
// ---------------------------------------------------------------------------

/// Hook into the renderer's asset loader. `request` starts an asynchronous
/// load; the loader later reports completion through
/// [`RemoteEntityRegistry::mark_asset_ready`]. `release` frees whatever was
/// loaded (or cancels an in-flight load).
pub trait AssetLifecycle {
    fn request(&mut self, id: EntityId);
    fn release(&mut self, id: EntityId);
}

/// Headless registries have nothing to load.
impl AssetLifecycle for () {
    fn request(&mut self, _id: EntityId) {}
    fn release(&mut self, _id: EntityId) {}
}

// ---------------------------------------------------------------------------
// ReconcileSummary
// ---------------------------------------------------------------------------

/// What a single reconciliation round did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Newly created views, in round order.
    pub spawned: Vec<EntityId>,
    /// Existing views that received a snapshot.
    pub updated: usize,
    /// Views removed because their id was absent, sorted by id.
    pub despawned: Vec<EntityId>,
}

impl ReconcileSummary {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.updated == 0 && self.despawned.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RemoteEntityRegistry
// ---------------------------------------------------------------------------

/// Client-side registry of every remote participant.
pub struct RemoteEntityRegistry<A: AssetLifecycle = ()> {
    views: FxHashMap<EntityId, RemoteEntityView>,
    local_id: Option<EntityId>,
    tuning: InterpolationTuning,
    assets: A,
}

impl RemoteEntityRegistry<()> {
    /// Creates a registry without an asset loader.
    pub fn new(tuning: InterpolationTuning) -> Self {
        Self::with_assets(tuning, ())
    }
}

impl<A: AssetLifecycle> RemoteEntityRegistry<A> {
    pub fn with_assets(tuning: InterpolationTuning, assets: A) -> Self {
        Self {
            views: FxHashMap::default(),
            local_id: None,
            tuning,
            assets,
        }
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    pub fn tuning(&self) -> &InterpolationTuning {
        &self.tuning
    }

    /// Sets the id of the local participant. A remote view already held for
    /// that id is despawned.
    pub fn set_local_id(&mut self, id: EntityId) {
        self.local_id = Some(id);
        if self.views.remove(&id).is_some() {
            self.assets.release(id);
            info!(%id, "local id had a remote view, despawned");
        }
    }

    pub fn local_id(&self) -> Option<EntityId> {
        self.local_id
    }

    /// Reconciles the registry against a complete snapshot round.
    pub fn reconcile(&mut self, snapshots: &[EntitySnapshot]) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let mut seen: FxHashSet<EntityId> = FxHashSet::default();

        for snapshot in snapshots {
            let id = snapshot.id;
            if Some(id) == self.local_id {
                continue;
            }
            seen.insert(id);

            if let Some(view) = self.views.get_mut(&id) {
                view.on_snapshot(snapshot);
                summary.updated += 1;
                continue;
            }

            if !snapshot.pose().is_finite() {
                warn!(%id, "first snapshot has a non-finite pose, not spawning");
                continue;
            }
            self.views
                .insert(id, RemoteEntityView::new(snapshot.clone(), self.tuning));
            self.assets.request(id);
            summary.spawned.push(id);
            debug!(%id, position = %snapshot.position, "remote entity spawned");
        }

        let mut stale: Vec<EntityId> = self
            .views
            .keys()
            .copied()
            .filter(|id| !seen.contains(id))
            .collect();
        stale.sort_unstable();
        for id in &stale {
            self.views.remove(id);
            self.assets.release(*id);
            debug!(%id, "remote entity despawned");
        }
        summary.despawned = stale;

        summary
    }

    /// Decodes a wire round against the previous snapshot of each id and
    /// reconciles it. Records that cannot be resolved (a new id without a
    /// position) are dropped and therefore count as absent.
    pub fn reconcile_wire(&mut self, round: &SnapshotRound) -> ReconcileSummary {
        let snapshots: Vec<EntitySnapshot> = round
            .entities
            .iter()
            .filter_map(|wire| {
                let prior = self.views.get(&wire.id).map(|v| v.latest_snapshot());
                let resolved = wire.resolve(prior);
                if resolved.is_none() {
                    warn!(id = %wire.id, tick = round.tick, "unresolvable wire record dropped");
                }
                resolved
            })
            .collect();
        self.reconcile(&snapshots)
    }

    /// Advances every view by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        for view in self.views.values_mut() {
            view.interpolate(dt);
        }
    }

    /// Reports that the asset for `id` finished loading. Returns `false` for
    /// unknown ids (the load outlived its entity) or repeated notifications.
    pub fn mark_asset_ready(&mut self, id: EntityId) -> bool {
        match self.views.get_mut(&id) {
            Some(view) => view.on_asset_ready(),
            None => {
                debug!(%id, "asset ready for unknown entity, ignored");
                false
            }
        }
    }

    pub fn begin_melee(&mut self, id: EntityId, duration: f32) -> bool {
        let Some(view) = self.views.get_mut(&id) else {
            return false;
        };
        view.begin_melee(duration);
        true
    }

    pub fn notify_fired(&mut self, id: EntityId) -> bool {
        let Some(view) = self.views.get_mut(&id) else {
            return false;
        };
        view.notify_fired();
        true
    }

    pub fn get(&self, id: EntityId) -> Option<&RemoteEntityView> {
        self.views.get(&id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Ids of all held views, sorted.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.views.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Render output for every visible participant, sorted by id.
    pub fn render_poses(&self) -> Vec<RenderPose> {
        let mut poses: Vec<RenderPose> = self
            .views
            .values()
            .filter_map(RemoteEntityView::render_pose)
            .collect();
        poses.sort_unstable_by_key(|p| p.id);
        poses
    }

    /// Takes pending display changes from every view, sorted by id. Changes
    /// for one id keep their application order.
    pub fn drain_changes(&mut self) -> Vec<(EntityId, DisplayChange)> {
        let mut out: Vec<(EntityId, DisplayChange)> = Vec::new();
        for id in self.ids() {
            if let Some(view) = self.views.get_mut(&id) {
                out.extend(view.drain_changes().into_iter().map(|c| (id, c)));
            }
        }
        out
    }

    /// Despawns every view, releasing each asset once.
    pub fn clear(&mut self) {
        for id in self.ids() {
            self.views.remove(&id);
            self.assets.release(id);
        }
        info!("remote entity registry cleared");
    }
}
