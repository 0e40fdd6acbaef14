//! Client-side reconciliation of remote participants.
//!
//! The authority broadcasts complete snapshot rounds. Each client feeds them
//! to a [`RemoteEntityRegistry`], which keeps one [`RemoteEntityView`] per
//! remote participant, and ticks the registry every render frame to obtain
//! smooth [`RenderPose`]s and animation decisions.

pub mod interpolation;
mod registry;
mod snapshot;
mod tuning;
mod view;
mod wire;


pub use registry::{AssetLifecycle, ReconcileSummary, RemoteEntityRegistry};
pub use snapshot::{EntityId, EntitySnapshot, Pose, WeaponId};
pub use tuning::InterpolationTuning;
pub use view::{AnimationState, DisplayChange, DisplayState, PendingState, RemoteEntityView, RenderPose};
pub use wire::{CodecError, SnapshotRound, WireSnapshot};
