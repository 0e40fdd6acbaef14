//! Stand-in asset loader that completes each request after a fixed number of
//! frames.

use rift_replication::{AssetLifecycle, EntityId};
use tracing::debug;

pub struct DeferredAssets {
    latency_frames: u32,
    in_flight: Vec<(EntityId, u32)>,
    loaded: Vec<EntityId>,
}

impl DeferredAssets {
    pub fn new(latency_frames: u32) -> Self {
        Self {
            latency_frames,
            in_flight: Vec::new(),
            loaded: Vec::new(),
        }
    }

    /// Advances one frame and returns the ids whose load just finished.
    pub fn advance(&mut self) -> Vec<EntityId> {
        let mut done = Vec::new();
        self.in_flight.retain_mut(|(id, remaining)| {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                done.push(*id);
                false
            } else {
                true
            }
        });
        self.loaded.extend(&done);
        done
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

impl AssetLifecycle for DeferredAssets {
    fn request(&mut self, id: EntityId) {
        debug!(%id, frames = self.latency_frames, "asset load requested");
        self.in_flight.push((id, self.latency_frames.max(1)));
    }

    fn release(&mut self, id: EntityId) {
        self.in_flight.retain(|(pending, _)| *pending != id);
        self.loaded.retain(|loaded| *loaded != id);
        debug!(%id, "asset released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_completes_after_latency() {
        let mut assets = DeferredAssets::new(2);
        assets.request(EntityId(1));
        assert!(assets.advance().is_empty());
        assert_eq!(assets.advance(), vec![EntityId(1)]);
        assert!(assets.advance().is_empty());
        assert_eq!(assets.loaded_count(), 1);
    }

    #[test]
    fn test_release_cancels_in_flight_load() {
        let mut assets = DeferredAssets::new(3);
        assets.request(EntityId(1));
        assets.advance();
        assets.release(EntityId(1));
        for _ in 0..5 {
            assert!(assets.advance().is_empty());
        }
        assert_eq!(assets.loaded_count(), 0);
    }
}
