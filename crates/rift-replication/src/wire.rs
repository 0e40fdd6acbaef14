//! Wire representation of snapshot rounds (JSON or postcard binary).
//!
//! Every field except the id is optional on the wire. Missing or non-finite
//! required fields are filled from the receiver's previous snapshot for the
//! same id, so one bad field never aborts reconciliation of the entity.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::snapshot::{EntityId, EntitySnapshot, WeaponId};

/// Errors produced while encoding or decoding a snapshot round.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("binary codec error: {0}")]
    Binary(#[from] postcard::Error),
}

/// One entity record as transmitted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WireSnapshot {
    pub id: EntityId,
    pub position: Option<Vec3>,
    pub rotation_y: Option<f32>,
    pub alive: Option<bool>,
    pub current_weapon: Option<WeaponId>,
    pub is_aiming: Option<bool>,
    pub is_healing: Option<bool>,
    pub weapon_hidden: Option<bool>,
}

impl WireSnapshot {
    /// Builds a full [`EntitySnapshot`], taking missing or non-finite
    /// position/rotation/alive from `prior`.
    ///
    /// Returns `None` when no usable position exists (a first sighting
    /// without a position).
    pub fn resolve(&self, prior: Option<&EntitySnapshot>) -> Option<EntitySnapshot> {
        let position = self
            .position
            .filter(|p| p.is_finite())
            .or(prior.map(|p| p.position))?;
        let rotation_y = self
            .rotation_y
            .filter(|r| r.is_finite())
            .or(prior.map(|p| p.rotation_y))
            .unwrap_or(0.0);
        let alive = self.alive.or(prior.map(|p| p.alive)).unwrap_or(true);

        Some(EntitySnapshot {
            id: self.id,
            position,
            rotation_y,
            alive,
            current_weapon: self.current_weapon,
            is_aiming: self.is_aiming,
            is_healing: self.is_healing,
            weapon_hidden: self.weapon_hidden,
        })
    }
}

impl From<&EntitySnapshot> for WireSnapshot {
    fn from(s: &EntitySnapshot) -> Self {
        Self {
            id: s.id,
            position: Some(s.position),
            rotation_y: Some(s.rotation_y),
            alive: Some(s.alive),
            current_weapon: s.current_weapon,
            is_aiming: s.is_aiming,
            is_healing: s.is_healing,
            weapon_hidden: s.weapon_hidden,
        }
    }
}

/// A complete replacement list of entities for one broadcast tick. Ids absent
/// from a round are despawned by the receiver.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SnapshotRound {
    pub tick: u64,
    pub entities: Vec<WireSnapshot>,
}

impl SnapshotRound {
    pub fn from_snapshots(tick: u64, snapshots: &[EntitySnapshot]) -> Self {
        Self {
            tick,
            entities: snapshots.iter().map(WireSnapshot::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}
