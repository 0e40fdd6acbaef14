//! Authoritative per-participant state records.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identity of a networked participant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of equipment a participant can hold.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeaponId {
    #[default]
    Pistol,
    Rifle,
    Shotgun,
    Sniper,
    Knife,
    /// Consumable healing item held in place of a weapon.
    HealingItem,
}

impl WeaponId {
    pub fn is_healing_item(self) -> bool {
        self == WeaponId::HealingItem
    }
}

/// Position plus yaw.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Yaw in radians.
    pub rotation_y: f32,
}

impl Pose {
    pub fn new(position: Vec3, rotation_y: f32) -> Self {
        Self {
            position,
            rotation_y,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation_y.is_finite()
    }
}

/// One authoritative state record for one participant at one point in time.
///
/// Display fields are optional: `None` means "unchanged since the previous
/// snapshot", `Some(false)` means explicitly false.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub position: Vec3,
    /// Yaw in radians.
    pub rotation_y: f32,
    pub alive: bool,
    pub current_weapon: Option<WeaponId>,
    pub is_aiming: Option<bool>,
    pub is_healing: Option<bool>,
    pub weapon_hidden: Option<bool>,
}

impl EntitySnapshot {
    /// A live participant at `position` with no display fields set.
    pub fn new(id: EntityId, position: Vec3, rotation_y: f32) -> Self {
        Self {
            id,
            position,
            rotation_y,
            alive: true,
            current_weapon: None,
            is_aiming: None,
            is_healing: None,
            weapon_hidden: None,
        }
    }

    pub fn with_alive(mut self, alive: bool) -> Self {
        self.alive = alive;
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponId) -> Self {
        self.current_weapon = Some(weapon);
        self
    }

    pub fn with_aiming(mut self, aiming: bool) -> Self {
        self.is_aiming = Some(aiming);
        self
    }

    pub fn with_healing(mut self, healing: bool) -> Self {
        self.is_healing = Some(healing);
        self
    }

    pub fn with_weapon_hidden(mut self, hidden: bool) -> Self {
        self.weapon_hidden = Some(hidden);
        self
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation_y)
    }
}
