//! Scripted authority: a handful of participants whose state is a pure
//! function of time, so every run produces the same snapshot rounds.

use glam::Vec3;
use rift_replication::{EntityId, EntitySnapshot, WeaponId};

/// Eye height above a participant's feet.
pub const EYE_HEIGHT: f32 = 1.6;
/// Height a shot aims at on the target.
pub const CHEST_HEIGHT: f32 = 1.0;

pub const WALKER: EntityId = EntityId(2);
pub const DASHER: EntityId = EntityId(3);
pub const LATECOMER: EntityId = EntityId(4);

/// A shot the local participant claims to have landed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub target: EntityId,
    pub eye: Vec3,
    pub aim_point: Vec3,
}

pub struct Scenario {
    local: EntityId,
    rate_hz: u32,
}

impl Scenario {
    pub fn new(local: EntityId, rate_hz: u32) -> Self {
        Self {
            local,
            rate_hz: rate_hz.max(1),
        }
    }

    pub fn seconds(&self, tick: u32) -> f32 {
        tick as f32 / self.rate_hz as f32
    }

    /// Whether `tick` falls on a whole second.
    pub fn on_second(&self, tick: u32) -> bool {
        tick % self.rate_hz == 0
    }

    /// The complete participant list the authority broadcasts at `tick`.
    pub fn round(&self, tick: u32) -> Vec<EntitySnapshot> {
        let t = self.seconds(tick);
        let mut round = vec![self.local_at(t), walker_at(t), dasher_at(t)];
        if (1.5..4.5).contains(&t) {
            round.push(latecomer_at(t));
        }
        round
    }

    /// Shots from the local participant at every living remote one.
    pub fn shots(&self, round: &[EntitySnapshot]) -> Vec<Shot> {
        let Some(shooter) = round.iter().find(|s| s.id == self.local) else {
            return Vec::new();
        };
        let eye = shooter.position + Vec3::Y * EYE_HEIGHT;
        round
            .iter()
            .filter(|s| s.id != self.local && s.alive)
            .map(|s| Shot {
                target: s.id,
                eye,
                aim_point: s.position + Vec3::Y * CHEST_HEIGHT,
            })
            .collect()
    }

    /// Circles the central cover at radius 10.
    fn local_at(&self, t: f32) -> EntitySnapshot {
        let angle = t * 0.8;
        let position = Vec3::new(angle.cos() * 10.0, 0.0, angle.sin() * 10.0);
        EntitySnapshot::new(self.local, position, -angle).with_weapon(WeaponId::Pistol)
    }
}

/// Patrols along x, aiming for one second in the middle of the run.
fn walker_at(t: f32) -> EntitySnapshot {
    let phase = (t / 4.0).fract();
    let sweep = if phase < 0.5 { phase * 2.0 } else { 2.0 - phase * 2.0 };
    let heading = if phase < 0.5 { std::f32::consts::FRAC_PI_2 } else { -std::f32::consts::FRAC_PI_2 };
    EntitySnapshot::new(WALKER, Vec3::new(-20.0 + 40.0 * sweep, 0.0, 15.0), heading)
        .with_weapon(WeaponId::Rifle)
        .with_aiming((2.0..3.0).contains(&t))
}

/// Dashes 6 units every two seconds, heals briefly, dies at 3 s and
/// respawns elsewhere at 4 s.
fn dasher_at(t: f32) -> EntitySnapshot {
    let healing = (1.0..1.5).contains(&t);
    let weapon = if healing { WeaponId::HealingItem } else { WeaponId::Shotgun };
    let (position, alive) = if t < 3.0 {
        (Vec3::new(-10.0 + 6.0 * (t / 2.0).floor(), 0.0, -20.0), true)
    } else if t < 4.0 {
        (Vec3::new(2.0, 0.0, -20.0), false)
    } else {
        (Vec3::new(30.0, 0.0, -30.0), true)
    };
    EntitySnapshot::new(DASHER, position, std::f32::consts::PI)
        .with_alive(alive)
        .with_weapon(weapon)
        .with_healing(healing)
}

fn latecomer_at(t: f32) -> EntitySnapshot {
    EntitySnapshot::new(LATECOMER, Vec3::new(-30.0 + t, 0.0, -30.0), 0.0)
        .with_weapon(WeaponId::Sniper)
        .with_weapon_hidden(t < 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        Scenario::new(EntityId(1), 20)
    }

    #[test]
    fn test_latecomer_joins_and_leaves() {
        let s = scenario();
        let has = |tick| s.round(tick).iter().any(|e| e.id == LATECOMER);
        assert!(!has(0));
        assert!(has(30));
        assert!(!has(90));
    }

    #[test]
    fn test_dasher_dies_and_revives() {
        let s = scenario();
        let dasher = |tick| s.round(tick).into_iter().find(|e| e.id == DASHER).unwrap();
        assert!(dasher(40).alive);
        assert!(!dasher(70).alive);
        assert!(dasher(80).alive);
    }

    #[test]
    fn test_shots_skip_self_and_dead() {
        let s = scenario();
        let round = s.round(70);
        let targets: Vec<EntityId> = s.shots(&round).iter().map(|shot| shot.target).collect();
        assert_eq!(targets, vec![WALKER, LATECOMER]);
    }

    #[test]
    fn test_rounds_are_deterministic() {
        let s = scenario();
        assert_eq!(s.round(37), s.round(37));
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        let s = Scenario::new(EntityId(1), 0);
        assert!(s.on_second(5));
        assert_eq!(s.seconds(2), 2.0);
    }
}
