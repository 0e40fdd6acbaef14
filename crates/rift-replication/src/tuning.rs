//! Interpolation tunables and their defaults.

use rift_config::InterpolationConfig;
use tracing::warn;

/// Interpolation progress per second for ordinary movement.
pub const NORMAL_INTERPOLATION_SPEED: f32 = 12.0;

/// Interpolation progress per second right after a teleport or dash.
pub const DASH_INTERPOLATION_SPEED: f32 = 15.0;

/// Horizontal snapshot-to-snapshot displacement treated as a teleport/dash.
pub const TELEPORT_THRESHOLD: f32 = 3.0;

/// Rendered speed (units/s) above which a participant counts as moving.
pub const MOVING_SPEED_THRESHOLD: f32 = 0.08;

/// Seconds `moving` persists after the speed last exceeded the threshold.
pub const MOVING_COOLDOWN_SECS: f32 = 0.15;

/// Seconds the aim pose is held after a shot.
pub const FIRE_POSE_SECS: f32 = 0.25;

/// Tunables for [`crate::RemoteEntityView`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolationTuning {
    pub normal_speed: f32,
    pub dash_speed: f32,
    pub teleport_threshold: f32,
    pub moving_speed_threshold: f32,
    pub moving_cooldown: f32,
    pub fire_pose_hold: f32,
}

impl Default for InterpolationTuning {
    fn default() -> Self {
        Self {
            normal_speed: NORMAL_INTERPOLATION_SPEED,
            dash_speed: DASH_INTERPOLATION_SPEED,
            teleport_threshold: TELEPORT_THRESHOLD,
            moving_speed_threshold: MOVING_SPEED_THRESHOLD,
            moving_cooldown: MOVING_COOLDOWN_SECS,
            fire_pose_hold: FIRE_POSE_SECS,
        }
    }
}

impl From<&InterpolationConfig> for InterpolationTuning {
    /// Non-positive or non-finite values fall back to the defaults.
    fn from(cfg: &InterpolationConfig) -> Self {
        let d = Self::default();
        Self {
            normal_speed: positive_or("normal_speed", cfg.normal_speed, d.normal_speed),
            dash_speed: positive_or("dash_speed", cfg.dash_speed, d.dash_speed),
            teleport_threshold: positive_or(
                "teleport_threshold",
                cfg.teleport_threshold,
                d.teleport_threshold,
            ),
            moving_speed_threshold: positive_or(
                "moving_speed_threshold",
                cfg.moving_speed_threshold,
                d.moving_speed_threshold,
            ),
            moving_cooldown: positive_or(
                "moving_cooldown_secs",
                cfg.moving_cooldown_secs,
                d.moving_cooldown,
            ),
            fire_pose_hold: positive_or("fire_pose_secs", cfg.fire_pose_secs, d.fire_pose_hold),
        }
    }
}

fn positive_or(name: &'static str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(setting = name, value, fallback, "invalid interpolation setting, using default");
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_default_tuning() {
        let tuning = InterpolationTuning::from(&InterpolationConfig::default());
        assert_eq!(tuning, InterpolationTuning::default());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = InterpolationConfig {
            normal_speed: -1.0,
            dash_speed: f32::NAN,
            teleport_threshold: 5.0,
            ..Default::default()
        };
        let tuning = InterpolationTuning::from(&cfg);
        assert_eq!(tuning.normal_speed, NORMAL_INTERPOLATION_SPEED);
        assert_eq!(tuning.dash_speed, DASH_INTERPOLATION_SPEED);
        assert_eq!(tuning.teleport_threshold, 5.0);
    }
}
