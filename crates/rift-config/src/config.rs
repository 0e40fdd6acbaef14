//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Platform config directory for Rift (`<config_dir>/rift`), if the OS has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rift"))
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Authoritative collision settings.
    pub collision: CollisionConfig,
    /// Remote-entity interpolation tuning.
    pub interpolation: InterpolationConfig,
    /// Snapshot broadcast settings.
    pub network: NetworkConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Collision configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    /// Runtime collision enforcement. Geometry still loads when disabled.
    pub enabled: bool,
    /// Level geometry file (`.json` or `.ron`). `None` uses the default perimeter.
    pub level_file: Option<PathBuf>,
}

/// Interpolation tuning for remote participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Interpolation progress per second for ordinary movement.
    pub normal_speed: f32,
    /// Interpolation progress per second after a teleport/dash.
    pub dash_speed: f32,
    /// Horizontal displacement between snapshots that counts as a dash.
    pub teleport_threshold: f32,
    /// Rendered speed above which the entity counts as moving.
    pub moving_speed_threshold: f32,
    /// How long `moving` persists after the speed last exceeded the threshold.
    pub moving_cooldown_secs: f32,
    /// How long the aim pose is held after a shot.
    pub fire_pose_secs: f32,
}

/// Snapshot broadcast configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Snapshot rounds per second produced by the authority.
    pub snapshot_rate_hz: u32,
    /// The local participant's id, never materialised as a remote entity.
    pub local_player_id: Option<u64>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level_file: None,
        }
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            normal_speed: 12.0,
            dash_speed: 15.0,
            teleport_threshold: 3.0,
            moving_speed_threshold: 0.08,
            moving_cooldown_secs: 0.15,
            fire_pose_secs: 0.25,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            snapshot_rate_hz: 20,
            local_player_id: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let new_config = Self::read(&config_path)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("snapshot_rate_hz: 20"));
        assert!(ron_str.contains("teleport_threshold: 3.0"));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(collision: (enabled: false), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert!(!config.collision.enabled);
        assert_eq!(config.interpolation, InterpolationConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_level_file_option() {
        let ron_str = r#"(collision: (level_file: Some("levels/yard.json")))"#;
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(
            config.collision.level_file,
            Some(PathBuf::from("levels/yard.json"))
        );
        assert!(config.collision.enabled);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.interpolation.dash_speed = 20.0;
        config.network.local_player_id = Some(7);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut modified = config.clone();
        modified.collision.enabled = false;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap().unwrap();
        assert!(!reloaded.collision.enabled);
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), Some(dir.path().join(CONFIG_FILE).as_path()));
        assert!(err.to_string().contains(CONFIG_FILE), "message: {err}");
    }

    #[test]
    fn test_reload_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        let expected = dir.path().join(CONFIG_FILE);
        assert!(
            err.to_string().contains(&expected.display().to_string()),
            "message: {err}"
        );
    }

    #[test]
    fn test_save_into_file_path_reports_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "").unwrap();
        let err = Config::default().save(&blocker).unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));
        assert_eq!(err.path(), Some(blocker.as_path()));
    }
}
