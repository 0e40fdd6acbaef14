//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Rift command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "rift", about = "Rift authoritative core")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Level geometry file (.json or .ron).
    #[arg(long)]
    pub level: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Disable collision enforcement.
    #[arg(long)]
    pub no_collision: bool,

    /// Local participant id.
    #[arg(long)]
    pub local_id: Option<u64>,

    /// Number of authority ticks to simulate.
    #[arg(long, default_value_t = 120)]
    pub ticks: u32,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.level {
            self.collision.level_file = Some(level.clone());
        }
        if args.no_collision {
            self.collision.enabled = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(id) = args.local_id {
            self.network.local_player_id = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs::parse_from([
            "rift",
            "--level",
            "levels/yard.ron",
            "--no-collision",
            "--local-id",
            "3",
        ]);
        config.apply_cli_overrides(&args);
        assert_eq!(
            config.collision.level_file,
            Some(PathBuf::from("levels/yard.ron"))
        );
        assert!(!config.collision.enabled);
        assert_eq!(config.network.local_player_id, Some(3));
        // Non-overridden fields retain defaults
        assert_eq!(config.debug.log_level, "info");
        assert_eq!(args.ticks, 120);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::parse_from(["rift"]));
        assert_eq!(config, original);
    }
}
