//! Headless Rift demo: a scripted authority and one client in a single process.
//!
//! The authority validates shots against the level's collision geometry and
//! broadcasts snapshot rounds as JSON. The client decodes them into a remote
//! entity registry and renders at 60 Hz.
//!
//! Run with `cargo run -p rift-demo -- --ticks 200 --log-level debug`.
//! Pass `--level path/to/level.ron` to load custom walls.

mod loader;
mod scenario;

use clap::Parser;
use rift_collision::{CollisionService, GeometrySource, HitVerdict, WallSpec};
use rift_config::{CliArgs, Config, default_config_dir};
use rift_replication::{
    CodecError, EntityId, InterpolationTuning, RemoteEntityRegistry, SnapshotRound,
};
use tracing::{debug, error, info, warn};

use loader::DeferredAssets;
use scenario::{DASHER, Scenario, WALKER};

const RENDER_HZ: u32 = 60;
const ASSET_LATENCY_FRAMES: u32 = 20;
const DEFAULT_LOCAL_ID: u64 = 1;
const MELEE_SECS: f32 = 0.4;

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| std::env::temp_dir().join("rift"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    rift_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config, args.ticks) {
        error!(error = %e, "demo aborted");
        std::process::exit(1);
    }
}

fn run(config: &Config, ticks: u32) -> Result<(), CodecError> {
    let collision = build_collision(config);

    let local = EntityId(config.network.local_player_id.unwrap_or(DEFAULT_LOCAL_ID));
    let rate = config.network.snapshot_rate_hz.max(1);
    let scenario = Scenario::new(local, rate);

    let tuning = InterpolationTuning::from(&config.interpolation);
    let mut registry =
        RemoteEntityRegistry::with_assets(tuning, DeferredAssets::new(ASSET_LATENCY_FRAMES));
    registry.set_local_id(local);

    let frames_per_round = (RENDER_HZ / rate).max(1);
    let dt = 1.0 / RENDER_HZ as f32;
    let mut blocked_shots = 0usize;
    let mut total_shots = 0usize;

    info!(%local, rate, ticks, "starting simulation");

    for tick in 0..ticks {
        // Authority side.
        let snapshots = scenario.round(tick);
        if scenario.on_second(tick) {
            for shot in scenario.shots(&snapshots) {
                total_shots += 1;
                match collision.validate_hit(shot.eye, shot.aim_point) {
                    HitVerdict::Blocked(hit) => {
                        blocked_shots += 1;
                        info!(target_id = %shot.target, wall_at = %hit.point, "shot rejected");
                    }
                    HitVerdict::Clear => info!(target_id = %shot.target, "shot accepted"),
                    HitVerdict::Inconclusive => {
                        debug!(target_id = %shot.target, "collision off, shot accepted")
                    }
                }
            }
        }
        let json = SnapshotRound::from_snapshots(u64::from(tick), &snapshots).to_json()?;

        // Client side.
        let round = SnapshotRound::from_json(&json)?;
        let summary = registry.reconcile_wire(&round);
        if !summary.spawned.is_empty() || !summary.despawned.is_empty() {
            info!(
                tick,
                spawned = ?summary.spawned,
                despawned = ?summary.despawned,
                "remote set changed"
            );
        }

        let t = scenario.seconds(tick);
        if (2.0..3.0).contains(&t) && scenario.on_second(tick) {
            registry.notify_fired(WALKER);
        }
        if tick == rate * 5 / 2 {
            registry.begin_melee(DASHER, MELEE_SECS);
        }

        for _ in 0..frames_per_round {
            for id in registry.assets_mut().advance() {
                registry.mark_asset_ready(id);
            }
            registry.tick(dt);
        }

        for (id, change) in registry.drain_changes() {
            debug!(%id, ?change, "display change");
        }

        if scenario.on_second(tick) {
            for pose in registry.render_poses() {
                info!(
                    id = %pose.id,
                    position = %pose.position,
                    rotation_y = pose.rotation_y,
                    animation = ?pose.animation,
                    weapon = ?pose.weapon,
                    "render"
                );
            }
        }
    }

    info!(
        shots = total_shots,
        blocked = blocked_shots,
        remote = registry.len(),
        assets_loaded = registry.assets().loaded_count(),
        "simulation finished"
    );

    registry.clear();
    collision.destroy();
    Ok(())
}

fn build_collision(config: &Config) -> CollisionService {
    let mut collision = CollisionService::new();
    collision.set_enforcement(config.collision.enabled);

    let source = match &config.collision.level_file {
        Some(path) => collision.initialize_from_file(path),
        None => collision.initialize(None),
    };

    // The perimeter alone never blocks an in-arena shot; add central cover.
    if source == GeometrySource::Default {
        let cover = WallSpec {
            min_x: -2.0,
            max_x: 2.0,
            min_y: 0.0,
            max_y: 4.0,
            min_z: -2.0,
            max_z: 2.0,
        };
        if !collision.add_wall(cover) {
            warn!("central cover rejected");
        }
    }

    info!(
        ?source,
        walls = collision.wall_count(),
        enforcement = collision.enforcement(),
        "collision ready"
    );
    collision
}
