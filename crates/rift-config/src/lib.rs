//! Configuration for the Rift authority and client core.
//!
//! Settings persist to disk as RON (`config.ron`), tolerate missing and
//! unknown fields, and can be overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CollisionConfig, Config, DebugConfig, InterpolationConfig, NetworkConfig, default_config_dir,
};
pub use error::ConfigError;
