//! Command-line arguments for the planetarium viewer.

use std::path::PathBuf;

use clap::Parser;

use super::{Config, FrameClock};
use crate::model::ScenePreset;

/// CLI values override settings loaded from the config file.
#[derive(Parser, Debug)]
#[command(name = "planetarium", about = "A ringed planet and its moons")]
pub struct CliArgs {
    /// Path to a RON config file.
    #[arg(long, default_value = "planetarium.ron")]
    pub config: PathBuf,

    /// Which scene to build.
    #[arg(long, value_enum)]
    pub preset: Option<ScenePreset>,

    /// Number of randomized moons.
    #[arg(long)]
    pub moons: Option<usize>,

    /// Seed for moon placement.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Advance by real elapsed time instead of one tick per frame.
    #[arg(long)]
    pub measured_clock: bool,

    /// Directory textures are loaded from.
    #[arg(long)]
    pub assets: Option<PathBuf>,
}

impl Config {
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(preset) = args.preset {
            self.scene.preset = preset;
        }
        if let Some(moons) = args.moons {
            self.swarm.count = moons;
        }
        if let Some(seed) = args.seed {
            self.swarm.seed = seed;
        }
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if args.measured_clock {
            self.scene.clock = FrameClock::Measured;
        }
        if let Some(ref assets) = args.assets {
            self.scene.asset_root = assets.clone();
        }
    }
}
