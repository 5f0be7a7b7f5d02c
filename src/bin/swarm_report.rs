use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use rust_planetarium::config::Config;
use rust_planetarium::logging::init_logging;
use rust_planetarium::model::headless::{HeadlessBackend, MissingAssets};
use rust_planetarium::model::{CameraRig, SceneCoordinator, ScenePreset};

/// Builds a scene without a window, runs it for a while, and prints where
/// everything ended up.
#[derive(Debug, Parser)]
struct Args {
    /// RON config to start from; defaults are used if it doesn't exist.
    #[arg(long, default_value = "planetarium.ron")]
    config: PathBuf,
    #[arg(long, value_enum)]
    preset: Option<ScenePreset>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    moons: Option<usize>,
    /// Frames to simulate, one tick each.
    #[arg(long, default_value_t = 0)]
    ticks: u64,
    /// Only print the first this-many satellites.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging("warn");

    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    if let Some(preset) = args.preset {
        config.scene.preset = preset;
    }
    if let Some(seed) = args.seed {
        config.swarm.seed = seed;
    }
    if let Some(moons) = args.moons {
        config.swarm.count = moons;
    }
    config.validate()?;

    let setup = config.scene.preset.build(&config)?;
    let rig = CameraRig::new(config.camera.rig_settings(), config.window.aspect())?;
    let mut scene = SceneCoordinator::new(
        setup,
        rig,
        HeadlessBackend::new(),
        &mut MissingAssets::default(),
        Path::new("."),
    );
    for _ in 0..args.ticks {
        scene.frame(None);
    }

    let registry = scene.registry();
    let primary = registry.primary();
    println!(
        "{:?}: {} satellites after {} ticks (seed {})",
        config.scene.preset,
        registry.len(),
        scene.elapsed_ticks(),
        config.swarm.seed
    );
    println!("- Primary radius: {}", primary.radius);
    if let Some(ring) = primary.ring() {
        println!("- Ring: {} to {}", ring.inner_radius, ring.outer_radius);
    }
    println!();

    for body in registry.satellites().take(args.limit) {
        let p = body.position();
        println!("Satellite {}", body.id().0);
        println!("- Orbit radius: {:.4}", body.orbit_radius());
        println!("- Inclination: {:.3} deg", body.inclination_deg());
        println!("- Speed: {:.6} rad/tick", body.orbit_speed());
        println!("- Period: {:?} ticks", body.period());
        println!("- Size: {:.4}", body.size());
        println!("- Position: ({:.4}, {:.4}, {:.4})", p.x, p.y, p.z);
        println!();
    }
    if registry.len() > args.limit {
        println!("... and {} more", registry.len() - args.limit);
    }
    Ok(())
}
