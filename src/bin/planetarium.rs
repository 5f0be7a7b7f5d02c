use anyhow::Context;
use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use nalgebra::Point3;

use rust_planetarium::config::{CliArgs, Config, ConfigSource};
use rust_planetarium::gui::Planetarium;
use rust_planetarium::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let (mut config, source) = Config::load_with_source(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    config.apply_cli_overrides(&args);
    config.validate().context("invalid settings")?;

    init_logging(&config.debug.log_level);
    match &source {
        ConfigSource::File(path) => tracing::info!(path = %path.display(), "loaded config"),
        ConfigSource::Defaults => {
            tracing::info!(path = %args.config.display(), "no config file, using defaults")
        }
    }
    tracing::info!(
        preset = ?config.scene.preset,
        moons = config.swarm.count,
        seed = config.swarm.seed,
        "starting planetarium"
    );

    let mut window = Window::new_with_size(
        &config.window.title,
        config.window.width,
        config.window.height,
    );
    window.set_light(Light::Absolute(Point3::new(10.0, 10.0, 10.0)));
    window.set_framerate_limit(config.window.framerate_limit);

    let planetarium = Planetarium::new(&config, &mut window).context("building the scene")?;
    window.render_loop(planetarium);
    Ok(())
}
