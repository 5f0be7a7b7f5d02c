//! Runtime settings, persisted as RON, with command-line overrides.

use std::path::{Path, PathBuf};

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ensure, ConfigError, SceneError};
use crate::model::camera_rig::{RigSettings, DEFAULT_SNAP_EPSILON, DEFAULT_TRANSITION_RATE};
use crate::model::sampler::SwarmRanges;
use crate::model::scene::FocusOffsets;
use crate::model::ScenePreset;

mod cli;

pub use cli::CliArgs;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub swarm: SwarmConfig,
    pub camera: CameraConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Frames per second cap; `None` leaves it to the driver.
    pub framerate_limit: Option<u64>,
}

/// How a frame's length is decided.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FrameClock {
    /// Every frame is one nominal tick, whatever the display rate.
    Fixed,
    /// Frames last as long as they actually took.
    Measured,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub preset: ScenePreset,
    /// Texture paths are resolved against this directory.
    pub asset_root: PathBuf,
    pub clock: FrameClock,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwarmConfig {
    /// Number of randomized satellites (ringed preset only).
    pub count: usize,
    pub seed: u64,
    pub ranges: SwarmRanges,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub home_position: [f64; 3],
    pub home_look_at: [f64; 3],
    /// Camera offset from the primary when focused on it.
    pub primary_offset: [f64; 3],
    /// Camera offset from a satellite when following it.
    pub satellite_offset: [f64; 3],
    pub transition_rate: f64,
    pub snap_epsilon: f64,
    pub fovy_deg: f64,
    pub znear: f64,
    pub zfar: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter, e.g. "debug" or "info,rust_planetarium=trace". `RUST_LOG`
    /// wins over this.
    pub log_level: String,
    pub show_hud: bool,
    /// Draw the path of the satellite being followed.
    pub show_orbit: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Planetarium".to_string(),
            framerate_limit: Some(60),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            preset: ScenePreset::Saturn,
            asset_root: PathBuf::from("assets"),
            clock: FrameClock::Fixed,
        }
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            count: 145,
            seed: 2024,
            ranges: SwarmRanges::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            home_position: [0.0, 0.0, 5.0],
            home_look_at: [0.0, 0.0, 0.0],
            primary_offset: [0.0, 0.0, 3.0],
            satellite_offset: [0.0, 0.15, 0.6],
            transition_rate: DEFAULT_TRANSITION_RATE,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
            fovy_deg: 75.0,
            znear: 0.01,
            zfar: 1000.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_hud: true,
            show_orbit: true,
        }
    }
}

impl CameraConfig {
    pub fn rig_settings(&self) -> RigSettings {
        RigSettings {
            transition_rate: self.transition_rate,
            snap_epsilon: self.snap_epsilon,
            home_position: Point3::from(self.home_position),
            home_look_at: Point3::from(self.home_look_at),
            fovy: self.fovy_deg.to_radians(),
            znear: self.znear,
            zfar: self.zfar,
        }
    }

    pub fn offsets(&self) -> FocusOffsets {
        FocusOffsets {
            primary: Vector3::from(self.primary_offset),
            satellite: Vector3::from(self.satellite_offset),
        }
    }
}

impl WindowConfig {
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

// --- Load / Save / Validate ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at the requested path.
    Defaults,
}

impl Config {
    /// Loads the config at `path`, falling back to defaults if there's no
    /// file there. Either way the result is validated.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_source(path).map(|(config, _)| config)
    }

    /// Like [`Config::load_or_default`], but also says where the settings
    /// came from. Nothing is logged here, since this usually runs before
    /// logging is set up; callers report the source once it is.
    pub fn load_with_source(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        let (config, source) = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            (config, ConfigSource::File(path.to_owned()))
        } else {
            (Config::default(), ConfigSource::Defaults)
        };
        config.validate()?;
        Ok((config, source))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(ConfigError::WriteError)?;
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Catches everything that would otherwise fail during scene setup.
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure(self.window.width > 0 && self.window.height > 0, || {
            format!(
                "window must have a size, got {}x{}",
                self.window.width, self.window.height
            )
        })?;
        self.swarm.ranges.validate()?;
        self.camera.rig_settings().validate()?;
        let finite = |v: &[f64; 3]| v.iter().all(|x| x.is_finite());
        ensure(
            finite(&self.camera.home_position)
                && finite(&self.camera.home_look_at)
                && finite(&self.camera.primary_offset)
                && finite(&self.camera.satellite_offset),
            || "camera positions and offsets must be finite".to_string(),
        )
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
        assert!(ron_str.contains("count: 145"));
        assert!(ron_str.contains("preset: Saturn"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = ron::from_str("(swarm: (count: 12))").unwrap();
        assert_eq!(config.swarm.count, 12);
        assert_eq!(config.swarm.seed, SwarmConfig::default().seed);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_preset_and_clock_parse() {
        let config: Config =
            ron::from_str("(scene: (preset: Earth, clock: Measured))").unwrap();
        assert_eq!(config.scene.preset, ScenePreset::Earth);
        assert_eq!(config.scene.clock, FrameClock::Measured);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("planetarium.ron");

        let mut config = Config::default();
        config.swarm.seed = 77;
        config.camera.transition_rate = 0.2;
        config.save(&path).unwrap();

        let loaded = Config::load_or_default(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_or_default(&dir.path().join("nope.ron")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_reports_source() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("nope.ron");
        let (config, source) = Config::load_with_source(&missing).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(source, ConfigSource::Defaults);

        let present = dir.path().join("planetarium.ron");
        std::fs::write(&present, "(swarm: (count: 3))").unwrap();
        let (config, source) = Config::load_with_source(&present).unwrap();
        assert_eq!(config.swarm.count, 3);
        assert_eq!(source, ConfigSource::File(present));
    }

    #[test]
    fn test_invalid_files_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let garbage = dir.path().join("garbage.ron");
        std::fs::write(&garbage, "{{not valid}}").unwrap();
        assert!(matches!(
            Config::load_or_default(&garbage),
            Err(ConfigError::ParseError(_))
        ));

        let bad_rate = dir.path().join("bad_rate.ron");
        std::fs::write(&bad_rate, "(camera: (transition_rate: 0.0))").unwrap();
        assert!(matches!(
            Config::load_or_default(&bad_rate),
            Err(ConfigError::Invalid(SceneError::Configuration(_)))
        ));
    }

    #[test]
    fn test_validate_window() {
        let mut config = Config::default();
        config.window.height = 0;
        assert!(config.validate().is_err());
    }
}
