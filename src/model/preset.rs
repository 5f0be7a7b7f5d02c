use std::f64::consts::PI;
use std::path::PathBuf;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use super::body::OrbitParams;
use super::registry::{BodyRegistry, PrimaryBody, RingParams};
use super::sampler::SwarmSampler;
use super::scene::{Appearance, SceneLooks, SceneSetup};
use crate::config::Config;
use crate::error::SceneError;

/// The scenes we know how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ScenePreset {
    /// Ringed planet with a randomized swarm of small moons.
    Saturn,
    /// Planet with a single large moon on a fixed orbit.
    Earth,
}

const SATURN_RADIUS: f64 = 1.0;
const SATURN_TILT_DEG: f64 = 8.0;
const SATURN_RING: RingParams = RingParams {
    inner_radius: 1.4,
    outer_radius: 2.5,
    spin_speed: 0.001,
    base_rotation: [PI / 1.9, PI * 1.05, 0.0],
};

const EARTH_RADIUS: f64 = 1.0;
const EARTH_TILT_DEG: f64 = 23.44;
const EARTH_MOON: OrbitParams = OrbitParams {
    orbit_radius: 10.0,
    orbit_speed: 0.001,
    inclination_deg: 5.0,
    start_angle: 0.0,
    size: 0.27,
};

fn look(color: (f32, f32, f32), texture: &str) -> Appearance {
    Appearance {
        color: Point3::new(color.0, color.1, color.2),
        texture: Some(PathBuf::from(texture)),
    }
}

fn moon_look() -> Appearance {
    look((0.7, 0.7, 0.7), "earth/moon/moonmap2k.jpg")
}

impl ScenePreset {
    pub fn build(self, config: &Config) -> Result<SceneSetup, SceneError> {
        let offsets = config.camera.offsets();
        match self {
            ScenePreset::Saturn => {
                let primary =
                    PrimaryBody::new(SATURN_RADIUS, SATURN_TILT_DEG)?.with_ring(SATURN_RING)?;
                let mut sampler = SwarmSampler::new(config.swarm.seed, config.swarm.ranges);
                let registry = BodyRegistry::populate(primary, config.swarm.count, &mut sampler)?;

                Ok(SceneSetup {
                    registry,
                    looks: SceneLooks {
                        primary: look((0.89, 0.79, 0.6), "saturn/saturnmap.jpg"),
                        ring: Some(look((0.8, 0.74, 0.62), "saturn/saturnringcolor.png")),
                        satellite: moon_look(),
                    },
                    offsets,
                })
            }
            ScenePreset::Earth => {
                let primary = PrimaryBody::new(EARTH_RADIUS, EARTH_TILT_DEG)?;
                let registry = BodyRegistry::from_params(primary, vec![EARTH_MOON])?;

                Ok(SceneSetup {
                    registry,
                    looks: SceneLooks {
                        primary: look((0.25, 0.45, 0.8), "earth/earthmap1k.jpg"),
                        ring: None,
                        satellite: moon_look(),
                    },
                    offsets,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BodyID;

    #[test]
    fn test_saturn_preset() {
        let config = Config::default();
        let setup = ScenePreset::Saturn.build(&config).unwrap();
        assert_eq!(setup.registry.len(), 145);
        assert!(setup.registry.primary().ring().is_some());
        assert!(setup.looks.ring.is_some());
    }

    #[test]
    fn test_saturn_preset_respects_swarm_config() {
        let mut config = Config::default();
        config.swarm.count = 3;
        let a = ScenePreset::Saturn.build(&config).unwrap();
        let b = ScenePreset::Saturn.build(&config).unwrap();
        assert_eq!(a.registry.len(), 3);
        for (x, y) in a.registry.satellites().zip(b.registry.satellites()) {
            assert_eq!(x.params(), y.params());
        }
    }

    #[test]
    fn test_earth_preset() {
        let setup = ScenePreset::Earth.build(&Config::default()).unwrap();
        assert_eq!(setup.registry.len(), 1);
        assert!(setup.registry.primary().ring().is_none());

        let moon = setup.registry.get(BodyID(0)).unwrap();
        assert_eq!(moon.params(), EARTH_MOON);
        assert_eq!(moon.position(), Point3::new(10.0, 0.0, 0.0));
    }
}
