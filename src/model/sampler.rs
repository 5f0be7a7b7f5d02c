use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use std::f64::consts::TAU;

use super::body::OrbitParams;
use crate::error::{ensure, SceneError};

/// Source of orbital parameters for a freshly populated registry.
pub trait ParameterSampler {
    fn sample(&mut self) -> OrbitParams;
}

impl<F> ParameterSampler for F
where
    F: FnMut() -> OrbitParams,
{
    fn sample(&mut self) -> OrbitParams {
        self()
    }
}

/// Half-open interval `[min, max)` to draw a value from. `min == max` pins
/// the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Span { min, max }
    }

    pub fn validate(&self, what: &str) -> Result<(), SceneError> {
        ensure(
            self.min.is_finite() && self.max.is_finite() && self.min <= self.max,
            || format!("{} span is invalid: {:?}", what, self),
        )
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        self.min + rng.random::<f64>() * (self.max - self.min)
    }
}

/// Ranges for a randomized satellite swarm.
///
/// `height` is sampled as a vertical offset but ends up used as the orbital
/// inclination in degrees. The resulting tilts are small (a few degrees
/// either way), which looks right for a ring system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwarmRanges {
    pub orbit_radius: Span,
    pub orbit_speed: Span,
    pub height: Span,
    pub size: Span,
}

impl Default for SwarmRanges {
    fn default() -> Self {
        SwarmRanges {
            orbit_radius: Span::new(3.0, 8.0),
            orbit_speed: Span::new(0.001, 0.003),
            height: Span::new(-5.0, 5.0),
            size: Span::new(0.001, 0.05),
        }
    }
}

impl SwarmRanges {
    pub fn validate(&self) -> Result<(), SceneError> {
        self.orbit_radius.validate("orbit radius")?;
        self.orbit_speed.validate("orbit speed")?;
        self.height.validate("height")?;
        self.size.validate("size")?;
        ensure(self.orbit_radius.min > 0.0, || {
            format!("orbit radius span must be positive, got {:?}", self.orbit_radius)
        })?;
        ensure(self.size.min > 0.0, || {
            format!("size span must be positive, got {:?}", self.size)
        })
    }
}

/// Deterministic sampler for the satellite swarm: the same seed always yields
/// the same sequence of parameters.
pub struct SwarmSampler {
    rng: ChaCha8Rng,
    ranges: SwarmRanges,
}

impl SwarmSampler {
    pub fn new(seed: u64, ranges: SwarmRanges) -> Self {
        SwarmSampler {
            rng: ChaCha8Rng::seed_from_u64(seed),
            ranges,
        }
    }
}

impl ParameterSampler for SwarmSampler {
    fn sample(&mut self) -> OrbitParams {
        let ranges = &self.ranges;
        let rng = &mut self.rng;

        // Draw order is part of the seed contract; don't reorder.
        let orbit_radius = ranges.orbit_radius.sample(rng);
        let orbit_speed = ranges.orbit_speed.sample(rng);
        let height = ranges.height.sample(rng);
        let size = ranges.size.sample(rng);
        let start_angle = rng.random::<f64>() * TAU;

        OrbitParams {
            orbit_radius,
            orbit_speed,
            inclination_deg: height,
            start_angle,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_swarm() {
        let mut a = SwarmSampler::new(42, SwarmRanges::default());
        let mut b = SwarmSampler::new(42, SwarmRanges::default());
        for _ in 0..20 {
            assert_eq!(a.sample(), b.sample());
        }

        let mut c = SwarmSampler::new(43, SwarmRanges::default());
        let mut a = SwarmSampler::new(42, SwarmRanges::default());
        assert_ne!(a.sample(), c.sample());
    }

    #[test]
    fn test_samples_stay_in_range() {
        let ranges = SwarmRanges::default();
        let mut sampler = SwarmSampler::new(7, ranges);
        for _ in 0..500 {
            let p = sampler.sample();
            assert!(p.orbit_radius >= 3.0 && p.orbit_radius < 8.0);
            assert!(p.orbit_speed >= 0.001 && p.orbit_speed < 0.003);
            assert!(p.inclination_deg >= -5.0 && p.inclination_deg < 5.0);
            assert!(p.size >= 0.001 && p.size < 0.05);
            assert!(p.start_angle >= 0.0 && p.start_angle < TAU);
            assert!(p.validate().is_ok());
        }
    }

    #[test]
    fn test_pinned_span() {
        let ranges = SwarmRanges {
            orbit_radius: Span::new(4.0, 4.0),
            ..SwarmRanges::default()
        };
        let mut sampler = SwarmSampler::new(1, ranges);
        assert_eq!(sampler.sample().orbit_radius, 4.0);
    }

    #[test]
    fn test_invalid_ranges() {
        let backwards = SwarmRanges {
            orbit_speed: Span::new(0.5, 0.1),
            ..SwarmRanges::default()
        };
        assert!(backwards.validate().is_err());

        let zero_size = SwarmRanges {
            size: Span::new(0.0, 0.05),
            ..SwarmRanges::default()
        };
        assert!(zero_size.validate().is_err());

        assert!(SwarmRanges::default().validate().is_ok());
    }

    #[test]
    fn test_closure_sampler() {
        let mut n = 0.0;
        let mut sampler = || {
            n += 1.0;
            OrbitParams {
                orbit_radius: n,
                orbit_speed: 0.01,
                inclination_deg: 0.0,
                start_angle: 0.0,
                size: 0.1,
            }
        };
        assert_eq!(ParameterSampler::sample(&mut sampler).orbit_radius, 1.0);
        assert_eq!(ParameterSampler::sample(&mut sampler).orbit_radius, 2.0);
    }
}
