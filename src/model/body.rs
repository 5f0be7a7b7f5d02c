use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{ensure, SceneError};
use crate::math::geometry::{inclined_circle_point, wrap_angle};

/// Stable index of a satellite in its registry.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

/// Everything needed to build an orbiting body. Speeds are in radians per
/// tick, angles in radians, except for the inclination which is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    pub orbit_radius: f64,
    pub orbit_speed: f64,
    pub inclination_deg: f64,
    pub start_angle: f64,
    pub size: f64,
}

/// One body on a fixed-inclination circular orbit around the primary.
///
/// This isn't a physical orbit: the phase grows linearly with time and the
/// position is read straight off an inclined circle, so the path is closed
/// with period `2pi / orbit_speed` ticks.
#[derive(Debug, Clone)]
pub struct OrbitingBody {
    id: BodyID,
    orbit_radius: f64,
    orbit_speed: f64,
    inclination_deg: f64,
    size: f64,
    // -- mutated once per frame --
    angle: f64,
    position: Point3<f64>,
}

impl OrbitParams {
    pub fn validate(&self) -> Result<(), SceneError> {
        let OrbitParams {
            orbit_radius,
            orbit_speed,
            inclination_deg,
            start_angle,
            size,
        } = *self;

        ensure(orbit_radius.is_finite() && orbit_radius > 0.0, || {
            format!("orbit radius must be positive, got {}", orbit_radius)
        })?;
        ensure(size.is_finite() && size > 0.0, || {
            format!("body size must be positive, got {}", size)
        })?;
        // Speed and inclination may be anything, as long as it's a number
        ensure(
            orbit_speed.is_finite() && inclination_deg.is_finite() && start_angle.is_finite(),
            || format!("orbit parameters must be finite, got {:?}", self),
        )
    }
}

impl OrbitingBody {
    pub fn new(id: BodyID, params: OrbitParams) -> Result<Self, SceneError> {
        params.validate()?;

        let mut body = OrbitingBody {
            id,
            orbit_radius: params.orbit_radius,
            orbit_speed: params.orbit_speed,
            inclination_deg: params.inclination_deg,
            size: params.size,
            angle: params.start_angle,
            position: Point3::origin(),
        };
        body.recompute_position();
        Ok(body)
    }

    /// Moves the body `dt` ticks along its orbit and returns where it ends up.
    pub fn advance(&mut self, dt: f64) -> Point3<f64> {
        self.angle += self.orbit_speed * dt;
        self.recompute_position();
        self.position
    }

    fn recompute_position(&mut self) {
        self.position = inclined_circle_point(
            self.angle,
            self.orbit_radius,
            self.inclination_deg.to_radians(),
        );
    }

    pub fn id(&self) -> BodyID {
        self.id
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    /// Accumulated orbital phase. Not wrapped, so it keeps growing.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Orbital phase in [0, 2pi).
    pub fn phase(&self) -> f64 {
        wrap_angle(self.angle)
    }

    pub fn orbit_radius(&self) -> f64 {
        self.orbit_radius
    }

    pub fn orbit_speed(&self) -> f64 {
        self.orbit_speed
    }

    pub fn inclination_deg(&self) -> f64 {
        self.inclination_deg
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Ticks per revolution, or `None` for a body that doesn't move.
    pub fn period(&self) -> Option<f64> {
        if self.orbit_speed == 0.0 {
            None
        } else {
            Some(std::f64::consts::TAU / self.orbit_speed.abs())
        }
    }

    pub fn params(&self) -> OrbitParams {
        OrbitParams {
            orbit_radius: self.orbit_radius,
            orbit_speed: self.orbit_speed,
            inclination_deg: self.inclination_deg,
            start_angle: self.angle,
            size: self.size,
        }
    }
}
