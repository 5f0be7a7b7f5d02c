use nalgebra::{Point3, UnitQuaternion, Vector3};

use super::body::{BodyID, OrbitParams, OrbitingBody};
use super::sampler::ParameterSampler;
use crate::error::{ensure, SceneError};
use crate::math::geometry::{euler_xyz, wrap_angle};

/// The body everything orbits. It sits at the origin and never moves; the
/// only thing that animates on it is its ring.
#[derive(Debug, Clone)]
pub struct PrimaryBody {
    pub radius: f64,
    /// Tilt of the spin axis about z, in degrees.
    pub axial_tilt_deg: f64,
    ring: Option<Ring>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParams {
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Radians per tick around the ring's own normal.
    pub spin_speed: f64,
    /// Fixed XYZ Euler rotation placing the ring around the primary.
    pub base_rotation: [f64; 3],
}

#[derive(Debug, Clone)]
struct Ring {
    params: RingParams,
    spin: f64,
}

impl PrimaryBody {
    pub fn new(radius: f64, axial_tilt_deg: f64) -> Result<Self, SceneError> {
        ensure(radius.is_finite() && radius > 0.0, || {
            format!("primary radius must be positive, got {}", radius)
        })?;
        ensure(axial_tilt_deg.is_finite(), || {
            format!("axial tilt must be finite, got {}", axial_tilt_deg)
        })?;
        Ok(PrimaryBody {
            radius,
            axial_tilt_deg,
            ring: None,
        })
    }

    pub fn with_ring(mut self, params: RingParams) -> Result<Self, SceneError> {
        ensure(
            params.inner_radius > 0.0 && params.inner_radius < params.outer_radius,
            || format!("ring radii must satisfy 0 < inner < outer, got {:?}", params),
        )?;
        ensure(
            params.spin_speed.is_finite() && params.base_rotation.iter().all(|a| a.is_finite()),
            || format!("ring parameters must be finite, got {:?}", params),
        )?;
        self.ring = Some(Ring { params, spin: 0.0 });
        Ok(self)
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::origin()
    }

    pub fn orientation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.axial_tilt_deg.to_radians())
    }

    pub fn ring(&self) -> Option<&RingParams> {
        self.ring.as_ref().map(|r| &r.params)
    }

    /// Current spin of the ring around its normal, in [0, 2pi).
    pub fn ring_spin(&self) -> Option<f64> {
        self.ring.as_ref().map(|r| r.spin)
    }

    /// Full orientation of the ring: the fixed placement, then the spin
    /// about the ring's own normal.
    pub fn ring_orientation(&self) -> Option<UnitQuaternion<f64>> {
        self.ring.as_ref().map(|r| {
            let [x, y, z] = r.params.base_rotation;
            euler_xyz(x, y, z + r.spin)
        })
    }

    fn advance(&mut self, dt: f64) {
        if let Some(ring) = self.ring.as_mut() {
            ring.spin = wrap_angle(ring.spin + ring.params.spin_speed * dt);
        }
    }
}

/// All bodies in the scene. Satellites are fixed at setup time and keep
/// their insertion order, which is also their `BodyID`.
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    primary: PrimaryBody,
    satellites: Vec<OrbitingBody>,
}

impl BodyRegistry {
    /// Builds `count` satellites, each from its own draw of `sampler`.
    pub fn populate<S: ParameterSampler>(
        primary: PrimaryBody,
        count: usize,
        sampler: &mut S,
    ) -> Result<Self, SceneError> {
        Self::from_params(primary, (0..count).map(|_| sampler.sample()))
    }

    /// Builds one satellite per parameter set, in order.
    pub fn from_params<I>(primary: PrimaryBody, params: I) -> Result<Self, SceneError>
    where
        I: IntoIterator<Item = OrbitParams>,
    {
        let satellites = params
            .into_iter()
            .enumerate()
            .map(|(idx, p)| OrbitingBody::new(BodyID(idx), p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BodyRegistry {
            primary,
            satellites,
        })
    }

    /// Advances every body by `dt` ticks. No body looks at another while
    /// doing so, so the order doesn't matter.
    pub fn advance_all(&mut self, dt: f64) {
        self.primary.advance(dt);
        for body in self.satellites.iter_mut() {
            body.advance(dt);
        }
    }

    pub fn get(&self, id: BodyID) -> Result<&OrbitingBody, SceneError> {
        self.satellites.get(id.0).ok_or(SceneError::OutOfRange {
            id: id.0,
            count: self.satellites.len(),
        })
    }

    pub fn primary(&self) -> &PrimaryBody {
        &self.primary
    }

    pub fn satellites(&self) -> impl Iterator<Item = &OrbitingBody> + '_ {
        self.satellites.iter()
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }
}
