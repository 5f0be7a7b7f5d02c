use nalgebra::{Point3, Vector3};

use super::body::BodyID;
use crate::error::{ensure, SceneError};
use crate::math::approach::step_fraction;

pub const DEFAULT_TRANSITION_RATE: f64 = 0.05;
pub const DEFAULT_SNAP_EPSILON: f64 = 1e-3;

/// Which body, if any, the target is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowMode {
    /// Target stays where the last focus request put it.
    Fixed,
    FollowPrimary,
    FollowSatellite(BodyID),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigState {
    Idle,
    Transitioning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigSettings {
    /// Fraction of the remaining gap closed per tick, in (0, 1].
    pub transition_rate: f64,
    /// Below this distance a transition snaps onto its target.
    pub snap_epsilon: f64,
    /// Where the camera sits, and looks, when not focused on anything.
    pub home_position: Point3<f64>,
    pub home_look_at: Point3<f64>,
    pub fovy: f64,
    pub znear: f64,
    pub zfar: f64,
}

impl Default for RigSettings {
    fn default() -> Self {
        RigSettings {
            transition_rate: DEFAULT_TRANSITION_RATE,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
            home_position: Point3::new(0.0, 0.0, 5.0),
            home_look_at: Point3::origin(),
            fovy: 75.0_f64.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

impl RigSettings {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure(
            self.transition_rate > 0.0 && self.transition_rate <= 1.0,
            || format!("transition rate must be in (0, 1], got {}", self.transition_rate),
        )?;
        ensure(self.snap_epsilon > 0.0, || {
            format!("snap epsilon must be positive, got {}", self.snap_epsilon)
        })?;
        ensure(
            self.fovy > 0.0 && self.fovy < std::f64::consts::PI,
            || format!("vertical fov must be in (0, pi), got {}", self.fovy),
        )?;
        ensure(self.znear > 0.0 && self.znear < self.zfar, || {
            format!(
                "clip planes must satisfy 0 < znear < zfar, got ({}, {})",
                self.znear, self.zfar
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f64,
    pub fovy: f64,
    pub znear: f64,
    pub zfar: f64,
}

/// Everything a renderer needs to place the camera for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Point3<f64>,
    pub look_at: Point3<f64>,
    pub up: Vector3<f64>,
    pub projection: Projection,
}

/// Camera position and the machinery that eases it between focus targets.
///
/// Only focus requests write the target, with one exception: in a follow
/// mode the target is re-pinned to the anchor every frame. Only `advance`
/// moves the camera itself, and while transitioning it closes a fixed
/// fraction of the remaining gap per tick, so it never overshoots and never
/// jumps.
#[derive(Debug, Clone)]
pub struct CameraRig {
    settings: RigSettings,
    projection: Projection,
    // -- position --
    current_position: Point3<f64>,
    target_position: Point3<f64>,
    current_look_at: Point3<f64>,
    target_look_at: Point3<f64>,
    // -- focus --
    follow_mode: FollowMode,
    offset: Vector3<f64>,
    last_anchor: Option<Point3<f64>>,
    state: RigState,
}

impl CameraRig {
    pub fn new(settings: RigSettings, aspect: f64) -> Result<Self, SceneError> {
        settings.validate()?;
        ensure(aspect.is_finite() && aspect > 0.0, || {
            format!("aspect ratio must be positive, got {}", aspect)
        })?;

        Ok(CameraRig {
            settings,
            projection: Projection {
                aspect,
                fovy: settings.fovy,
                znear: settings.znear,
                zfar: settings.zfar,
            },
            current_position: settings.home_position,
            target_position: settings.home_position,
            current_look_at: settings.home_look_at,
            target_look_at: settings.home_look_at,
            follow_mode: FollowMode::Fixed,
            offset: Vector3::zeros(),
            last_anchor: None,
            state: RigState::Idle,
        })
    }

    /// Starts (or redirects) a transition to `anchor + offset`, looking at
    /// `anchor`. A transition already in flight just gets a new target; it
    /// carries on from wherever the camera is now.
    pub fn focus_on(&mut self, anchor: Point3<f64>, offset: Vector3<f64>, follow: FollowMode) {
        self.offset = offset;
        self.follow_mode = follow;
        self.target_position = anchor + offset;
        self.target_look_at = anchor;
        self.last_anchor = match follow {
            FollowMode::Fixed => None,
            _ => Some(anchor),
        };
        self.state = RigState::Transitioning;
    }

    /// Drops any follow mode and heads back to the home point.
    pub fn focus_out(&mut self) {
        self.follow_mode = FollowMode::Fixed;
        self.offset = Vector3::zeros();
        self.last_anchor = None;
        self.target_position = self.settings.home_position;
        self.target_look_at = self.settings.home_look_at;
        self.state = RigState::Transitioning;
    }

    /// Advances the camera by `dt` ticks. `anchor` is the live position of
    /// whatever `follow_mode` points at, and is ignored in `Fixed` mode.
    pub fn advance(&mut self, dt: f64, anchor: Option<Point3<f64>>) {
        if self.follow_mode != FollowMode::Fixed {
            if let Some(anchor) = anchor {
                // Carry the camera along with the anchor; the easing below only
                // closes the gap relative to it.
                if let Some(last) = self.last_anchor {
                    let shift = anchor - last;
                    self.current_position += shift;
                    self.current_look_at += shift;
                }
                self.last_anchor = Some(anchor);
                self.target_position = anchor + self.offset;
                self.target_look_at = anchor;
            }
        }

        match self.state {
            RigState::Transitioning => {
                let fraction = step_fraction(self.settings.transition_rate, dt);
                self.current_position += (self.target_position - self.current_position) * fraction;
                self.current_look_at += (self.target_look_at - self.current_look_at) * fraction;

                if self.remaining_distance() < self.settings.snap_epsilon {
                    self.current_position = self.target_position;
                    self.current_look_at = self.target_look_at;
                    self.state = RigState::Idle;
                    tracing::debug!(follow = ?self.follow_mode, "camera transition finished");
                }
            }
            RigState::Idle => {
                // Ride along with the anchor
                if self.follow_mode != FollowMode::Fixed {
                    self.current_position = self.target_position;
                    self.current_look_at = self.target_look_at;
                }
            }
        }
    }

    /// Only the projection changes; position and state are left alone.
    pub fn resize(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.projection.aspect = aspect;
        }
    }

    fn remaining_distance(&self) -> f64 {
        let eye_gap = (self.target_position - self.current_position).norm();
        let look_gap = (self.target_look_at - self.current_look_at).norm();
        eye_gap.max(look_gap)
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.current_position,
            look_at: self.current_look_at,
            up: Vector3::y(),
            projection: self.projection,
        }
    }

    pub fn state(&self) -> RigState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        self.state == RigState::Transitioning
    }

    pub fn follow_mode(&self) -> FollowMode {
        self.follow_mode
    }

    pub fn current_position(&self) -> Point3<f64> {
        self.current_position
    }

    pub fn target_position(&self) -> Point3<f64> {
        self.target_position
    }

    pub fn look_at(&self) -> Point3<f64> {
        self.current_look_at
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn settings(&self) -> &RigSettings {
        &self.settings
    }
}
