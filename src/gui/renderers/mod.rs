use std::f64::consts::TAU;

use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Point3, UnitQuaternion, Vector3};

use self::utils::{draw_polyline, path_iter_parametric};
use crate::math::geometry::inclined_circle_point;
use crate::model::OrbitingBody;

mod utils;

const ORBIT_SEGMENTS: usize = 128;

/// Line overlays drawn over the scene: orbit paths and the primary's spin
/// axis. Everything queued is drawn (and forgotten) on the next render.
pub struct OverlayRenderer {
    line_renderer: LineRenderer,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        OverlayRenderer {
            line_renderer: LineRenderer::new(),
        }
    }

    pub fn draw_orbit(&mut self, body: &OrbitingBody, color: Point3<f32>) {
        let radius = body.orbit_radius();
        let inclination = body.inclination_deg().to_radians();
        let points = path_iter_parametric(
            |angle: f64| nalgebra::convert(inclined_circle_point(angle, radius, inclination)),
            0.0,
            TAU,
            ORBIT_SEGMENTS,
        );
        draw_polyline(&mut self.line_renderer, points, color);
    }

    /// Line through `center` along the local y axis of `orientation`,
    /// `half_length` to either side.
    pub fn draw_axis(
        &mut self,
        center: Point3<f64>,
        orientation: UnitQuaternion<f64>,
        half_length: f64,
        color: Point3<f32>,
    ) {
        let axis = orientation * Vector3::y() * half_length;
        self.line_renderer.draw_line(
            nalgebra::convert(center - axis),
            nalgebra::convert(center + axis),
            color,
        );
    }
}

impl Renderer for OverlayRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.line_renderer.render(pass, camera);
    }
}
