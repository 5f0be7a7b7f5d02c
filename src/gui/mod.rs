use std::path::Path;

use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::text::Font;
use kiss3d::window::{State, Window};
use nalgebra::{Point2, Point3};

use self::backend::{Kiss3dBackend, Kiss3dTextures};
use self::controller::{Controller, FocusPoint};
use self::renderers::OverlayRenderer;
use crate::config::{Config, FrameClock};
use crate::error::SceneError;
use crate::model::{CameraRig, FollowMode, SceneCoordinator};

mod backend;
mod camera;
mod controller;
mod renderers;
mod ring;

const ORBIT_COLOR: (f32, f32, f32) = (0.9, 0.8, 0.3);
const AXIS_COLOR: (f32, f32, f32) = (0.4, 0.6, 1.0);
const TEXT_COLOR: (f32, f32, f32) = (1.0, 1.0, 1.0);
// Wide enough for the time summary at text scale 50, in text units
const RIGHT_COLUMN_WIDTH: f32 = 520.0;

pub struct Planetarium {
    scene: SceneCoordinator<Kiss3dBackend>,
    controller: Controller,
    overlay: OverlayRenderer,
    clock: FrameClock,
}

impl Planetarium {
    pub fn new(config: &Config, window: &mut Window) -> Result<Self, SceneError> {
        let setup = config.scene.preset.build(config)?;
        let rig = CameraRig::new(config.camera.rig_settings(), config.window.aspect())?;
        let backend = Kiss3dBackend::new(window, &rig.pose());
        let scene = SceneCoordinator::new(
            setup,
            rig,
            backend,
            &mut Kiss3dTextures,
            Path::new(&config.scene.asset_root),
        );

        let controller = Controller::new(
            scene.registry().len(),
            config.debug.show_orbit,
            config.debug.show_hud,
        );

        Ok(Planetarium {
            scene,
            controller,
            overlay: OverlayRenderer::new(),
            clock: config.scene.clock,
        })
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller.process_event(event, &mut self.scene);
        }
    }

    fn draw_overlays(&mut self) {
        let primary = self.scene.registry().primary();
        let axis_color = Point3::new(AXIS_COLOR.0, AXIS_COLOR.1, AXIS_COLOR.2);
        self.overlay.draw_axis(
            primary.position(),
            primary.orientation(),
            primary.radius * 1.5,
            axis_color,
        );

        // Only the orbit being followed; 145 of them is just noise
        if let FollowMode::FollowSatellite(id) = self.scene.rig().follow_mode() {
            if let Ok(body) = self.scene.registry().get(id) {
                let color = Point3::new(ORBIT_COLOR.0, ORBIT_COLOR.1, ORBIT_COLOR.2);
                self.overlay.draw_orbit(body, color);
            }
        }
    }

    fn draw_hud(&self, window: &mut Window) {
        let font = Font::default();
        let color = Point3::new(TEXT_COLOR.0, TEXT_COLOR.1, TEXT_COLOR.2);
        window.draw_text(
            &self.left_hand_text(),
            &Point2::origin(),
            50.0,
            &font,
            &color,
        );
        window.draw_text(
            &self.time_summary_text(),
            &right_column_origin(window.width()),
            50.0,
            &font,
            &color,
        );
    }

    fn left_hand_text(&self) -> String {
        let rig = self.scene.rig();
        let focus = match self.controller.focus_point() {
            FocusPoint::Primary => "Primary".to_string(),
            FocusPoint::Satellite(id) => format!("Satellite {}", id.0),
        };
        let following = match rig.follow_mode() {
            FollowMode::Fixed => "nothing".to_string(),
            FollowMode::FollowPrimary => "primary".to_string(),
            FollowMode::FollowSatellite(id) => {
                let body = self.scene.registry().get(id);
                match body {
                    Ok(body) => format!(
                        "satellite {} (r = {:.2}, i = {:.1} deg)",
                        id.0,
                        body.orbit_radius(),
                        body.inclination_deg()
                    ),
                    Err(_) => format!("satellite {}", id.0),
                }
            }
        };
        let eye = rig.current_position();
        format!(
            "Focus: {}\nFollowing: {}\nCamera: {:?}\nEye: ({:.2}, {:.2}, {:.2})\nSatellites: {}",
            focus,
            following,
            rig.state(),
            eye.x,
            eye.y,
            eye.z,
            self.scene.registry().len(),
        )
    }

    fn time_summary_text(&self) -> String {
        let paused = if self.controller.is_paused() {
            " (paused)"
        } else {
            ""
        };
        format!(
            "Ticks: {:.0}\nSpeed: {}x{}\nFPS: {:.0}",
            self.scene.elapsed_ticks(),
            self.controller.time_scale(),
            paused,
            self.controller.fps(),
        )
    }
}

impl State for Planetarium {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (
            Some(self.scene.backend_mut().camera_mut()),
            None,
            Some(&mut self.overlay),
            None,
        )
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());

        let frame_seconds = self.controller.tick_frame_timer();
        let dt = match self.clock {
            FrameClock::Fixed => None,
            FrameClock::Measured => Some(frame_seconds),
        };
        self.scene
            .set_time_scale(self.controller.effective_time_scale());
        self.scene.frame(dt);

        if self.controller.show_orbit {
            self.draw_overlays();
        }
        if self.controller.show_hud {
            self.draw_hud(window);
        }
    }
}

/// Top-left corner of the right-hand text column. kiss3d's text shader maps
/// x in `[0, 2 * width]` across the framebuffer, whatever the display's
/// scale factor, so text units are half a pixel wide.
fn right_column_origin(framebuffer_width: u32) -> Point2<f32> {
    let text_width = framebuffer_width as f32 * 2.0;
    Point2::new((text_width - RIGHT_COLUMN_WIDTH).max(0.0), 0.0)
}
