use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

use crate::model::CameraPose;

// Unlike ArcBall and friends, this camera has no opinions of its own. It
// doesn't react to the mouse or keyboard; it just shows whatever pose the
// rig submitted last. Window resizes reach it through the rig too, since the
// rig owns the projection.
pub struct RigCamera {
    // -- position --
    eye: Point3<f32>,
    look_at: Point3<f32>,
    up: Vector3<f32>,
    // -- perspective --
    aspect: f32,
    fovy: f32,
    znear: f32,
    zfar: f32,
}

impl RigCamera {
    pub fn new(pose: &CameraPose) -> Self {
        let mut camera = RigCamera {
            eye: Point3::origin(),
            look_at: Point3::origin(),
            up: Vector3::y(),
            aspect: 1.0,
            fovy: 1.0,
            znear: 0.1,
            zfar: 1000.0,
        };
        camera.set_pose(pose);
        camera
    }

    pub fn set_pose(&mut self, pose: &CameraPose) {
        self.eye = nalgebra::convert(pose.eye);
        self.look_at = nalgebra::convert(pose.look_at);
        self.up = nalgebra::convert(pose.up);
        self.aspect = pose.projection.aspect as f32;
        self.fovy = pose.projection.fovy as f32;
        self.znear = pose.projection.znear as f32;
        self.zfar = pose.projection.zfar as f32;
    }

    pub fn distance(&self) -> f32 {
        (self.look_at - self.eye).norm()
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect, self.fovy, self.znear, self.zfar)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }
}

impl Camera for RigCamera {
    fn handle_event(&mut self, _canvas: &Canvas, _event: &WindowEvent) {}

    fn eye(&self) -> Point3<f32> {
        self.eye
    }

    fn view_transform(&self) -> Isometry3<f32> {
        // look_at_rh is undefined when the target sits on the eye
        let target = if self.distance() > f32::EPSILON {
            self.look_at
        } else {
            self.eye - Vector3::z()
        };
        Isometry3::look_at_rh(&self.eye, &target, &self.up)
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}
