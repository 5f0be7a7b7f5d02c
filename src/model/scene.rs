use std::collections::HashMap;
use std::path::{Path, PathBuf};

use nalgebra::{Point3, UnitQuaternion, Vector3};

use super::body::BodyID;
use super::camera_rig::{CameraPose, CameraRig, FollowMode};
use super::registry::BodyRegistry;
use crate::error::SceneError;

/// Wall-clock length of one tick. Orbit and spin speeds are tuned per tick,
/// and a tick is nominally one frame at 60 Hz.
pub const NOMINAL_TICK_SECONDS: f64 = 1.0 / 60.0;

/// Longest frame we're willing to simulate in one go, in ticks. Stalls
/// (window drags, breakpoints) get clamped to this.
pub const MAX_FRAME_TICKS: f64 = 15.0;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct MeshHandle(pub usize);

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct TextureHandle(pub String);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Sphere { radius: f64 },
    /// Flat annulus in the local xy plane, facing +z.
    Ring { inner_radius: f64, outer_radius: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Point3<f32>,
    /// Absent when the texture couldn't be loaded; the mesh still draws in
    /// `color`.
    pub texture: Option<TextureHandle>,
}

/// What the coordinator needs from whatever draws the scene.
pub trait RenderBackend {
    fn create_mesh(&mut self, geometry: &Geometry, material: &Material) -> MeshHandle;
    fn set_position(&mut self, mesh: MeshHandle, position: &Point3<f64>);
    fn set_orientation(&mut self, mesh: MeshHandle, orientation: &UnitQuaternion<f64>);
    fn submit_frame(&mut self, camera: &CameraPose);
}

pub trait AssetLoader {
    /// Returns `None` if the texture can't be had. That's never fatal.
    fn load_texture(&mut self, path: &Path) -> Option<TextureHandle>;
}

/// Flat color plus an optional texture, relative to the asset root.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub color: Point3<f32>,
    pub texture: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneLooks {
    pub primary: Appearance,
    pub ring: Option<Appearance>,
    pub satellite: Appearance,
}

/// Where the camera parks relative to whatever it's focused on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusOffsets {
    pub primary: Vector3<f64>,
    pub satellite: Vector3<f64>,
}

/// Everything built at setup time, before any mesh exists.
#[derive(Debug, Clone)]
pub struct SceneSetup {
    pub registry: BodyRegistry,
    pub looks: SceneLooks,
    pub offsets: FocusOffsets,
}

/// Drives one frame at a time: bodies first, then the camera (which may be
/// following one of them), then hands everything to the backend.
pub struct SceneCoordinator<B> {
    registry: BodyRegistry,
    rig: CameraRig,
    backend: B,
    offsets: FocusOffsets,
    // -- meshes, satellites indexed by BodyID --
    primary_mesh: MeshHandle,
    ring_mesh: Option<MeshHandle>,
    satellite_meshes: Vec<MeshHandle>,
    // -- clock --
    time_scale: f64,
    elapsed_ticks: f64,
    frame_count: u64,
}

/// Resolves each distinct texture path once.
struct TextureCache<'a, L> {
    loader: &'a mut L,
    asset_root: &'a Path,
    loaded: HashMap<PathBuf, Option<TextureHandle>>,
}

impl<'a, L: AssetLoader> TextureCache<'a, L> {
    fn material(&mut self, appearance: &Appearance) -> Material {
        let texture = appearance.texture.as_ref().and_then(|relative| {
            let path = self.asset_root.join(relative);
            let loader = &mut *self.loader;
            self.loaded
                .entry(path)
                .or_insert_with_key(|path| {
                    let handle = loader.load_texture(path);
                    if handle.is_none() {
                        tracing::warn!(path = %path.display(), "texture unavailable, using flat color");
                    }
                    handle
                })
                .clone()
        });

        Material {
            color: appearance.color,
            texture,
        }
    }
}

impl<B: RenderBackend> SceneCoordinator<B> {
    pub fn new<L: AssetLoader>(
        setup: SceneSetup,
        rig: CameraRig,
        mut backend: B,
        loader: &mut L,
        asset_root: &Path,
    ) -> Self {
        let SceneSetup {
            registry,
            looks,
            offsets,
        } = setup;

        let mut textures = TextureCache {
            loader,
            asset_root,
            loaded: HashMap::new(),
        };

        let primary = registry.primary();
        let primary_mesh = backend.create_mesh(
            &Geometry::Sphere {
                radius: primary.radius,
            },
            &textures.material(&looks.primary),
        );

        // A ring without its own look borrows the primary's
        let ring_mesh = primary.ring().map(|ring| {
            let look = looks.ring.as_ref().unwrap_or(&looks.primary);
            backend.create_mesh(
                &Geometry::Ring {
                    inner_radius: ring.inner_radius,
                    outer_radius: ring.outer_radius,
                },
                &textures.material(look),
            )
        });

        // All satellites share one look
        let satellite_material = textures.material(&looks.satellite);
        let satellite_meshes = registry
            .satellites()
            .map(|body| {
                backend.create_mesh(
                    &Geometry::Sphere {
                        radius: body.size(),
                    },
                    &satellite_material,
                )
            })
            .collect();

        tracing::info!(
            satellites = registry.len(),
            ring = ring_mesh.is_some(),
            "scene created"
        );

        let mut coordinator = SceneCoordinator {
            registry,
            rig,
            backend,
            offsets,
            primary_mesh,
            ring_mesh,
            satellite_meshes,
            time_scale: 1.0,
            elapsed_ticks: 0.0,
            frame_count: 0,
        };
        coordinator.sync_meshes();
        coordinator
    }

    /// Runs one frame. `dt_seconds` is the backend's frame delta; without
    /// one, the frame counts as exactly one tick.
    pub fn frame(&mut self, dt_seconds: Option<f64>) {
        let ticks = frame_ticks(dt_seconds);

        // Bodies must be up to date before the camera reads its anchor
        let body_ticks = ticks * self.time_scale;
        self.registry.advance_all(body_ticks);
        self.elapsed_ticks += body_ticks;

        let anchor = self.anchor_position();
        self.rig.advance(ticks, anchor);

        self.sync_meshes();
        self.backend.submit_frame(&self.rig.pose());
        self.frame_count += 1;
    }

    fn sync_meshes(&mut self) {
        let primary = self.registry.primary();
        self.backend
            .set_position(self.primary_mesh, &primary.position());
        self.backend
            .set_orientation(self.primary_mesh, &primary.orientation());

        if let (Some(mesh), Some(orientation)) = (self.ring_mesh, primary.ring_orientation()) {
            self.backend.set_position(mesh, &primary.position());
            self.backend.set_orientation(mesh, &orientation);
        }

        for (body, mesh) in self.registry.satellites().zip(self.satellite_meshes.iter()) {
            self.backend.set_position(*mesh, &body.position());
        }
    }

    fn anchor_position(&self) -> Option<Point3<f64>> {
        match self.rig.follow_mode() {
            FollowMode::Fixed => None,
            FollowMode::FollowPrimary => Some(self.registry.primary().position()),
            FollowMode::FollowSatellite(id) => self.registry.get(id).ok().map(|b| b.position()),
        }
    }

    pub fn focus_on_primary(&mut self) {
        let anchor = self.registry.primary().position();
        self.rig
            .focus_on(anchor, self.offsets.primary, FollowMode::FollowPrimary);
        tracing::info!("focusing on primary");
    }

    /// Fails with `OutOfRange` for an unknown id, leaving the camera as it was.
    pub fn focus_on_satellite(&mut self, id: BodyID) -> Result<(), SceneError> {
        let anchor = self.registry.get(id)?.position();
        self.rig
            .focus_on(anchor, self.offsets.satellite, FollowMode::FollowSatellite(id));
        tracing::info!(satellite = id.0, "focusing on satellite");
        Ok(())
    }

    pub fn focus_out(&mut self) {
        self.rig.focus_out();
        tracing::info!("focusing out");
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            // Minimized; keep the old aspect
            tracing::debug!(width, height, "ignoring degenerate resize");
            return;
        }
        self.rig.resize(width as f64 / height as f64);
        tracing::debug!(width, height, "viewport resized");
    }

    /// Scales simulated time for the bodies only; the camera always moves at
    /// wall speed. Zero pauses the orbits.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale >= 0.0 {
            self.time_scale = scale;
        }
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Simulated ticks so far, after time scaling.
    pub fn elapsed_ticks(&self) -> f64 {
        self.elapsed_ticks
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Mesh backing a satellite, for overlays that want to decorate it.
    pub fn satellite_mesh(&self, id: BodyID) -> Option<MeshHandle> {
        self.satellite_meshes.get(id.0).copied()
    }
}

/// Ticks covered by a frame. No delta (or a meaningless one) is one tick; a
/// clock that ran backwards is none.
fn frame_ticks(dt_seconds: Option<f64>) -> f64 {
    match dt_seconds {
        Some(seconds) if seconds.is_finite() => {
            (seconds / NOMINAL_TICK_SECONDS).clamp(0.0, MAX_FRAME_TICKS)
        }
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::model::camera_rig::{RigSettings, RigState};
    use crate::model::headless::{HeadlessBackend, MissingAssets};
    use crate::model::registry::{PrimaryBody, RingParams};
    use crate::model::OrbitParams;

    fn setup(count: usize) -> SceneSetup {
        let params = (0..count).map(|i| OrbitParams {
            orbit_radius: 3.0 + i as f64,
            orbit_speed: 0.01,
            inclination_deg: 5.0,
            start_angle: 0.0,
            size: 0.05,
        });
        let ring = RingParams {
            inner_radius: 1.4,
            outer_radius: 2.5,
            spin_speed: 0.001,
            base_rotation: [0.0; 3],
        };
        let primary = PrimaryBody::new(1.0, 8.0).unwrap().with_ring(ring).unwrap();
        let look = Appearance {
            color: Point3::new(0.5, 0.5, 0.5),
            texture: Some(PathBuf::from("moon.jpg")),
        };
        SceneSetup {
            registry: BodyRegistry::from_params(primary, params).unwrap(),
            looks: SceneLooks {
                primary: look.clone(),
                ring: Some(look.clone()),
                satellite: look,
            },
            offsets: FocusOffsets {
                primary: Vector3::new(0.0, 0.0, 3.0),
                satellite: Vector3::new(0.0, 0.1, 0.5),
            },
        }
    }

    fn coordinator(count: usize) -> SceneCoordinator<HeadlessBackend> {
        let rig = CameraRig::new(RigSettings::default(), 1.0).unwrap();
        SceneCoordinator::new(
            setup(count),
            rig,
            HeadlessBackend::new(),
            &mut MissingAssets::default(),
            Path::new("assets"),
        )
    }

    #[test]
    fn test_meshes_created_without_textures() {
        let scene = coordinator(4);
        // primary + ring + 4 satellites, all untextured but present
        assert_eq!(scene.backend().mesh_count(), 6);
        for mesh in 0..6 {
            assert_eq!(scene.backend().material(MeshHandle(mesh)).unwrap().texture, None);
        }
    }

    #[test]
    fn test_textures_loaded_once_per_path() {
        let mut loader = MissingAssets::default();
        let rig = CameraRig::new(RigSettings::default(), 1.0).unwrap();
        let _scene = SceneCoordinator::new(
            setup(10),
            rig,
            HeadlessBackend::new(),
            &mut loader,
            Path::new("assets"),
        );
        assert_eq!(loader.requests(), &[PathBuf::from("assets/moon.jpg")]);
    }

    #[test]
    fn test_frame_moves_bodies_and_submits() {
        let mut scene = coordinator(2);
        let before = scene.registry().get(BodyID(1)).unwrap().position();

        scene.frame(None);

        let after = scene.registry().get(BodyID(1)).unwrap().position();
        assert_ne!(before, after);
        assert_eq!(scene.backend().frames_submitted(), 1);
        let mesh = scene.satellite_mesh(BodyID(1)).unwrap();
        assert_eq!(scene.backend().position(mesh), Some(after));
        assert_relative_eq!(scene.elapsed_ticks(), 1.0);
    }

    #[test]
    fn test_camera_reads_same_frame_anchor() {
        let mut scene = coordinator(3);
        scene.focus_on_satellite(BodyID(2)).unwrap();

        for _ in 0..500 {
            scene.frame(None);
        }
        assert_eq!(scene.rig().state(), RigState::Idle);

        // After one more frame the camera sits on this frame's position, not
        // last frame's
        scene.frame(None);
        let body = scene.registry().get(BodyID(2)).unwrap().position();
        let pose = scene.backend().last_pose().unwrap();
        assert_eq!(pose.look_at, body);
        assert_eq!(pose.eye, body + Vector3::new(0.0, 0.1, 0.5));
    }

    #[test]
    fn test_bad_satellite_leaves_camera_alone() {
        let mut scene = coordinator(3);
        scene.frame(None);
        let before = scene.rig().clone();

        assert_eq!(
            scene.focus_on_satellite(BodyID(3)),
            Err(SceneError::OutOfRange { id: 3, count: 3 })
        );
        assert_eq!(scene.rig().state(), before.state());
        assert_eq!(scene.rig().follow_mode(), before.follow_mode());
        assert_eq!(scene.rig().target_position(), before.target_position());
        assert_eq!(scene.rig().current_position(), before.current_position());
    }

    #[test]
    fn test_frame_clock() {
        assert_eq!(frame_ticks(None), 1.0);
        assert_relative_eq!(frame_ticks(Some(NOMINAL_TICK_SECONDS * 2.0)), 2.0);
        assert_eq!(frame_ticks(Some(60.0)), MAX_FRAME_TICKS);
        assert_eq!(frame_ticks(Some(f64::NAN)), 1.0);
        assert_eq!(frame_ticks(Some(f64::INFINITY)), 1.0);
    }

    #[test]
    fn test_backwards_clock_is_zero_ticks() {
        assert_eq!(frame_ticks(Some(-1.0)), 0.0);
        assert_eq!(frame_ticks(Some(-1e-9)), 0.0);

        let mut scene = coordinator(2);
        let before = scene.registry().get(BodyID(1)).unwrap().position();
        scene.frame(Some(-0.5));
        assert_eq!(scene.registry().get(BodyID(1)).unwrap().position(), before);
        assert_eq!(scene.elapsed_ticks(), 0.0);
        assert_eq!(scene.frame_count(), 1);
    }

    #[test]
    fn test_pause_freezes_bodies_not_camera() {
        let mut scene = coordinator(1);
        scene.set_time_scale(0.0);
        scene.focus_on_primary();

        let body_before = scene.registry().get(BodyID(0)).unwrap().position();
        let eye_before = scene.rig().current_position();
        scene.frame(None);

        assert_eq!(scene.registry().get(BodyID(0)).unwrap().position(), body_before);
        assert_ne!(scene.rig().current_position(), eye_before);
    }

    #[test]
    fn test_resize() {
        let mut scene = coordinator(1);
        scene.on_resize(1920, 1080);
        assert_relative_eq!(scene.rig().projection().aspect, 1920.0 / 1080.0);

        scene.on_resize(0, 1080);
        assert_relative_eq!(scene.rig().projection().aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn test_ring_orientation_synced() {
        let mut scene = coordinator(0);
        for _ in 0..100 {
            scene.frame(None);
        }
        let ring = MeshHandle(1);
        let expected = scene.registry().primary().ring_orientation().unwrap();
        assert_eq!(scene.backend().orientation(ring), Some(expected));
    }
}
