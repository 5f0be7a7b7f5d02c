//! A backend that draws nothing and remembers everything it was told. Used
//! for reports and tests.

use std::path::{Path, PathBuf};

use nalgebra::{Point3, UnitQuaternion};

use super::camera_rig::CameraPose;
use super::scene::{AssetLoader, Geometry, Material, MeshHandle, RenderBackend, TextureHandle};

#[derive(Debug, Clone)]
struct MeshRecord {
    geometry: Geometry,
    material: Material,
    position: Option<Point3<f64>>,
    orientation: Option<UnitQuaternion<f64>>,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    meshes: Vec<MeshRecord>,
    last_pose: Option<CameraPose>,
    frames_submitted: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn geometry(&self, mesh: MeshHandle) -> Option<Geometry> {
        self.meshes.get(mesh.0).map(|m| m.geometry)
    }

    pub fn material(&self, mesh: MeshHandle) -> Option<&Material> {
        self.meshes.get(mesh.0).map(|m| &m.material)
    }

    pub fn position(&self, mesh: MeshHandle) -> Option<Point3<f64>> {
        self.meshes.get(mesh.0).and_then(|m| m.position)
    }

    pub fn orientation(&self, mesh: MeshHandle) -> Option<UnitQuaternion<f64>> {
        self.meshes.get(mesh.0).and_then(|m| m.orientation)
    }

    pub fn last_pose(&self) -> Option<&CameraPose> {
        self.last_pose.as_ref()
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_mesh(&mut self, geometry: &Geometry, material: &Material) -> MeshHandle {
        self.meshes.push(MeshRecord {
            geometry: *geometry,
            material: material.clone(),
            position: None,
            orientation: None,
        });
        MeshHandle(self.meshes.len() - 1)
    }

    fn set_position(&mut self, mesh: MeshHandle, position: &Point3<f64>) {
        if let Some(record) = self.meshes.get_mut(mesh.0) {
            record.position = Some(*position);
        }
    }

    fn set_orientation(&mut self, mesh: MeshHandle, orientation: &UnitQuaternion<f64>) {
        if let Some(record) = self.meshes.get_mut(mesh.0) {
            record.orientation = Some(*orientation);
        }
    }

    fn submit_frame(&mut self, camera: &CameraPose) {
        self.last_pose = Some(*camera);
        self.frames_submitted += 1;
    }
}

/// Loader that never finds anything, but keeps track of what was asked for.
#[derive(Debug, Default)]
pub struct MissingAssets {
    requests: Vec<PathBuf>,
}

impl MissingAssets {
    pub fn requests(&self) -> &[PathBuf] {
        &self.requests
    }
}

impl AssetLoader for MissingAssets {
    fn load_texture(&mut self, path: &Path) -> Option<TextureHandle> {
        self.requests.push(path.to_owned());
        None
    }
}
