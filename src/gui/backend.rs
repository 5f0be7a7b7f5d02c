use std::path::Path;

use image::DynamicImage;
use kiss3d::resource::TextureManager;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point3, Translation3, UnitQuaternion, Vector3};

use super::camera::RigCamera;
use super::ring::{annulus_mesh, RING_SEGMENTS};
use crate::model::scene::{
    AssetLoader, Geometry, Material, MeshHandle, RenderBackend, TextureHandle,
};
use crate::model::CameraPose;

/// Puts the coordinator's meshes into a kiss3d scene graph, all under one
/// group node.
pub struct Kiss3dBackend {
    root: SceneNode,
    nodes: Vec<SceneNode>,
    camera: RigCamera,
}

impl Kiss3dBackend {
    pub fn new(window: &mut Window, initial_pose: &CameraPose) -> Self {
        Kiss3dBackend {
            root: window.add_group(),
            nodes: vec![],
            camera: RigCamera::new(initial_pose),
        }
    }

    pub fn camera_mut(&mut self) -> &mut RigCamera {
        &mut self.camera
    }

    fn node(&mut self, mesh: MeshHandle) -> Option<&mut SceneNode> {
        self.nodes.get_mut(mesh.0)
    }
}

impl RenderBackend for Kiss3dBackend {
    fn create_mesh(&mut self, geometry: &Geometry, material: &Material) -> MeshHandle {
        let mut node = match *geometry {
            Geometry::Sphere { radius } => self.root.add_sphere(radius as f32),
            Geometry::Ring {
                inner_radius,
                outer_radius,
            } => {
                let mesh = annulus_mesh(inner_radius as f32, outer_radius as f32, RING_SEGMENTS);
                let mut node = self.root.add_mesh(mesh, Vector3::repeat(1.0));
                // Seen from both sides
                node.enable_backface_culling(false);
                node
            }
        };

        let color = &material.color;
        node.set_color(color.x, color.y, color.z);
        if let Some(TextureHandle(name)) = &material.texture {
            node.set_texture_with_name(name);
        }

        self.nodes.push(node);
        MeshHandle(self.nodes.len() - 1)
    }

    fn set_position(&mut self, mesh: MeshHandle, position: &Point3<f64>) {
        let position: Point3<f32> = nalgebra::convert(*position);
        if let Some(node) = self.node(mesh) {
            node.set_local_translation(Translation3::from(position));
        }
    }

    fn set_orientation(&mut self, mesh: MeshHandle, orientation: &UnitQuaternion<f64>) {
        let orientation: UnitQuaternion<f32> = nalgebra::convert(*orientation);
        if let Some(node) = self.node(mesh) {
            node.set_local_rotation(orientation);
        }
    }

    fn submit_frame(&mut self, camera: &CameraPose) {
        self.camera.set_pose(camera);
    }
}

/// Loads textures into kiss3d's global texture manager, named by their path.
#[derive(Debug, Default)]
pub struct Kiss3dTextures;

/// Reads and decodes an image file. Anything that can't be had (no file, a
/// truncated file, an unknown format) comes back as `None`.
fn decode_texture(path: &Path) -> Option<DynamicImage> {
    if !path.is_file() {
        return None;
    }
    match image::open(path) {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "couldn't decode texture");
            None
        }
    }
}

impl AssetLoader for Kiss3dTextures {
    fn load_texture(&mut self, path: &Path) -> Option<TextureHandle> {
        // Decode here: the texture manager's own file loading panics on bad data
        let mut decoded = Some(decode_texture(path)?);

        let name = path.to_string_lossy().into_owned();
        TextureManager::get_global_manager(|tm| {
            if let Some(image) = decoded.take() {
                tm.add_image(image, &name);
            }
        });
        tracing::debug!(%name, "loaded texture");
        Some(TextureHandle(name))
    }
}
