//! The windowless core: bodies on their orbits, the camera rig that eases
//! between them, and the coordinator that advances both once per frame.

pub mod body;
pub mod camera_rig;
pub mod headless;
pub mod preset;
pub mod registry;
pub mod sampler;
pub mod scene;

pub use body::{BodyID, OrbitParams, OrbitingBody};
pub use camera_rig::{CameraPose, CameraRig, FollowMode, RigSettings, RigState};
pub use preset::ScenePreset;
pub use registry::{BodyRegistry, PrimaryBody, RingParams};
pub use scene::{SceneCoordinator, SceneSetup, NOMINAL_TICK_SECONDS};
