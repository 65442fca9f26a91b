//! masscoords_core - Point-cloud / trajectory scene library
//!
//! Building blocks for a viewer that overlays a static 3D point cloud with
//! time-varying agent trajectories:
//! 1. **Loaders**: ASCII PLY point clouds, JSON camera-pose metadata, CSV
//!    agent trajectories.
//! 2. **Pose Aligner**: expresses the cloud in the reference camera's frame,
//!    plus a user-adjustable secondary transform (offsets, yaw, mirroring).
//! 3. **Playback Clock**: looping frame counter driving per-agent markers.
//!
//! Rendering is delegated to Rerun via the `visualization` feature.

pub mod alignment;
pub mod cloud;
pub mod error;
pub mod playback;
pub mod pose;
pub mod scene;
pub mod trajectory;
pub mod visualization;

// Re-export key types for convenience
pub use alignment::{CloudPlacement, TransformParameters};
pub use cloud::PointCloud;
pub use error::LoadError;
pub use playback::PlaybackClock;
pub use pose::CameraPose;
pub use scene::SceneState;
pub use trajectory::TrajectorySet;
