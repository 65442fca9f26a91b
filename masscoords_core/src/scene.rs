//! Application scene state.
//!
//! One explicit struct owns everything the per-tick loop touches: the
//! loaded inputs, the user's transform parameters, the playback clock and
//! the last computed cloud placement. Constructed once at startup and
//! dropped at shutdown; nothing lives in globals.

use tracing::debug;

use crate::alignment::{align_cloud, CloudPlacement, TransformParameters};
use crate::cloud::PointCloud;
use crate::playback::PlaybackClock;
use crate::pose::CameraPose;
use crate::trajectory::TrajectorySet;

/// All mutable viewer state, passed explicitly to the tick loop.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub cloud: Option<PointCloud>,
    pub camera_pose: Option<CameraPose>,
    pub trajectories: TrajectorySet,
    pub params: TransformParameters,
    pub playback: PlaybackClock,
    /// Last computed placement; `None` until both alignment inputs exist
    pub placement: Option<CloudPlacement>,
}

impl SceneState {
    /// Creates an empty scene with the given playback speed.
    pub fn new(speed: f64) -> Self {
        Self {
            playback: PlaybackClock::new(speed),
            ..Default::default()
        }
    }

    /// Recomputes the cloud placement if both the cloud and the camera
    /// pose are loaded.
    ///
    /// The guard is the only synchronization between the two independent
    /// loads: whichever finishes second triggers the first effective
    /// recompute. Before then this is a no-op returning `None`, leaving
    /// any previous placement untouched.
    pub fn try_align(&mut self) -> Option<CloudPlacement> {
        if self.cloud.is_none() || self.camera_pose.is_none() {
            debug!("alignment skipped: cloud or camera pose not yet loaded");
            return None;
        }
        let pose = self.camera_pose.as_ref()?;
        let placement = align_cloud(pose, &self.params);
        self.placement = Some(placement);
        Some(placement)
    }

    /// Advances the playback clock one tick; returns the integer frame.
    pub fn advance(&mut self) -> usize {
        self.playback.tick(self.trajectories.max_frame())
    }

    /// Last valid frame index, `None` when no agent has samples.
    pub fn max_frame(&self) -> Option<usize> {
        self.trajectories.max_frame()
    }

    /// Per-agent marker positions at a frame (see [`TrajectorySet`]).
    pub fn marker_positions(&self, frame: usize) -> Vec<Option<[f32; 3]>> {
        self.trajectories.marker_positions(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::base_alignment;

    fn test_pose() -> CameraPose {
        CameraPose::from_values([0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0])
    }

    #[test]
    fn test_align_is_noop_without_cloud() {
        let mut scene = SceneState::new(1.0);
        scene.camera_pose = Some(test_pose());
        assert!(scene.try_align().is_none());
        assert!(scene.placement.is_none());
    }

    #[test]
    fn test_align_is_noop_without_pose() {
        let mut scene = SceneState::new(1.0);
        scene.cloud = Some(PointCloud::default());
        assert!(scene.try_align().is_none());
        assert!(scene.placement.is_none());
    }

    #[test]
    fn test_align_once_both_present() {
        let mut scene = SceneState::new(1.0);
        scene.cloud = Some(PointCloud::default());
        scene.camera_pose = Some(test_pose());

        let placement = scene.try_align().unwrap();
        let expected = base_alignment(&test_pose());
        assert_eq!(placement.rotation, expected.rotation);
        assert_eq!(placement.position, expected.position);
        assert_eq!(scene.placement, Some(placement));
    }

    #[test]
    fn test_align_is_idempotent() {
        let mut scene = SceneState::new(1.0);
        scene.cloud = Some(PointCloud::default());
        scene.camera_pose = Some(test_pose());
        scene.params.offset_x = 2.5;

        let first = scene.try_align().unwrap();
        let second = scene.try_align().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_align_keeps_previous_placement() {
        let mut scene = SceneState::new(1.0);
        scene.cloud = Some(PointCloud::default());
        scene.camera_pose = Some(test_pose());
        let placement = scene.try_align();

        scene.camera_pose = None;
        assert!(scene.try_align().is_none());
        assert_eq!(scene.placement, placement);
    }

    #[test]
    fn test_advance_uses_trajectory_bounds() {
        let mut scene = SceneState::new(2.0);
        scene.trajectories = TrajectorySet::from_str(
            "agent_0_x,agent_0_y,agent_0_z\n0,0,0\n1,1,1\n2,2,2\n",
        )
        .unwrap();
        scene.playback.toggle();

        assert_eq!(scene.advance(), 2);
        assert_eq!(scene.advance(), 0); // 2+2=4 > 2, wraps
    }
}
