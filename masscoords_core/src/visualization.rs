//! Rerun scene logging.
//!
//! Mirrors the viewer scene: world axes and ground circles for context,
//! the static cloud points plus their alignment transform, per-agent
//! trajectory paths, and temporal agent markers on the `frame` timeline.
//!
//! Visualization is optional and only available with the `visualization`
//! feature; without it every method is a no-op so the core builds and
//! tests headless.

#[cfg(feature = "visualization")]
use rerun::RecordingStream;

use crate::alignment::CloudPlacement;
use crate::cloud::PointCloud;
use crate::trajectory::TrajectorySet;

/// Flat gray used when the cloud has no vertex colors.
pub const CLOUD_GRAY: [u8; 3] = [153, 153, 153];

/// Rerun logger for the viewer scene.
pub struct SceneVisualizer {
    #[cfg(feature = "visualization")]
    rec: Option<RecordingStream>,

    /// Whether visualization is enabled
    enabled: bool,
}

impl SceneVisualizer {
    /// Creates a visualizer with logging disabled.
    pub fn disabled() -> Self {
        Self {
            #[cfg(feature = "visualization")]
            rec: None,
            enabled: false,
        }
    }

    /// Creates a visualizer that spawns the Rerun viewer.
    ///
    /// Spawn failure degrades to disabled with a warning; it never aborts
    /// the viewer.
    #[cfg(feature = "visualization")]
    pub fn spawn(app_id: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(app_id).spawn() {
            Ok(rec) => {
                tracing::info!("Rerun visualization enabled");
                Self {
                    rec: Some(rec),
                    enabled: true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to spawn Rerun viewer: {:?}", e);
                Self::disabled()
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn spawn(_app_id: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    /// Creates a visualizer that records to an `.rrd` file.
    #[cfg(feature = "visualization")]
    pub fn save(app_id: &str, path: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(app_id).save(path) {
            Ok(rec) => {
                tracing::info!("Recording scene to {}", path);
                Self {
                    rec: Some(rec),
                    enabled: true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to record to {}: {:?}", path, e);
                Self::disabled()
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn save(_app_id: &str, _path: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    /// Returns whether visualization is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs the static world frame: view coordinates, axes, ground circles.
    #[cfg(feature = "visualization")]
    pub fn log_world_frame(&self) {
        if let Some(ref rec) = self.rec {
            let _ = rec.log_static("world", &rerun::ViewCoordinates::RIGHT_HAND_Y_UP());

            // RGB axes of length 5, matching the usual XYZ color convention
            let _ = rec.log_static(
                "world/axes",
                &rerun::Arrows3D::from_vectors([
                    [5.0f32, 0.0, 0.0],
                    [0.0, 5.0, 0.0],
                    [0.0, 0.0, 5.0],
                ])
                .with_colors([
                    rerun::Color::from_rgb(255, 0, 0),
                    rerun::Color::from_rgb(0, 255, 0),
                    rerun::Color::from_rgb(0, 0, 255),
                ]),
            );

            for radius in [6.0f32, 12.0] {
                let _ = rec.log_static(
                    format!("world/ground/circle_{}", radius as u32),
                    &rerun::LineStrips3D::new([ground_circle(radius, -4.0, 128)])
                        .with_colors([rerun::Color::from_rgb(
                            CLOUD_GRAY[0],
                            CLOUD_GRAY[1],
                            CLOUD_GRAY[2],
                        )]),
                );
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_world_frame(&self) {}

    /// Logs the static cloud points, vertex-colored when colors exist.
    #[cfg(feature = "visualization")]
    pub fn log_cloud(&self, cloud: &PointCloud) {
        if let Some(ref rec) = self.rec {
            let points = rerun::Points3D::new(cloud.positions.iter().copied()).with_radii([0.03]);
            let points = match &cloud.colors {
                Some(colors) => points.with_colors(
                    colors
                        .iter()
                        .map(|c| rerun::Color::from_rgb(c[0], c[1], c[2])),
                ),
                None => points.with_colors([rerun::Color::from_rgb(
                    CLOUD_GRAY[0],
                    CLOUD_GRAY[1],
                    CLOUD_GRAY[2],
                )]),
            };
            let _ = rec.log_static("world/cloud", &points);
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_cloud(&self, _cloud: &PointCloud) {}

    /// Logs (overwrites) the cloud placement as a static transform, so the
    /// current alignment applies across the whole timeline.
    #[cfg(feature = "visualization")]
    pub fn log_cloud_transform(&self, placement: &CloudPlacement) {
        if let Some(ref rec) = self.rec {
            let q = placement.rotation.as_ref();
            let _ = rec.log_static(
                "world/cloud",
                &rerun::Transform3D::from_translation_rotation_scale(
                    [
                        placement.position.x as f32,
                        placement.position.y as f32,
                        placement.position.z as f32,
                    ],
                    rerun::Quaternion::from_xyzw([
                        q.i as f32,
                        q.j as f32,
                        q.k as f32,
                        q.w as f32,
                    ]),
                    [
                        placement.scale.x as f32,
                        placement.scale.y as f32,
                        placement.scale.z as f32,
                    ],
                ),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_cloud_transform(&self, _placement: &CloudPlacement) {}

    /// Logs each agent's full trajectory as a static path, hue-spread over
    /// the agent count. Empty trajectories are skipped.
    #[cfg(feature = "visualization")]
    pub fn log_trajectory_paths(&self, trajectories: &TrajectorySet) {
        if let Some(ref rec) = self.rec {
            let count = trajectories.agent_count();
            for (i, path) in trajectories.iter().enumerate() {
                if path.is_empty() {
                    continue;
                }
                let [r, g, b] = agent_color(i, count);
                let _ = rec.log_static(
                    format!("world/agents/{}/path", i),
                    &rerun::LineStrips3D::new([path.to_vec()])
                        .with_colors([rerun::Color::from_rgb(r, g, b)])
                        .with_radii([0.08]),
                );
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_trajectory_paths(&self, _trajectories: &TrajectorySet) {}

    /// Logs per-agent markers at a frame on the `frame` sequence timeline.
    ///
    /// Agents without data at this frame get a `Clear` (hidden marker).
    #[cfg(feature = "visualization")]
    pub fn log_markers(&self, frame: usize, markers: &[Option<[f32; 3]>]) {
        if let Some(ref rec) = self.rec {
            rec.set_time_sequence("frame", frame as i64);
            for (i, marker) in markers.iter().enumerate() {
                let path = format!("world/agents/{}/marker", i);
                match marker {
                    Some(position) => {
                        let _ = rec.log(
                            path,
                            &rerun::Points3D::new([*position])
                                .with_colors([rerun::Color::from_rgb(0, 0, 0)])
                                .with_radii([0.12]),
                        );
                    }
                    None => {
                        let _ = rec.log(path, &rerun::Clear::flat());
                    }
                }
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_markers(&self, _frame: usize, _markers: &[Option<[f32; 3]>]) {}
}

/// Closed circle in the XZ plane at height `y`.
#[cfg(feature = "visualization")]
fn ground_circle(radius: f32, y: f32, segments: usize) -> Vec<[f32; 3]> {
    (0..=segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * std::f32::consts::TAU;
            [theta.cos() * radius, y, theta.sin() * radius]
        })
        .collect()
}

/// Agent path color: hue spread over the agent count (HSL l=0.5, s=0.9).
pub fn agent_color(index: usize, count: usize) -> [u8; 3] {
    let hue = if count > 0 {
        index as f32 / count as f32
    } else {
        0.0
    };
    hsl_to_rgb(hue, 0.9, 0.5)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h6 = (h.fract() + 1.0).fract() * 6.0;
    let x = c * (1.0 - (h6 % 2.0 - 1.0).abs());
    let (r, g, b) = match h6 as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_visualizer_is_inert() {
        let viz = SceneVisualizer::disabled();
        assert!(!viz.is_enabled());
        viz.log_world_frame();
        viz.log_markers(0, &[None, Some([1.0, 2.0, 3.0])]);
    }

    #[test]
    fn test_hue_zero_is_red() {
        let [r, g, b] = hsl_to_rgb(0.0, 0.9, 0.5);
        assert!(r > 200);
        assert_eq!(g, b);
        assert!(g < 50);
    }

    #[test]
    fn test_agent_colors_differ() {
        let a = agent_color(0, 4);
        let b = agent_color(1, 4);
        let c = agent_color(2, 4);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    #[cfg(feature = "visualization")]
    fn test_ground_circle_is_closed() {
        let circle = ground_circle(6.0, -4.0, 128);
        assert_eq!(circle.len(), 129);
        let first = circle[0];
        let last = circle[circle.len() - 1];
        assert!((first[0] - last[0]).abs() < 1e-3);
        assert!((first[2] - last[2]).abs() < 1e-3);
        assert!(circle.iter().all(|p| p[1] == -4.0));
    }
}
