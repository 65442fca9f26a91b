//! Camera-pose alignment for the static point cloud.
//!
//! The base alignment expresses the world cloud as seen from inside the
//! reference camera: the standard view-matrix inversion done with the
//! quaternion inverse (orientation = q⁻¹, position = q⁻¹ · (−t)).
//!
//! A user-controlled secondary transform is applied on top: world-axis
//! offsets, an extra rotation about the object's own Y axis, and per-axis
//! mirroring expressed as ±1 scale.

use nalgebra::{UnitQuaternion, Vector3};

use crate::pose::CameraPose;

/// Offset control bounds (a GUI contract, not a math requirement).
pub const OFFSET_MIN: f64 = -10.0;
pub const OFFSET_MAX: f64 = 10.0;
/// Yaw control is bounded to ±π.
pub const ROTATION_LIMIT: f64 = std::f64::consts::PI;

/// User-adjustable secondary transform on top of the base alignment.
///
/// Owned by the control surface; mutated only via user interaction.
/// Defaults (all zero / false) make the secondary transform a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformParameters {
    pub offset_x: f64,
    pub offset_y: f64,
    pub offset_z: f64,
    /// Extra rotation about the cloud's own Y axis, radians
    pub rotation_y: f64,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub mirror_z: bool,
}

/// Computed placement of the cloud entity: rotation, position, ±1 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudPlacement {
    pub rotation: UnitQuaternion<f64>,
    pub position: Vector3<f64>,
    pub scale: Vector3<f64>,
}

/// Places the cloud in the reference camera's coordinate frame.
pub fn base_alignment(pose: &CameraPose) -> CloudPlacement {
    let q_inv = pose.rotation.inverse();
    CloudPlacement {
        rotation: q_inv,
        position: q_inv * (-pose.translation),
        scale: Vector3::new(1.0, 1.0, 1.0),
    }
}

/// Base alignment plus the user's secondary transform.
///
/// Pure and idempotent: recomputed from scratch on every call, so repeated
/// parameter edits never accumulate drift.
pub fn align_cloud(pose: &CameraPose, params: &TransformParameters) -> CloudPlacement {
    let mut placement = base_alignment(pose);

    // Offsets are world-axis, added after the base rotation
    placement.position += Vector3::new(params.offset_x, params.offset_y, params.offset_z);

    // Intrinsic yaw: composed after the base orientation, about the
    // object's own Y axis. The order matters; do not swap.
    let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), params.rotation_y);
    placement.rotation *= yaw;

    placement.scale = Vector3::new(
        if params.mirror_x { -1.0 } else { 1.0 },
        if params.mirror_y { -1.0 } else { 1.0 },
        if params.mirror_z { -1.0 } else { 1.0 },
    );

    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn pose(q: [f64; 4], t: [f64; 3]) -> CameraPose {
        CameraPose::from_values([q[0], q[1], q[2], q[3], t[0], t[1], t[2]])
    }

    #[test]
    fn test_identity_pose_base_alignment() {
        let placement = base_alignment(&pose([0.0, 0.0, 0.0, 1.0], [1.0, 2.0, 3.0]));
        assert_relative_eq!(placement.rotation.angle(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(placement.position, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(placement.scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_default_params_match_base_alignment() {
        let p = pose([0.5, 0.5, 0.5, 0.5], [1.0, -2.0, 0.5]);
        let base = base_alignment(&p);
        let aligned = align_cloud(&p, &TransformParameters::default());
        assert_eq!(aligned.rotation, base.rotation);
        assert_eq!(aligned.position, base.position);
        assert_eq!(aligned.scale, base.scale);
    }

    #[test]
    fn test_offsets_applied_in_world_axes() {
        let p = pose([0.5, 0.5, 0.5, 0.5], [1.0, -2.0, 0.5]);
        let base = base_alignment(&p);
        let params = TransformParameters {
            offset_x: 1.0,
            offset_y: -2.0,
            offset_z: 3.0,
            ..Default::default()
        };
        let aligned = align_cloud(&p, &params);
        assert_relative_eq!(
            aligned.position,
            base.position + Vector3::new(1.0, -2.0, 3.0)
        );
        // Offsets never touch the orientation
        assert_eq!(aligned.rotation, base.rotation);
    }

    #[test]
    fn test_yaw_composes_after_base_orientation() {
        let p = pose([0.0, 0.7071, 0.0, 0.7071], [0.0, 0.0, 0.0]);
        let params = TransformParameters {
            rotation_y: 0.3,
            ..Default::default()
        };
        let aligned = align_cloud(&p, &params);
        let expected = base_alignment(&p).rotation
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3);
        assert_relative_eq!(
            aligned.rotation.angle_to(&expected),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_mirror_x_independent() {
        let p = pose([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0]);
        let params = TransformParameters {
            mirror_x: true,
            ..Default::default()
        };
        let aligned = align_cloud(&p, &params);
        assert_eq!(aligned.scale, Vector3::new(-1.0, 1.0, 1.0));
    }

    #[test]
    fn test_mirror_all_axes() {
        let p = pose([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0]);
        let params = TransformParameters {
            mirror_x: true,
            mirror_y: true,
            mirror_z: true,
            ..Default::default()
        };
        let aligned = align_cloud(&p, &params);
        assert_eq!(aligned.scale, Vector3::new(-1.0, -1.0, -1.0));
    }

    proptest! {
        /// Round-trip law: the camera pose applied on top of the base
        /// alignment returns any point to itself.
        #[test]
        fn prop_base_alignment_round_trip(
            axis in prop::array::uniform3(-1.0f64..1.0),
            angle in -std::f64::consts::PI..std::f64::consts::PI,
            t in prop::array::uniform3(-100.0f64..100.0),
            point in prop::array::uniform3(-50.0f64..50.0),
        ) {
            let axis_vec = Vector3::new(axis[0], axis[1], axis[2]);
            prop_assume!(axis_vec.norm() > 1e-3);
            let q = UnitQuaternion::from_axis_angle(
                &nalgebra::Unit::new_normalize(axis_vec),
                angle,
            );
            let cam = CameraPose {
                rotation: q,
                translation: Vector3::new(t[0], t[1], t[2]),
            };

            let placement = base_alignment(&cam);
            let p = Vector3::new(point[0], point[1], point[2]);
            let in_camera = placement.rotation * p + placement.position;
            let back = cam.rotation * in_camera + cam.translation;

            prop_assert!((back - p).norm() < 1e-6);
        }

        /// The mirror flags only ever produce ±1 per axis.
        #[test]
        fn prop_mirror_scale_is_unit_magnitude(
            mx in any::<bool>(), my in any::<bool>(), mz in any::<bool>(),
        ) {
            let p = pose([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0]);
            let params = TransformParameters {
                mirror_x: mx, mirror_y: my, mirror_z: mz,
                ..Default::default()
            };
            let scale = align_cloud(&p, &params).scale;
            prop_assert_eq!(scale.x.abs(), 1.0);
            prop_assert_eq!(scale.y.abs(), 1.0);
            prop_assert_eq!(scale.z.abs(), 1.0);
        }
    }
}
