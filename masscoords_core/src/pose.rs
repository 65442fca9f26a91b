//! Camera-pose metadata loading.
//!
//! The metadata document is JSON with a `poses` array; each pose is seven
//! numbers `[qx, qy, qz, qw, tx, ty, tz]` (unit quaternion + translation).
//! Only `poses[0]` is consumed: the viewer aligns against a single
//! reference camera.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::Deserialize;

use crate::error::LoadError;

/// A camera's placement in world space. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPose {
    /// World-from-camera rotation
    pub rotation: UnitQuaternion<f64>,
    /// World-from-camera translation
    pub translation: Vector3<f64>,
}

#[derive(Debug, Deserialize)]
struct PoseDocument {
    poses: Vec<[f64; 7]>,
}

impl CameraPose {
    /// Builds a pose from `[qx, qy, qz, qw, tx, ty, tz]`.
    ///
    /// The quaternion is normalized on construction, so near-unit input
    /// (e.g. truncated decimals) is tolerated.
    pub fn from_values(values: [f64; 7]) -> Self {
        let [qx, qy, qz, qw, tx, ty, tz] = values;
        Self {
            rotation: UnitQuaternion::from_quaternion(Quaternion::new(qw, qx, qy, qz)),
            translation: Vector3::new(tx, ty, tz),
        }
    }

    /// Reads a metadata document and returns the first pose.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let doc: PoseDocument = serde_json::from_reader(reader)?;
        let first = doc.poses.first().ok_or(LoadError::MissingPose)?;
        Ok(Self::from_values(*first))
    }

    /// Loads the first pose from a metadata file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_identity_pose() {
        let pose = CameraPose::from_values([0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0]);
        assert_relative_eq!(pose.rotation.angle(), 0.0, epsilon = 1e-12);
        assert_eq!(pose.translation, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_near_unit_quaternion_normalized() {
        // 0.7071 * sqrt(2) != 1 exactly; construction must renormalize
        let pose = CameraPose::from_values([0.7071, 0.0, 0.0, 0.7071, 0.0, 0.0, 0.0]);
        assert_relative_eq!(pose.rotation.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            pose.rotation.angle(),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_first_of_many_poses() {
        let json = r#"{"poses": [
            [0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0],
            [0.0, 1.0, 0.0, 0.0, 9.0, 9.0, 9.0]
        ]}"#;
        let pose = CameraPose::from_reader(json.as_bytes()).unwrap();
        assert_eq!(pose.translation, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_empty_poses_is_error() {
        let result = CameraPose::from_reader(r#"{"poses": []}"#.as_bytes());
        assert!(matches!(result, Err(LoadError::MissingPose)));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let result = CameraPose::from_reader("not json".as_bytes());
        assert!(matches!(result, Err(LoadError::Json(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"poses": [[0.0, 0.0, 0.0, 1.0, 4.0, 5.0, 6.0]]}}"#).unwrap();
        file.flush().unwrap();

        let pose = CameraPose::load(file.path()).unwrap();
        assert_eq!(pose.translation, Vector3::new(4.0, 5.0, 6.0));
    }
}
