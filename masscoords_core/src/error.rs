//! Error types for scene input loading.

use thiserror::Error;

/// Errors that can occur while loading scene inputs.
///
/// Per-field problems inside a trajectory row are not errors (the field is
/// dropped and parsing continues); only structural failures surface here.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pose metadata document is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Trajectory file has a structural CSV problem
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Point-cloud file is not a readable ASCII PLY
    #[error("Invalid PLY file: {0}")]
    Ply(String),

    /// Pose metadata document has an empty `poses` array
    #[error("Pose metadata contains no poses")]
    MissingPose,
}
