//! Error types for Junktion

use thiserror::Error;

use crate::geometry::Pose;

/// Failures of the path geometry itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("step size must be finite and non-negative, got {0}")]
    InvalidStep(f64),

    #[error("pose has non-finite components: {0}")]
    InvalidPose(Pose),

    #[error("degenerate corner from {start} to {end}: {reason}")]
    DegenerateCorner {
        start: Pose,
        end: Pose,
        reason: &'static str,
    },

    #[error("corner from {start} to {end} subdivides into zero segments")]
    ZeroSegments { start: Pose, end: Pose },

    #[error("step size would need {requested} poses, limit is {limit}")]
    TooManyPoses { requested: f64, limit: usize },

    #[error("turn from {start} to {end} is tighter than the corner radius {radius}")]
    CornerTooTight { start: Pose, end: Pose, radius: f64 },
}

/// Junktion application error type
#[derive(Error, Debug)]
pub enum JunktionError {
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, JunktionError>;
