use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Pose;
use crate::path::Path;

/// Identifier of the entity a path is planned for
pub type RequestId = String;

/// A request to plan a path between two poses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRequest {
    pub id: RequestId,
    pub start: Pose,
    pub end: Pose,
    /// Step size; the planner default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default)]
    pub timestamp: u64,
}

impl PathRequest {
    pub fn new(id: impl Into<RequestId>, start: Pose, end: Pose) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            speed: None,
            timestamp: 0,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// One pose emitted while driving a path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFrame {
    pub id: RequestId,
    pub index: usize,
    pub pose: Pose,
    pub emitted_at: DateTime<Utc>,
}

/// Everything written to the output stream, one JSON object per line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanOutput {
    Path { id: RequestId, speed: f64, poses: Path },
    Rejected { id: RequestId, reason: String },
    Frame(PoseFrame),
}

impl PlanOutput {
    pub fn id(&self) -> &str {
        match self {
            PlanOutput::Path { id, .. } => id,
            PlanOutput::Rejected { id, .. } => id,
            PlanOutput::Frame(frame) => &frame.id,
        }
    }

    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
