mod corner;
mod interpolation;
mod planner;
mod tangent;

pub use corner::{generate_corner, segment_count};
pub use interpolation::{interpolate, interpolate_with_tolerance};
pub use planner::{build_path, Planner};
pub use tangent::{calculate_tangent_points, TangentPoints};

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::PathError;
use crate::geometry::Pose;

/// An ordered sequence of poses, first to last.
///
/// Produced once per request and read-only afterwards; the consumer indexes
/// or iterates through it at its own cadence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    poses: Vec<Pose>,
}

impl Path {
    pub fn new() -> Self {
        Self { poses: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            poses: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, pose: Pose) {
        self.poses.push(pose);
    }

    pub fn into_poses(self) -> Vec<Pose> {
        self.poses
    }

    /// Concatenate `next` onto this path, dropping this path's final pose.
    ///
    /// The final pose of one segment and the first of the next describe the
    /// same junction point, so only the second copy is kept.
    pub fn join(mut self, next: Path) -> Path {
        self.poses.pop();
        self.poses.extend(next.poses);
        self
    }

    /// Sum of the straight-line distances between consecutive poses
    pub fn total_length(&self) -> f64 {
        self.poses
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }
}

impl Deref for Path {
    type Target = [Pose];

    fn deref(&self) -> &[Pose] {
        &self.poses
    }
}

impl From<Vec<Pose>> for Path {
    fn from(poses: Vec<Pose>) -> Self {
        Self { poses }
    }
}

impl FromIterator<Pose> for Path {
    fn from_iter<I: IntoIterator<Item = Pose>>(iter: I) -> Self {
        Self {
            poses: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = Pose;
    type IntoIter = std::vec::IntoIter<Pose>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Pose;
    type IntoIter = std::slice::Iter<'a, Pose>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.iter()
    }
}

/// Upper bound on the poses a single run or corner may produce
pub const MAX_POSES: usize = 1_000_000;

/// Convert a whole step count into `usize`, refusing counts that are not
/// finite or exceed [`MAX_POSES`].
pub(crate) fn check_pose_count(count: f64) -> Result<usize, PathError> {
    if !count.is_finite() || count > MAX_POSES as f64 {
        return Err(PathError::TooManyPoses {
            requested: count,
            limit: MAX_POSES,
        });
    }
    Ok(count as usize)
}

pub(crate) fn check_step(step: f64) -> Result<(), PathError> {
    if !step.is_finite() || step < 0.0 {
        return Err(PathError::InvalidStep(step));
    }
    Ok(())
}

pub(crate) fn check_pose(pose: Pose) -> Result<(), PathError> {
    if !pose.is_finite() {
        return Err(PathError::InvalidPose(pose));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_join_drops_junction_duplicate() {
        let first = Path::from(vec![Pose::new(0.0, 0.0, 0.0), Pose::new(1.0, 0.0, 0.0)]);
        let second = Path::from(vec![Pose::new(1.0, 0.0, 0.0), Pose::new(2.0, 0.0, 0.0)]);

        let joined = first.join(second);
        assert_eq!(joined.len(), 3);
        assert_eq!(joined[1], Pose::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_join_onto_empty() {
        let second = Path::from(vec![Pose::new(1.0, 0.0, 0.0)]);
        let joined = Path::new().join(second.clone());
        assert_eq!(joined, second);
    }

    #[test]
    fn test_total_length() {
        let path: Path = vec![
            Pose::new(0.0, 0.0, 0.0),
            Pose::new(3.0, 0.0, 0.0),
            Pose::new(3.0, 4.0, 0.0),
        ]
        .into();
        assert_relative_eq!(path.total_length(), 7.0);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let path = Path::from(vec![Pose::new(1.0, 2.0, 0.0)]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"[{"x":1.0,"y":2.0,"theta":0.0}]"#);
    }

    #[test]
    fn test_check_step() {
        assert!(check_step(0.0).is_ok());
        assert!(check_step(1.5).is_ok());
        assert_eq!(check_step(-1.0), Err(PathError::InvalidStep(-1.0)));
        assert!(check_step(f64::NAN).is_err());
        assert!(check_step(f64::INFINITY).is_err());
    }

    #[test]
    fn test_check_pose_count() {
        assert_eq!(check_pose_count(0.0), Ok(0));
        assert_eq!(check_pose_count(MAX_POSES as f64), Ok(MAX_POSES));
        assert!(matches!(
            check_pose_count(MAX_POSES as f64 + 1.0),
            Err(PathError::TooManyPoses { limit: MAX_POSES, .. })
        ));
        assert!(check_pose_count(f64::INFINITY).is_err());
        assert!(check_pose_count(f64::NAN).is_err());
    }
}
