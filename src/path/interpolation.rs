use crate::config::DEFAULT_ARRIVAL_TOLERANCE;
use crate::error::PathError;
use crate::geometry::Pose;

use super::{check_pose, check_pose_count, check_step, Path};

/// Evenly spaced poses from `start` to `end` along `start`'s heading.
///
/// Uses the default arrival tolerance; see [`interpolate_with_tolerance`].
pub fn interpolate(start: Pose, end: Pose, step: f64) -> Result<Path, PathError> {
    interpolate_with_tolerance(start, end, step, DEFAULT_ARRIVAL_TOLERANCE)
}

/// Straight-segment interpolation.
///
/// Intended for poses sharing a heading; the heading is not checked. Every
/// whole step advances along `start.theta` while carrying `end.theta`. A step
/// of zero yields `[start, end]`. If the last whole step stops further than
/// `tolerance` from `end`, `end` itself is appended so the path always
/// terminates exactly on the destination.
pub fn interpolate_with_tolerance(
    start: Pose,
    end: Pose,
    step: f64,
    tolerance: f64,
) -> Result<Path, PathError> {
    check_pose(start)?;
    check_pose(end)?;
    check_step(step)?;

    if step == 0.0 {
        return Ok(Path::from(vec![start, end]));
    }

    let x_distance = (end.x - start.x).abs();
    let y_distance = (end.y - start.y).abs();
    let n_steps = check_pose_count((x_distance.max(y_distance) / step).floor())?;

    let (dx, dy) = (step * start.theta.cos(), step * start.theta.sin());

    let mut path = Path::with_capacity(n_steps + 2);
    path.push(start);

    let mut current = start;
    for _ in 0..n_steps {
        current = Pose::new(current.x + dx, current.y + dy, end.theta);
        path.push(current);
    }

    if current.distance_to(&end) > tolerance {
        path.push(end);
    }

    Ok(path)
}
