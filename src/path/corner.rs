use crate::error::PathError;
use crate::geometry::Pose;

use super::{check_pose, check_pose_count, check_step, Path};

/// Below this the heading cosines are treated as cancelling out
const COS_SUM_EPSILON: f64 = 1e-9;

/// Number of straight sub-segments approximating the arc from `start` to `end`
pub fn segment_count(start: Pose, end: Pose, step: f64) -> Result<usize, PathError> {
    check_pose(start)?;
    check_pose(end)?;
    check_step(step)?;
    if step == 0.0 {
        return Err(PathError::InvalidStep(step));
    }

    let corner_angle = (end.theta - start.theta).abs();
    if corner_angle == 0.0 {
        return Err(PathError::DegenerateCorner {
            start,
            end,
            reason: "headings are identical",
        });
    }

    // The x-displacement between the tangent points doubles as the radius
    let corner_radius = (end.x - start.x).abs();
    let arc_length = corner_angle * corner_radius;

    let n_segments = check_pose_count((arc_length / step).ceil())?;
    if n_segments == 0 {
        return Err(PathError::ZeroSegments { start, end });
    }

    Ok(n_segments)
}

/// Polyline approximation of the circular arc turning from `start.theta` to
/// `end.theta`.
///
/// Returns `n_segments + 1` poses. The first sits on `start`'s coordinates.
/// Headings are sampled evenly over the turn beginning one increment past
/// `start.theta` and finishing on `end.theta`. Every chord has the same
/// length, chosen so the chords' summed x-projection (over all sampled
/// headings) equals `end.x - start.x`.
pub fn generate_corner(start: Pose, end: Pose, step: f64) -> Result<Path, PathError> {
    let n_segments = segment_count(start, end, step)?;
    let n_positions = n_segments + 1;

    let increment = (end.theta - start.theta) / n_positions as f64;
    let thetas: Vec<f64> = (0..n_positions)
        .map(|i| start.theta + increment * (i + 1) as f64)
        .collect();

    let cos_sum: f64 = thetas.iter().map(|theta| theta.cos()).sum();
    if cos_sum.abs() < COS_SUM_EPSILON {
        return Err(PathError::DegenerateCorner {
            start,
            end,
            reason: "sampled heading cosines sum to zero",
        });
    }

    let segment_length = (end.x - start.x) / cos_sum;
    if !segment_length.is_finite() {
        return Err(PathError::DegenerateCorner {
            start,
            end,
            reason: "segment length is not finite",
        });
    }

    log::trace!(
        "corner {} -> {}: {} segments of length {:.4}",
        start,
        end,
        n_segments,
        segment_length
    );

    let mut path = Path::with_capacity(n_positions);
    let (mut x, mut y) = (start.x, start.y);
    path.push(Pose::new(x, y, thetas[0]));

    for i in 0..n_segments {
        x += segment_length * thetas[i].cos();
        y += segment_length * thetas[i].sin();
        path.push(Pose::new(x, y, thetas[i + 1]));
    }

    Ok(path)
}
