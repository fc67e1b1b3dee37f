use crate::config::PlannerConfig;
use crate::error::PathError;
use crate::geometry::Pose;

use super::{
    calculate_tangent_points, check_pose, check_step, generate_corner,
    interpolate_with_tolerance, Path, TangentPoints,
};

/// Assembles corners and straight runs into complete paths.
///
/// Holds only configuration; every call is a pure function of its inputs,
/// so one planner can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn tangent_points(&self, start: Pose, end: Pose) -> TangentPoints {
        calculate_tangent_points(start, end, self.config.corner_radius)
    }

    /// Corner plus exit run from the tangent points onward.
    ///
    /// When the headings match the result is just `[end]`; the straight run
    /// up to it is left to the caller. Otherwise the corner from `A` to `B`
    /// is followed by the straight run from `B` to `end`, with the duplicated
    /// junction pose removed. See [`Planner::route`] for the full trajectory.
    pub fn build_path(&self, start: Pose, end: Pose, step: f64) -> Result<Path, PathError> {
        check_pose(start)?;
        check_pose(end)?;
        check_step(step)?;

        match self.tangent_points(start, end) {
            TangentPoints::Straight(end) => Ok(Path::from(vec![end])),
            TangentPoints::Corner(a, b) => {
                let corner = generate_corner(a, b, step)?;
                let exit = interpolate_with_tolerance(b, end, step, self.config.arrival_tolerance)?;
                log::debug!(
                    "corner {} -> {}: {} corner poses, {} exit poses",
                    a,
                    b,
                    corner.len(),
                    exit.len()
                );
                Ok(corner.join(exit))
            }
        }
    }

    /// Full trajectory from `start` to `end`.
    ///
    /// Same-heading requests are a single straight run. Turning requests get
    /// the straight approach from `start` to tangent `A` in front of
    /// [`Planner::build_path`]. A turn whose displacement along either axis
    /// is shorter than the corner radius has no room for the arc and is
    /// refused with [`PathError::CornerTooTight`].
    pub fn route(&self, start: Pose, end: Pose, step: f64) -> Result<Path, PathError> {
        check_pose(start)?;
        check_pose(end)?;
        check_step(step)?;

        let tolerance = self.config.arrival_tolerance;
        let radius = self.config.corner_radius;

        let path = match self.tangent_points(start, end) {
            TangentPoints::Straight(_) => interpolate_with_tolerance(start, end, step, tolerance)?,
            TangentPoints::Corner(a, _) => {
                if (end.x - start.x).abs() < radius || (end.y - start.y).abs() < radius {
                    return Err(PathError::CornerTooTight { start, end, radius });
                }
                let approach = interpolate_with_tolerance(start, a, step, tolerance)?;
                approach.join(self.build_path(start, end, step)?)
            }
        };

        log::debug!(
            "route {} -> {} at step {}: {} poses, length {:.3}",
            start,
            end,
            step,
            path.len(),
            path.total_length()
        );

        Ok(path)
    }
}

/// [`Planner::build_path`] with the default configuration
pub fn build_path(start: Pose, end: Pose, step: f64) -> Result<Path, PathError> {
    Planner::default().build_path(start, end, step)
}
