use crate::geometry::Pose;

/// Where straight travel gives way to the corner arc and back
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TangentPoints {
    /// Headings match, no corner. Holds the destination.
    Straight(Pose),
    /// Entry tangent `A` on the start heading, exit tangent `B` on the end heading
    Corner(Pose, Pose),
}

impl TangentPoints {
    pub fn len(&self) -> usize {
        match self {
            TangentPoints::Straight(_) => 1,
            TangentPoints::Corner(_, _) => 2,
        }
    }

    pub fn to_vec(&self) -> Vec<Pose> {
        match *self {
            TangentPoints::Straight(end) => vec![end],
            TangentPoints::Corner(a, b) => vec![a, b],
        }
    }
}

/// Locate the two tangent poses bounding the corner between `start` and `end`.
///
/// `A` lies `corner_radius` short of the turn along `start`'s heading and
/// `B` lies `corner_radius` past it along `end`'s heading. Each axis is
/// offset by its own displacement, which places the turn at the axis-aligned
/// intersection of the two headings.
pub fn calculate_tangent_points(start: Pose, end: Pose, corner_radius: f64) -> TangentPoints {
    if start.theta == end.theta {
        return TangentPoints::Straight(end);
    }

    let x_distance = (end.x - start.x).abs();
    let y_distance = (end.y - start.y).abs();

    let a = Pose::new(
        start.x + (x_distance - corner_radius) * start.theta.cos(),
        start.y + (y_distance - corner_radius) * start.theta.sin(),
        start.theta,
    );

    let b = Pose::new(
        end.x + (corner_radius - x_distance) * end.theta.cos(),
        end.y + (corner_radius - y_distance) * end.theta.sin(),
        end.theta,
    );

    TangentPoints::Corner(a, b)
}
