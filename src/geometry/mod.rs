use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A 2D position plus heading, in world units and radians.
///
/// Heading has no enforced range; `0` points along +x and `0.5π` along +y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Euclidean distance between the two positions. Heading is ignored.
    pub fn distance_to(&self, other: &Pose) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Move `step` along this pose's own heading
    pub fn advance(&self, step: f64) -> Pose {
        Pose {
            x: self.x + step * self.theta.cos(),
            y: self.y + step * self.theta.sin(),
            theta: self.theta,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.theta.is_finite()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// `a - b` is the distance between the two positions.
impl Sub for Pose {
    type Output = f64;

    fn sub(self, other: Pose) -> f64 {
        self.distance_to(&other)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4} rad)", self.x, self.y, self.theta)
    }
}

/// Error returned when a `"x,y,theta"` string cannot be parsed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid pose '{input}': expected \"x,y,theta\" ({reason})")]
pub struct ParsePoseError {
    input: String,
    reason: String,
}

impl FromStr for Pose {
    type Err = ParsePoseError;

    /// Parse `"x,y,theta"`. Theta may carry a `pi` suffix, so `"0.5pi"` is a
    /// quarter turn and a bare `"pi"` is a half turn.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| ParsePoseError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(fail("need exactly three components"));
        }

        let x = parts[0].parse::<f64>().map_err(|_| fail("bad x"))?;
        let y = parts[1].parse::<f64>().map_err(|_| fail("bad y"))?;
        let theta = parse_angle(parts[2]).ok_or_else(|| fail("bad theta"))?;

        Ok(Pose::new(x, y, theta))
    }
}

fn parse_angle(s: &str) -> Option<f64> {
    let lower = s.to_ascii_lowercase();
    match lower.strip_suffix("pi") {
        Some("") => Some(std::f64::consts::PI),
        Some("-") => Some(-std::f64::consts::PI),
        Some(factor) => factor
            .trim_end_matches('*')
            .parse::<f64>()
            .ok()
            .map(|f| f * std::f64::consts::PI),
        None => lower.parse::<f64>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_pose_fields() {
        let p = Pose::new(1.0, 2.0, 3.0);
        assert_eq!(p.x, 1.0);
        assert_eq!(p.y, 2.0);
        assert_eq!(p.theta, 3.0);
    }

    #[test]
    fn test_sub_is_distance() {
        let a = Pose::new(3.0, 4.0, 0.0);
        let b = Pose::new(6.0, 8.0, 0.0);
        assert_relative_eq!(b - a, 5.0);
        assert_relative_eq!(a - b, 5.0);
    }

    #[test]
    fn test_distance_ignores_heading() {
        let a = Pose::new(1.0, 1.0, 0.0);
        let b = Pose::new(1.0, 1.0, PI);
        assert_eq!(a.distance_to(&b), 0.0);
    }

    #[test]
    fn test_advance_follows_heading() {
        let p = Pose::new(0.0, 0.0, 0.5 * PI).advance(2.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.theta, 0.5 * PI);
    }

    #[test]
    fn test_parse_plain() {
        let p: Pose = "1.5, -2, 0.25".parse().unwrap();
        assert_eq!(p, Pose::new(1.5, -2.0, 0.25));
    }

    #[test]
    fn test_parse_pi_suffix() {
        let p: Pose = "0,0,0.5pi".parse().unwrap();
        assert_relative_eq!(p.theta, 0.5 * PI);

        let p: Pose = "0,0,pi".parse().unwrap();
        assert_relative_eq!(p.theta, PI);

        let p: Pose = "0,0,1.5*PI".parse().unwrap();
        assert_relative_eq!(p.theta, 1.5 * PI);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("1,2".parse::<Pose>().is_err());
        assert!("a,b,c".parse::<Pose>().is_err());
        assert!("1,2,3,4".parse::<Pose>().is_err());
    }

    #[test]
    fn test_is_finite() {
        assert!(Pose::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Pose::new(f64::NAN, 2.0, 3.0).is_finite());
        assert!(!Pose::new(1.0, f64::INFINITY, 3.0).is_finite());
    }
}
