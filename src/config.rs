use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{JunktionError, Result};

/// Distance before and after the heading-change point where the arc begins
pub const DEFAULT_CORNER_RADIUS: f64 = 3.0;

/// A generated path ending closer than this to its target is considered arrived
pub const DEFAULT_ARRIVAL_TOLERANCE: f64 = 0.001;

/// Step size used when a request does not carry its own
pub const DEFAULT_SPEED: f64 = 1.0;

/// Planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub corner_radius: f64,
    pub arrival_tolerance: f64,
    pub default_speed: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            corner_radius: DEFAULT_CORNER_RADIUS,
            arrival_tolerance: DEFAULT_ARRIVAL_TOLERANCE,
            default_speed: DEFAULT_SPEED,
        }
    }
}

impl PlannerConfig {
    /// Load a JSON config file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("Loaded planner config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    pub fn with_default_speed(mut self, default_speed: f64) -> Self {
        self.default_speed = default_speed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.corner_radius.is_finite() || self.corner_radius <= 0.0 {
            return Err(JunktionError::Config(format!(
                "corner_radius must be positive, got {}",
                self.corner_radius
            )));
        }
        if !self.arrival_tolerance.is_finite() || self.arrival_tolerance < 0.0 {
            return Err(JunktionError::Config(format!(
                "arrival_tolerance must be non-negative, got {}",
                self.arrival_tolerance
            )));
        }
        // Corners cannot be subdivided with a zero step
        if !self.default_speed.is_finite() || self.default_speed <= 0.0 {
            return Err(JunktionError::Config(format!(
                "default_speed must be positive, got {}",
                self.default_speed
            )));
        }
        Ok(())
    }
}
