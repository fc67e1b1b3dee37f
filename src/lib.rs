//! Junktion: smooth, speed-quantized paths through a junction.
//!
//! The engine turns a start pose, an end pose and a step size into an ordered
//! list of poses. Equal headings give a straight run; differing headings get
//! a circular-arc corner between two tangent points, followed by a straight
//! exit. Everything is a pure function of its inputs.

pub mod config;
pub mod demo;
pub mod drive;
pub mod error;
pub mod event;
pub mod geometry;
pub mod path;

pub use config::PlannerConfig;
pub use error::{JunktionError, PathError, Result};
pub use geometry::Pose;
pub use path::{build_path, Path, Planner};
