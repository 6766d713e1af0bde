//! Core simulation module
//!
//! Agent state, configuration and the integrator

mod config;
mod integrator;
mod kinematics;
mod scenario;

pub use config::{ConfigError, SteeringParams, WorldBounds};
pub use integrator::{Drive, SPEED_DECAY_RATE, integrate};
pub use kinematics::KinematicState;
pub use scenario::{ObstacleShape, PathSpec, Scenario, TargetSpec};
