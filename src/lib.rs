//! Steering behaviors for autonomous agents
//!
//! This crate provides:
//! - Seek, flee, arrive, pursuit, evade, wander and path following
//! - Obstacle avoidance from ray probes, backed by rapier3d
//! - A fixed-step integrator with force, speed and world-bound clamps
//! - Multi-agent stepping over a hecs world

pub mod ai;
pub mod core;
pub mod ecs;
pub mod physics;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        Agent, BehaviorKind, NoObstacles, ObstacleProbe, ObstacleSensor, TickReport, WaypointPath,
    };
    pub use crate::core::{ConfigError, KinematicState, Scenario, SteeringParams, WorldBounds};
    pub use crate::ecs::{Name, SteeringTarget, Transform, Velocity, World};
    pub use crate::physics::{ObstacleHandle, ObstacleWorld};
    pub use glam::{Quat, Vec3};
}
