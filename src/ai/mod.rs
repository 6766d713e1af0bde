//! AI and navigation module
//!
//! Provides steering behaviors, waypoint paths, obstacle avoidance and the
//! agent that ties them together.

mod agent;
mod avoidance;
mod behavior;
mod path;
mod steering;
mod wander;

pub use agent::{Agent, DEFAULT_SEED, TickReport};
pub use avoidance::{
    Avoidance, NoObstacles, ObstacleProbe, ObstacleSensor, SIDE_PROBE_ANGLE, SIDE_PROBE_RANGE,
    SIDE_PROBE_WEIGHT, STUCK_SPEED, UNSTICK_IMPULSE, avoid,
};
pub use behavior::{BehaviorKind, BehaviorSelector};
pub use path::WaypointPath;
pub use steering::{
    ARRIVE_STOP_DISTANCE, TargetObservation, arrive, evade, flee, pursuit, reflect, seek,
};
pub use wander::{WanderState, wander};
