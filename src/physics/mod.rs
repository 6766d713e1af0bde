//! Obstacle sensing module
//!
//! Built on top of rapier3d

mod world;

pub use world::{ObstacleHandle, ObstacleWorld};
