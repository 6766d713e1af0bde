//! Scenario serialization and deserialization
//!
//! A scenario describes one headless run: an agent, what it steers toward,
//! and the obstacles around it. Supports RON and JSON.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{ConfigError, SteeringParams};
use crate::ai::{Agent, BehaviorKind, DEFAULT_SEED};
use crate::physics::ObstacleWorld;

/// A target that drifts at constant velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Start position
    pub position: Vec3,
    /// Constant drift velocity
    #[serde(default)]
    pub velocity: Vec3,
}

/// Authored waypoint path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    /// Waypoints in order
    pub waypoints: Vec<Vec3>,
    /// Distance at which a waypoint counts as reached
    #[serde(default = "default_arrival_threshold")]
    pub arrival_threshold: f32,
    /// Wrap around after the last waypoint
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_arrival_threshold() -> f32 {
    0.5
}

fn default_looping() -> bool {
    true
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Static obstacle geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Axis-aligned box
    Box {
        /// Box centre
        center: Vec3,
        /// Half size along each axis
        half_extents: Vec3,
    },
    /// Sphere
    Sphere {
        /// Sphere centre
        center: Vec3,
        /// Radius
        radius: f32,
    },
}

/// A serializable headless run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// Agent tuning
    #[serde(default)]
    pub params: SteeringParams,
    /// Initially active behavior
    #[serde(default)]
    pub behavior: BehaviorKind,
    /// Agent spawn position
    #[serde(default)]
    pub position: Vec3,
    /// Agent spawn velocity
    #[serde(default)]
    pub velocity: Vec3,
    /// Optional moving target
    #[serde(default)]
    pub target: Option<TargetSpec>,
    /// Optional waypoint path
    #[serde(default)]
    pub path: Option<PathSpec>,
    /// Static obstacles
    #[serde(default)]
    pub obstacles: Vec<ObstacleShape>,
    /// Number of ticks to run
    pub ticks: u32,
    /// Fixed time step in seconds
    pub dt: f32,
    /// Seed for the agent's random source
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Scenario {
    /// Create a scenario with default tuning and no target, path or obstacles
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: SteeringParams::default(),
            behavior: BehaviorKind::default(),
            position: Vec3::ZERO,
            velocity: Vec3::Z,
            target: None,
            path: None,
            obstacles: Vec::new(),
            ticks: 600,
            dt: 1.0 / 60.0,
            seed: DEFAULT_SEED,
        }
    }

    /// Built-in patrol around a square with a box beside the second leg
    #[must_use]
    pub fn patrol() -> Self {
        Self {
            behavior: BehaviorKind::PathFollowing,
            path: Some(PathSpec {
                waypoints: vec![
                    Vec3::new(10.0, 0.0, 0.0),
                    Vec3::new(10.0, 0.0, 10.0),
                    Vec3::new(0.0, 0.0, 10.0),
                    Vec3::new(0.0, 0.0, 0.0),
                ],
                arrival_threshold: 0.75,
                looping: true,
            }),
            obstacles: vec![ObstacleShape::Box {
                center: Vec3::new(12.0, 0.0, 5.0),
                half_extents: Vec3::new(0.5, 1.0, 0.5),
            }],
            ..Self::new("Patrol")
        }
    }

    /// Check parameters and time step
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter, or a non-positive time step
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        Ok(())
    }

    /// Build the agent described by this scenario
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario does not validate
    pub fn build_agent(&self) -> Result<Agent, ConfigError> {
        self.validate()?;
        let mut agent = Agent::with_seed(self.params, self.position, self.velocity, self.seed)?;
        agent.set_behavior(self.behavior);
        if let Some(path) = &self.path {
            agent.configure_path(path.waypoints.clone(), path.arrival_threshold, path.looping);
        }
        if let Some(target) = &self.target {
            agent.set_target(target.position);
        }
        Ok(agent)
    }

    /// Build the obstacle world, ready for probing
    #[must_use]
    pub fn build_obstacles(&self) -> ObstacleWorld {
        let mut world = ObstacleWorld::new();
        for shape in &self.obstacles {
            world.add_shape(*shape);
        }
        world.refresh();
        world
    }

    /// Save the scenario to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a scenario from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let scenario: Scenario =
            ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        Ok(scenario)
    }

    /// Save the scenario to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a scenario from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let scenario: Scenario = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        Ok(scenario)
    }

    /// Load by file extension (`.json` is JSON, anything else RON)
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::load_json(path),
            _ => Self::load_ron(path),
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::patrol()
    }
}
