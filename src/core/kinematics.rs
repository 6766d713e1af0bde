//! Kinematic state of a steered agent

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, velocity and facing of an agent.
///
/// Fields are read-only from outside the crate; the integrator is the only
/// writer once the agent is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    pub(crate) position: Vec3,
    pub(crate) velocity: Vec3,
    pub(crate) forward: Vec3,
}

impl KinematicState {
    /// Create a state at `position` moving with `velocity`.
    ///
    /// Forward starts along the velocity, or local +Z when at rest.
    #[must_use]
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        let forward = velocity.try_normalize().unwrap_or(Vec3::Z);
        Self {
            position,
            velocity,
            forward,
        }
    }

    /// World position
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Linear velocity
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Unit facing direction
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Current speed
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Orientation that maps local +Z onto `forward`
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_arc(Vec3::Z, self.forward)
    }

    /// Transform a point from agent-local space into world space.
    #[must_use]
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation() * local
    }

    /// Re-derive forward from velocity. No-op while stationary.
    pub(crate) fn align_to_velocity(&mut self) {
        if let Some(direction) = self.velocity.try_normalize() {
            self.forward = direction;
        }
    }

    /// Turn the facing about +Y by `radians`.
    pub(crate) fn rotate_yaw(&mut self, radians: f32) {
        self.forward = (Quat::from_rotation_y(radians) * self.forward).normalize_or_zero();
    }
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}
