//! Wander behavior - smooth random motion
//!
//! Unlike the other behaviors, wander blends straight into velocity and
//! skips the force/mass clamp. Agents wandering with the same seed trace the
//! same path.

use glam::Vec3;
use rand::Rng;

use crate::core::{KinematicState, SteeringParams};

/// Jittered point on the wander circle, in agent-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderState {
    target: Vec3,
}

impl WanderState {
    /// Start with the wander point straight ahead
    #[must_use]
    pub fn new() -> Self {
        Self { target: Vec3::Z }
    }

    /// Current local wander point
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Nudge the wander point and snap it back onto the circle
    fn jitter<R: Rng + ?Sized>(&mut self, params: &SteeringParams, rng: &mut R, dt: f32) {
        let step = params.wander_jitter * dt;
        self.target += Vec3::new(
            rng.gen_range(-1.0_f32..=1.0) * step,
            0.0,
            rng.gen_range(-1.0_f32..=1.0) * step,
        );
        self.target = self.target.normalize_or_zero() * params.wander_radius;
    }
}

impl Default for WanderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance the wander point and return the agent's new velocity.
#[must_use]
pub fn wander<R: Rng + ?Sized>(
    state: &KinematicState,
    params: &SteeringParams,
    wander: &mut WanderState,
    rng: &mut R,
    dt: f32,
) -> Vec3 {
    wander.jitter(params, rng, dt);

    let local = wander.target + Vec3::Z * params.wander_distance;
    let mut world = state.local_to_world(local);
    world.y = state.position.y;

    let mut desired = (world - state.position).normalize_or_zero() * params.max_speed;
    desired.y = 0.0;

    let mut velocity = state.velocity + (desired - state.velocity) * dt;
    velocity.y = 0.0;
    velocity
}
