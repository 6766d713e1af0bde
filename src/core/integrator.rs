//! Per-tick integration of velocity, position and facing

use glam::Vec3;

use super::{KinematicState, SteeringParams};

/// Rate at which speed is pulled toward `max_speed`, per second
pub const SPEED_DECAY_RATE: f32 = 2.0;

/// What drives the velocity this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drive {
    /// Steering force, clamped by `max_force` and scaled by mass
    Force(Vec3),
    /// Velocity written directly (wander), bypassing the force clamp
    Velocity(Vec3),
}

/// Advance `state` by `dt`.
pub fn integrate(state: &mut KinematicState, params: &SteeringParams, drive: Drive, dt: f32) {
    match drive {
        Drive::Force(force) => {
            let acceleration = force.clamp_length_max(params.max_force) / params.mass;
            state.velocity = (state.velocity + acceleration).clamp_length_max(params.max_speed);
        }
        Drive::Velocity(velocity) => state.velocity = velocity,
    }

    // Pull speed toward max speed along the current heading
    let cruise = state.velocity.normalize_or_zero() * params.max_speed;
    let t = (dt * SPEED_DECAY_RATE).clamp(0.0, 1.0);
    state.velocity = state.velocity.lerp(cruise, t);

    state.position += state.velocity * dt;
    if let Some(bounds) = &params.bounds {
        state.position.x = state.position.x.clamp(bounds.min_x, bounds.max_x);
        state.position.z = state.position.z.clamp(bounds.min_z, bounds.max_z);
    }

    state.align_to_velocity();
}
