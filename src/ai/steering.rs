//! Steering behaviors for AI movement
//!
//! Classic desired-velocity steering. Every function here returns
//! `desired_velocity - velocity`, leaving force and speed clamping to the
//! integrator.

use glam::Vec3;

use crate::core::{KinematicState, SteeringParams};

/// Pose samples of an external target.
///
/// `previous_position` trails `position` by one tick so the target's velocity
/// can be estimated without the target exposing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetObservation {
    /// Position pulled this tick
    pub position: Vec3,
    /// Position latched at the end of the previous tick
    pub previous_position: Vec3,
}

impl TargetObservation {
    /// Start observing a target that has not moved yet
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            previous_position: position,
        }
    }

    /// Record the target's current position
    pub fn observe(&mut self, position: Vec3) {
        self.position = position;
    }

    /// End-of-tick sampling; must run after the force for this tick is computed.
    pub fn latch(&mut self) {
        self.previous_position = self.position;
    }

    /// Finite-difference velocity over the last tick
    #[must_use]
    pub fn estimated_velocity(&self, dt: f32) -> Vec3 {
        if dt > 0.0 {
            (self.position - self.previous_position) / dt
        } else {
            Vec3::ZERO
        }
    }
}

/// Mirror `v` about the plane with unit normal `normal`
#[must_use]
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - 2.0 * v.dot(normal) * normal
}

/// Seek - head straight for the target at full speed
#[must_use]
pub fn seek(state: &KinematicState, params: &SteeringParams, target: Vec3) -> Vec3 {
    let desired = (target - state.position).normalize_or_zero() * params.max_speed;
    desired - state.velocity
}

/// Flee - head straight away from the target at full speed
#[must_use]
pub fn flee(state: &KinematicState, params: &SteeringParams, target: Vec3) -> Vec3 {
    let desired = (state.position - target).normalize_or_zero() * params.max_speed;
    desired - state.velocity
}

/// Distance below which Arrive treats the target as reached
pub const ARRIVE_STOP_DISTANCE: f32 = 0.1;

/// Arrive - seek, ramping speed down linearly inside the slowing radius
#[must_use]
pub fn arrive(state: &KinematicState, params: &SteeringParams, target: Vec3) -> Vec3 {
    let to_target = target - state.position;
    let distance = to_target.length();

    if distance < ARRIVE_STOP_DISTANCE {
        return -state.velocity;
    }

    let ramped_speed = params.max_speed * distance / params.slowing_radius;
    let clamped_speed = ramped_speed.min(params.max_speed);

    let desired = (to_target / distance) * clamped_speed;
    desired - state.velocity
}

/// Evade - flee from where the target will be after the prediction time
#[must_use]
pub fn evade(
    state: &KinematicState,
    params: &SteeringParams,
    target: &TargetObservation,
    dt: f32,
) -> Vec3 {
    let target_velocity = target.estimated_velocity(dt);
    let mut future = target.position + target_velocity * params.evasion_prediction_time;
    // Stay on the agent's movement plane
    future.y = state.position.y;
    flee(state, params, future)
}

/// Pursuit - seek the target's predicted interception point
#[must_use]
pub fn pursuit(
    state: &KinematicState,
    params: &SteeringParams,
    target: &TargetObservation,
    dt: f32,
) -> Vec3 {
    let target_velocity = target.estimated_velocity(dt);
    let closing_speed = params.max_speed + target_velocity.length();
    if closing_speed <= f32::EPSILON {
        return seek(state, params, target.position);
    }

    let prediction_time = state.position.distance(target.position) / closing_speed;
    let predicted = target.position + target_velocity * prediction_time;
    seek(state, params, predicted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SteeringParams {
        SteeringParams::default()
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_seek() {
        let state = KinematicState::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let force = seek(&state, &params(), Vec3::new(10.0, 0.0, 0.0));

        assert!(approx(force, Vec3::new(5.0, 0.0, -1.0)));
    }

    #[test]
    fn test_seek_on_target_brakes() {
        let state = KinematicState::new(Vec3::ONE, Vec3::new(2.0, 0.0, 0.0));
        let force = seek(&state, &params(), Vec3::ONE);

        assert_eq!(force, -state.velocity());
        assert!(force.is_finite());
    }

    #[test]
    fn test_flee() {
        let state = KinematicState::new(Vec3::ZERO, Vec3::ZERO);
        let force = flee(&state, &params(), Vec3::new(10.0, 0.0, 0.0));

        assert!(approx(force, Vec3::new(-5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_arrive_outside_slowing_radius() {
        let state = KinematicState::new(Vec3::ZERO, Vec3::ZERO);
        let force = arrive(&state, &params(), Vec3::new(0.0, 0.0, 8.0));

        // Zero velocity, so force == desired
        assert!((force.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_arrive_slowing() {
        let state = KinematicState::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let target = Vec3::new(2.0, 0.0, 0.0);
        let force = arrive(&state, &params(), target);

        let desired = force + state.velocity();
        // 5 * 2 / 5
        assert!((desired.length() - 2.0).abs() < 1e-4);
        assert!(approx(desired.normalize(), Vec3::X));
    }

    #[test]
    fn test_arrive_within_stop_distance() {
        let state = KinematicState::new(Vec3::ZERO, Vec3::new(0.3, 0.0, -0.4));
        let force = arrive(&state, &params(), Vec3::new(0.05, 0.0, 0.0));

        assert_eq!(force, -state.velocity());
    }

    #[test]
    fn test_stationary_target_prediction_matches_seek_and_flee() {
        let state = KinematicState::new(Vec3::new(1.0, 0.0, 2.0), Vec3::new(0.5, 0.0, 0.5));
        let target = TargetObservation::new(Vec3::new(-4.0, 0.0, 7.0));

        assert_eq!(
            pursuit(&state, &params(), &target, 0.016),
            seek(&state, &params(), target.position)
        );
        assert_eq!(
            evade(&state, &params(), &target, 0.016),
            flee(&state, &params(), target.position)
        );
    }

    #[test]
    fn test_pursuit_leads_moving_target() {
        let state = KinematicState::new(Vec3::ZERO, Vec3::ZERO);
        let mut target = TargetObservation::new(Vec3::new(10.0, 0.0, 0.0));
        target.observe(Vec3::new(10.0, 0.0, 0.1));

        let force = pursuit(&state, &params(), &target, 0.1);
        // Target moves +Z at 1 unit/s, so the intercept is ahead of it
        assert!(force.z > 0.0);
        assert!(force.x > 0.0);
    }

    #[test]
    fn test_evade_holds_agent_height() {
        let state = KinematicState::new(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO);
        let mut target = TargetObservation::new(Vec3::new(5.0, 0.0, 0.0));
        target.observe(Vec3::new(5.0, 1.0, 0.0));

        let force = evade(&state, &params(), &target, 0.5);
        assert!(force.y.abs() < 1e-6);
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_estimated_velocity_guards_zero_dt() {
        let mut target = TargetObservation::new(Vec3::ZERO);
        target.observe(Vec3::X);

        assert_eq!(target.estimated_velocity(0.0), Vec3::ZERO);
        assert!(approx(target.estimated_velocity(0.5), Vec3::new(2.0, 0.0, 0.0)));

        target.latch();
        assert_eq!(target.estimated_velocity(0.5), Vec3::ZERO);
    }

    #[test]
    fn test_reflect() {
        let reflected = reflect(Vec3::new(1.0, 0.0, 1.0), Vec3::NEG_Z);
        assert!(approx(reflected, Vec3::new(1.0, 0.0, -1.0)));
    }
}
