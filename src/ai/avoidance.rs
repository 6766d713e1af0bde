//! Obstacle avoidance from three ray probes
//!
//! Probes are cast straight ahead and 30 degrees to either side. Hits push the
//! agent along the reflection of its facing about the hit surface.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use rand::Rng;

use super::steering::reflect;
use crate::core::{KinematicState, SteeringParams};

/// Yaw offset of the side probes
pub const SIDE_PROBE_ANGLE: f32 = std::f32::consts::PI / 6.0;
/// Side probe range relative to the centre probe
pub const SIDE_PROBE_RANGE: f32 = 0.75;
/// Side probe weight relative to the centre probe
pub const SIDE_PROBE_WEIGHT: f32 = 0.5;
/// Speed under which a blocked agent counts as stuck
pub const STUCK_SPEED: f32 = 0.1;
/// Backward push applied when unsticking
pub const UNSTICK_IMPULSE: f32 = 15.0;

/// Result of a single ray probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleProbe {
    /// Whether anything was hit
    pub hit: bool,
    /// Distance to the hit
    pub distance: f32,
    /// Surface normal at the hit (meaningless on a miss)
    pub normal: Vec3,
}

impl ObstacleProbe {
    /// Nothing in range
    pub const MISS: Self = Self {
        hit: false,
        distance: 0.0,
        normal: Vec3::ZERO,
    };

    /// A hit at `distance` with surface `normal`
    #[must_use]
    pub fn hit(distance: f32, normal: Vec3) -> Self {
        Self {
            hit: true,
            distance,
            normal,
        }
    }
}

/// Directional distance queries against the environment
pub trait ObstacleSensor {
    /// Cast a ray from `origin` along `direction` up to `max_distance`
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ObstacleProbe;
}

impl<F> ObstacleSensor for F
where
    F: Fn(Vec3, Vec3, f32) -> ObstacleProbe,
{
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ObstacleProbe {
        self(origin, direction, max_distance)
    }
}

/// Sensor for open space
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ObstacleSensor for NoObstacles {
    fn probe(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> ObstacleProbe {
        ObstacleProbe::MISS
    }
}

/// Avoidance contribution for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Avoidance {
    /// Force to add to the active behavior's force
    pub force: Vec3,
    /// Yaw the agent must turn by to escape a wedge, if it is stuck
    pub unstick_yaw: Option<f32>,
}

/// Probe around the agent and synthesize an avoidance force.
///
/// Calls the sensor exactly three times.
pub fn avoid<S, R>(
    state: &KinematicState,
    params: &SteeringParams,
    sensor: &S,
    rng: &mut R,
) -> Avoidance
where
    S: ObstacleSensor + ?Sized,
    R: Rng + ?Sized,
{
    let forward = state.forward;
    let center_range = params.obstacle_detection_distance;
    let side_range = center_range * SIDE_PROBE_RANGE;
    let side_strength = params.avoidance_strength * SIDE_PROBE_WEIGHT;

    let probes = [
        (forward, center_range, params.avoidance_strength),
        (
            Quat::from_rotation_y(-SIDE_PROBE_ANGLE) * forward,
            side_range,
            side_strength,
        ),
        (
            Quat::from_rotation_y(SIDE_PROBE_ANGLE) * forward,
            side_range,
            side_strength,
        ),
    ];

    let mut accumulated = Vec3::ZERO;
    let mut any_hit = false;
    for (direction, range, strength) in probes {
        let probe = sensor.probe(state.position, direction, range);
        if probe.hit {
            any_hit = true;
            accumulated += reflect(forward, probe.normal) * strength;
        }
    }

    if !any_hit {
        return Avoidance::default();
    }

    let mut unstick_yaw = None;
    if state.speed() < STUCK_SPEED {
        let yaw = rng.gen_range(-FRAC_PI_2..=FRAC_PI_2);
        let turned = Quat::from_rotation_y(yaw) * forward;
        accumulated += -turned * UNSTICK_IMPULSE;
        log::debug!("Agent wedged at {:?}, turning {:.1} deg", state.position, yaw.to_degrees());
        unstick_yaw = Some(yaw);
    }

    Avoidance {
        force: accumulated.normalize_or_zero() * params.avoidance_strength,
        unstick_yaw,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Hits only rays within a small angle of `direction`
    struct WallAhead {
        direction: Vec3,
        normal: Vec3,
        calls: Cell<u32>,
    }

    impl ObstacleSensor for WallAhead {
        fn probe(&self, _origin: Vec3, direction: Vec3, max_distance: f32) -> ObstacleProbe {
            self.calls.set(self.calls.get() + 1);
            if direction.dot(self.direction) > 0.99 {
                ObstacleProbe::hit(max_distance * 0.5, self.normal)
            } else {
                ObstacleProbe::MISS
            }
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    #[test]
    fn test_no_hits_no_force() {
        let state = KinematicState::new(Vec3::ZERO, Vec3::Z);
        let result = avoid(&state, &SteeringParams::default(), &NoObstacles, &mut rng());
        assert_eq!(result, Avoidance::default());
    }

    #[test]
    fn test_center_hit_reflects_forward() {
        let forward = Vec3::new(1.0, 0.0, 1.0).normalize();
        let normal = Vec3::NEG_Z;
        let sensor = WallAhead {
            direction: forward,
            normal,
            calls: Cell::new(0),
        };
        let state = KinematicState::new(Vec3::ZERO, forward * 3.0);
        let params = SteeringParams::default();

        let result = avoid(&state, &params, &sensor, &mut rng());

        let expected = reflect(forward, normal).normalize() * params.avoidance_strength;
        assert!((result.force - expected).length() < 1e-4);
        assert_eq!(result.unstick_yaw, None);
        assert_eq!(sensor.calls.get(), 3);
    }

    #[test]
    fn test_side_probe_ranges() {
        let params = SteeringParams {
            obstacle_detection_distance: 8.0,
            ..Default::default()
        };
        let ranges = std::cell::RefCell::new(Vec::new());
        let sensor = |_: Vec3, _: Vec3, range: f32| {
            ranges.borrow_mut().push(range);
            ObstacleProbe::MISS
        };
        let state = KinematicState::new(Vec3::ZERO, Vec3::Z);

        let _ = avoid(&state, &params, &sensor, &mut rng());
        assert_eq!(*ranges.borrow(), vec![8.0, 6.0, 6.0]);
    }

    #[test]
    fn test_side_probes_yaw_thirty_degrees() {
        let directions = std::cell::RefCell::new(Vec::new());
        let sensor = |_: Vec3, direction: Vec3, _: f32| {
            directions.borrow_mut().push(direction);
            ObstacleProbe::MISS
        };
        let state = KinematicState::new(Vec3::ZERO, Vec3::Z * 2.0);

        let _ = avoid(&state, &SteeringParams::default(), &sensor, &mut rng());

        let directions = directions.borrow();
        let half = 0.5_f32;
        let cos = 3.0_f32.sqrt() / 2.0;
        assert_eq!(directions.len(), 3);
        assert!((directions[0] - Vec3::Z).length() < 1e-5);
        assert!((directions[1] - Vec3::new(-half, 0.0, cos)).length() < 1e-5);
        assert!((directions[2] - Vec3::new(half, 0.0, cos)).length() < 1e-5);
        for side in &directions[1..] {
            assert!((side.angle_between(Vec3::Z) - SIDE_PROBE_ANGLE).abs() < 1e-4);
        }
    }

    #[test]
    fn test_side_hit_weighs_half() {
        let forward = Vec3::Z;
        let center_normal = Vec3::NEG_Z;
        let side_normal = Vec3::new(-1.0, 0.0, -1.0).normalize();
        let sensor = |_: Vec3, direction: Vec3, range: f32| {
            if direction.dot(forward) > 0.99 {
                ObstacleProbe::hit(range * 0.5, center_normal)
            } else if direction.x > 0.4 {
                ObstacleProbe::hit(range * 0.5, side_normal)
            } else {
                ObstacleProbe::MISS
            }
        };
        let params = SteeringParams::default();
        let strength = params.avoidance_strength;
        let state = KinematicState::new(Vec3::ZERO, forward * 3.0);

        let result = avoid(&state, &params, &sensor, &mut rng());

        let expected = (reflect(forward, center_normal) * strength
            + reflect(forward, side_normal) * strength * SIDE_PROBE_WEIGHT)
            .normalize()
            * strength;
        assert!((result.force - expected).length() < 1e-4);
        // Equal weights would point elsewhere
        let unweighted = (reflect(forward, center_normal) + reflect(forward, side_normal))
            .normalize()
            * strength;
        assert!((result.force - unweighted).length() > 0.5);
    }

    #[test]
    fn test_stuck_agent_gets_unstick() {
        let sensor = WallAhead {
            direction: Vec3::Z,
            normal: Vec3::NEG_Z,
            calls: Cell::new(0),
        };
        let state = KinematicState::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.05));
        let params = SteeringParams::default();

        let result = avoid(&state, &params, &sensor, &mut rng());

        let yaw = result.unstick_yaw.expect("stuck agent should turn");
        assert!((-FRAC_PI_2..=FRAC_PI_2).contains(&yaw));
        assert!((result.force.length() - params.avoidance_strength).abs() < 1e-4);
        // Reflection and backward push both point away from the wall
        assert!(result.force.z < 0.0);
    }
}
