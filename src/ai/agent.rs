//! Single steered agent
//!
//! Owns everything one agent needs between ticks and runs the per-tick
//! pipeline: pick the behavior, compute its force, add avoidance, integrate.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::avoidance::{self, Avoidance, ObstacleSensor};
use super::behavior::{BehaviorKind, BehaviorSelector};
use super::path::WaypointPath;
use super::steering::{self, TargetObservation};
use super::wander::{self, WanderState};
use crate::core::{ConfigError, Drive, KinematicState, SteeringParams, integrate};

/// Seed used when none is given
pub const DEFAULT_SEED: u64 = 0x5EED;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Behavior that ran
    pub behavior: BehaviorKind,
    /// Combined force fed to the integrator (zero when wandering)
    pub force: Vec3,
    /// Avoidance share of `force`
    pub avoidance: Vec3,
    /// Wander wrote velocity directly
    pub direct_velocity: bool,
    /// The emergency unstick fired
    pub unstuck: bool,
}

impl TickReport {
    fn idle(behavior: BehaviorKind) -> Self {
        Self {
            behavior,
            force: Vec3::ZERO,
            avoidance: Vec3::ZERO,
            direct_velocity: false,
            unstuck: false,
        }
    }
}

/// An autonomous steered agent
#[derive(Debug, Clone)]
pub struct Agent {
    state: KinematicState,
    params: SteeringParams,
    selector: BehaviorSelector,
    wander: WanderState,
    path: WaypointPath,
    target: Option<TargetObservation>,
    rng: ChaCha8Rng,
}

impl Agent {
    /// Spawn an agent with the default seed
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not validate
    pub fn new(
        params: SteeringParams,
        position: Vec3,
        velocity: Vec3,
    ) -> Result<Self, ConfigError> {
        Self::with_seed(params, position, velocity, DEFAULT_SEED)
    }

    /// Spawn an agent whose random source is seeded with `seed`
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not validate
    pub fn with_seed(
        params: SteeringParams,
        position: Vec3,
        velocity: Vec3,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            state: KinematicState::new(position, velocity),
            params,
            selector: BehaviorSelector::default(),
            wander: WanderState::new(),
            path: WaypointPath::empty(),
            target: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Kinematic state
    #[must_use]
    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Tuning
    #[must_use]
    pub fn params(&self) -> &SteeringParams {
        &self.params
    }

    /// Active behavior
    #[must_use]
    pub fn behavior(&self) -> BehaviorKind {
        self.selector.active()
    }

    /// Behavior selector
    #[must_use]
    pub fn selector(&self) -> &BehaviorSelector {
        &self.selector
    }

    /// Waypoint path
    #[must_use]
    pub fn path(&self) -> &WaypointPath {
        &self.path
    }

    /// Wander circle state
    #[must_use]
    pub fn wander_state(&self) -> &WanderState {
        &self.wander
    }

    /// Tracked target, if any
    #[must_use]
    pub fn target(&self) -> Option<&TargetObservation> {
        self.target.as_ref()
    }

    /// Switch behavior from the next tick on
    pub fn set_behavior(&mut self, kind: BehaviorKind) {
        self.selector.set(kind);
    }

    /// Turn the additive avoidance layer on or off
    pub fn set_avoidance(&mut self, enabled: bool) {
        self.selector.set_avoidance(enabled);
    }

    /// Start tracking a target at `position`
    pub fn set_target(&mut self, position: Vec3) {
        self.target = Some(TargetObservation::new(position));
    }

    /// Refresh the tracked target's pose; starts tracking if none is set
    pub fn track_target(&mut self, position: Vec3) {
        self.target
            .get_or_insert_with(|| TargetObservation::new(position))
            .observe(position);
    }

    /// Stop tracking the target
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Replace the waypoint path; the cursor starts at the first waypoint
    pub fn configure_path(&mut self, waypoints: Vec<Vec3>, arrival_threshold: f32, looping: bool) {
        log::debug!(
            "Path configured: {} waypoints, threshold {arrival_threshold}, looping {looping}",
            waypoints.len()
        );
        self.path = WaypointPath::new(waypoints, arrival_threshold, looping);
    }

    /// Advance the agent by `dt` seconds.
    ///
    /// A non-positive or non-finite `dt` moves nothing. The target sample is
    /// latched after the force is computed in every case.
    pub fn tick<S: ObstacleSensor + ?Sized>(&mut self, dt: f32, sensor: &S) -> TickReport {
        let behavior = self.selector.active();

        if !(dt > 0.0 && dt.is_finite()) {
            self.latch_target();
            return TickReport::idle(behavior);
        }

        let report = if behavior == BehaviorKind::Wander {
            let velocity = wander::wander(
                &self.state,
                &self.params,
                &mut self.wander,
                &mut self.rng,
                dt,
            );
            integrate(&mut self.state, &self.params, Drive::Velocity(velocity), dt);
            TickReport {
                direct_velocity: true,
                ..TickReport::idle(behavior)
            }
        } else {
            let primary = self.primary_force(behavior, dt);
            let avoidance = if self.selector.avoidance_active() {
                avoidance::avoid(&self.state, &self.params, sensor, &mut self.rng)
            } else {
                Avoidance::default()
            };
            if let Some(yaw) = avoidance.unstick_yaw {
                self.state.rotate_yaw(yaw);
            }

            let force = primary + avoidance.force;
            integrate(&mut self.state, &self.params, Drive::Force(force), dt);
            TickReport {
                behavior,
                force,
                avoidance: avoidance.force,
                direct_velocity: false,
                unstuck: avoidance.unstick_yaw.is_some(),
            }
        };

        self.latch_target();

        log::trace!(
            "{behavior}: force {:?} -> pos {:?} vel {:?}",
            report.force,
            self.state.position,
            self.state.velocity
        );

        report
    }

    /// Force from the active behavior alone
    fn primary_force(&mut self, behavior: BehaviorKind, dt: f32) -> Vec3 {
        let state = &self.state;
        let params = &self.params;

        if behavior.needs_target() {
            let Some(target) = &self.target else {
                return Vec3::ZERO;
            };
            return match behavior {
                BehaviorKind::Seek => steering::seek(state, params, target.position),
                BehaviorKind::Flee => steering::flee(state, params, target.position),
                BehaviorKind::Arrive => steering::arrive(state, params, target.position),
                BehaviorKind::Evade => steering::evade(state, params, target, dt),
                BehaviorKind::Pursuit => steering::pursuit(state, params, target, dt),
                _ => Vec3::ZERO,
            };
        }

        match behavior {
            BehaviorKind::PathFollowing => self
                .path
                .next_point(state.position)
                .map_or(Vec3::ZERO, |waypoint| steering::seek(state, params, waypoint)),
            _ => Vec3::ZERO,
        }
    }

    fn latch_target(&mut self) {
        if let Some(target) = &mut self.target {
            target.latch();
        }
    }
}
