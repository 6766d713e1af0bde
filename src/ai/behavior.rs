//! Behavior selection

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of steering behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BehaviorKind {
    /// Head for the target
    #[default]
    Seek,
    /// Run from the target
    Flee,
    /// Run from where the target is heading
    Evade,
    /// Approach the target and stop on it
    Arrive,
    /// Intercept the target
    Pursuit,
    /// Random smooth roaming
    Wander,
    /// Walk the configured waypoint path
    PathFollowing,
    /// Only steer around obstacles
    ObstacleAvoidance,
}

impl BehaviorKind {
    /// Every behavior, in selector order
    pub const ALL: [Self; 8] = [
        Self::Seek,
        Self::Flee,
        Self::Evade,
        Self::Arrive,
        Self::Pursuit,
        Self::Wander,
        Self::PathFollowing,
        Self::ObstacleAvoidance,
    ];

    /// Display name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Seek => "Seek",
            Self::Flee => "Flee",
            Self::Evade => "Evade",
            Self::Arrive => "Arrive",
            Self::Pursuit => "Pursuit",
            Self::Wander => "Wander",
            Self::PathFollowing => "PathFollowing",
            Self::ObstacleAvoidance => "ObstacleAvoidance",
        }
    }

    /// Whether the behavior steers relative to a target
    #[must_use]
    pub fn needs_target(self) -> bool {
        matches!(
            self,
            Self::Seek | Self::Flee | Self::Evade | Self::Arrive | Self::Pursuit
        )
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Active behavior plus the additive avoidance layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorSelector {
    active: BehaviorKind,
    avoidance: bool,
}

impl BehaviorSelector {
    /// Select `active` with avoidance layered on top
    #[must_use]
    pub fn new(active: BehaviorKind) -> Self {
        Self {
            active,
            avoidance: true,
        }
    }

    /// Currently active behavior
    #[must_use]
    pub fn active(&self) -> BehaviorKind {
        self.active
    }

    /// Switch behavior. Returns whether it changed.
    pub fn set(&mut self, kind: BehaviorKind) -> bool {
        if kind == self.active {
            return false;
        }
        log::debug!("Switched to {kind}");
        self.active = kind;
        true
    }

    /// Whether avoidance is summed into the active force this tick
    #[must_use]
    pub fn avoidance_active(&self) -> bool {
        self.avoidance && self.active != BehaviorKind::Wander
    }

    /// Enable or disable the additive avoidance layer
    pub fn set_avoidance(&mut self, enabled: bool) {
        self.avoidance = enabled;
    }
}

impl Default for BehaviorSelector {
    fn default() -> Self {
        Self::new(BehaviorKind::default())
    }
}
