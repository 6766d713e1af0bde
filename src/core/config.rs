//! Per-agent steering configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or loading configuration.
///
/// Runtime steering never produces these; degenerate geometry resolves to a
/// zero force instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A parameter that must be strictly positive was not
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Parameter name
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// A parameter that must not be negative was
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Parameter name
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// World bounds with min above max
    #[error("invalid {axis} bounds: min {min} > max {max}")]
    InvalidBounds {
        /// Axis name (`x` or `z`)
        axis: &'static str,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },
    /// Scenario time step was not positive
    #[error("time step must be positive, got {0}")]
    InvalidTimeStep(f32),
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Axis-aligned horizontal clamp applied after position integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl WorldBounds {
    /// Square bounds centred on the origin
    #[must_use]
    pub fn square(half_extent: f32) -> Self {
        Self {
            min_x: -half_extent,
            max_x: half_extent,
            min_z: -half_extent,
            max_z: half_extent,
        }
    }

    /// Check if a horizontal coordinate pair lies inside
    #[must_use]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_z..=self.max_z).contains(&z)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_x <= self.max_x) {
            return Err(ConfigError::InvalidBounds {
                axis: "x",
                min: self.min_x,
                max: self.max_x,
            });
        }
        if !(self.min_z <= self.max_z) {
            return Err(ConfigError::InvalidBounds {
                axis: "z",
                min: self.min_z,
                max: self.max_z,
            });
        }
        Ok(())
    }
}

/// Immutable tuning for one agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringParams {
    /// Speed cap applied after every force step
    pub max_speed: f32,
    /// Magnitude cap on the combined steering force
    pub max_force: f32,
    /// Force divisor
    pub mass: f32,
    /// Distance inside which Arrive ramps speed down
    pub slowing_radius: f32,
    /// How far ahead Evade extrapolates the target
    pub evasion_prediction_time: f32,
    /// Radius of the wander circle
    pub wander_radius: f32,
    /// Distance of the wander circle ahead of the agent
    pub wander_distance: f32,
    /// Jitter applied to the wander target per second
    pub wander_jitter: f32,
    /// Range of the centre obstacle probe
    pub obstacle_detection_distance: f32,
    /// Magnitude of the avoidance force
    pub avoidance_strength: f32,
    /// Optional horizontal clamp
    pub bounds: Option<WorldBounds>,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            max_force: 5.0,
            mass: 1.0,
            slowing_radius: 5.0,
            evasion_prediction_time: 2.0,
            wander_radius: 1.0,
            wander_distance: 3.0,
            wander_jitter: 0.5,
            obstacle_detection_distance: 5.0,
            avoidance_strength: 10.0,
            bounds: None,
        }
    }
}

impl SteeringParams {
    /// Set speed and force caps
    #[must_use]
    pub fn with_limits(mut self, max_speed: f32, max_force: f32) -> Self {
        self.max_speed = max_speed;
        self.max_force = max_force;
        self
    }

    /// Set mass
    #[must_use]
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set world bounds
    #[must_use]
    pub fn with_bounds(mut self, bounds: WorldBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Check the parameters.
    ///
    /// # Errors
    ///
    /// Returns the first parameter that would break the pipeline: a
    /// non-positive speed, force, mass or slowing radius, a negative tuning
    /// value, or inverted bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("mass", self.mass),
            ("slowing_radius", self.slowing_radius),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("evasion_prediction_time", self.evasion_prediction_time),
            ("wander_radius", self.wander_radius),
            ("wander_distance", self.wander_distance),
            ("wander_jitter", self.wander_jitter),
            ("obstacle_detection_distance", self.obstacle_detection_distance),
            ("avoidance_strength", self.avoidance_strength),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        match &self.bounds {
            Some(bounds) => bounds.validate(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SteeringParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_mass() {
        let params = SteeringParams::default().with_mass(0.0);
        assert_eq!(
            params.validate(),
            Err(ConfigError::NonPositive {
                field: "mass",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_rejects_negative_speed_and_nan() {
        let params = SteeringParams::default().with_limits(-1.0, 5.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonPositive {
                field: "max_speed",
                ..
            })
        ));

        let params = SteeringParams {
            wander_jitter: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::Negative {
                field: "wander_jitter",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let params = SteeringParams::default().with_bounds(WorldBounds {
            min_x: 0.0,
            max_x: 10.0,
            min_z: 5.0,
            max_z: -5.0,
        });
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidBounds { axis: "z", .. })
        ));
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let params: SteeringParams = ron::from_str("(max_speed: 8.0)").unwrap();
        assert_eq!(params.max_speed, 8.0);
        assert_eq!(params.mass, 1.0);
        assert!(params.bounds.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::NonPositive {
            field: "mass",
            value: -2.0,
        };
        assert_eq!(err.to_string(), "mass must be positive, got -2");
    }
}
