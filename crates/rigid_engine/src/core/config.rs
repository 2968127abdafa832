//! Simulation configuration
//!
//! All tunable constants of the simulation in one serializable structure,
//! loadable from TOML with per-field defaults so partial config files work.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value the simulation cannot run with
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The TOML source failed to parse
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
}

/// Tunable parameters of the simulation core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed sub-step length in seconds
    pub substep_seconds: f32,
    /// Collision-boundary padding around broadphase boxes, in meters
    pub collision_margin: f32,
    /// Per-sub-step cap on rotation, in radians
    pub max_rotation_per_step: f32,
    /// World scale: how many world units make one meter
    pub unit_meter: f32,
    /// Cap on accumulated unsimulated time, in seconds
    pub max_accumulated_time: f32,
    /// Minimum advancement distance for swept collision, in meters
    pub ccd_tolerance: f32,
    /// Squared speed below which a body counts as resting
    pub sleep_velocity_threshold: f32,
    /// Consecutive resting sub-steps before a body sleeps
    pub sleep_steps: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            substep_seconds: 1.0 / 120.0,
            collision_margin: 0.04,
            max_rotation_per_step: 0.25,
            unit_meter: 1.0,
            max_accumulated_time: 0.25,
            ccd_tolerance: 1e-3,
            sleep_velocity_threshold: 1e-4,
            sleep_steps: 60,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field for values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.substep_seconds > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "substep_seconds must be positive, got {}",
                self.substep_seconds
            )));
        }
        if self.collision_margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "collision_margin must be non-negative, got {}",
                self.collision_margin
            )));
        }
        if !(self.max_rotation_per_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_rotation_per_step must be positive, got {}",
                self.max_rotation_per_step
            )));
        }
        if !(self.unit_meter > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "unit_meter must be positive, got {}",
                self.unit_meter
            )));
        }
        if !(self.max_accumulated_time >= self.substep_seconds) {
            return Err(ConfigError::Invalid(format!(
                "max_accumulated_time ({}) must cover at least one sub-step ({})",
                self.max_accumulated_time, self.substep_seconds
            )));
        }
        if !(self.ccd_tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ccd_tolerance must be positive, got {}",
                self.ccd_tolerance
            )));
        }
        Ok(())
    }

    /// Set the fixed sub-step length
    pub fn with_substep_seconds(mut self, substep_seconds: f32) -> Self {
        self.substep_seconds = substep_seconds;
        self
    }

    /// Set the broadphase padding margin
    pub fn with_collision_margin(mut self, collision_margin: f32) -> Self {
        self.collision_margin = collision_margin;
        self
    }

    /// Set the world scale in units per meter
    pub fn with_unit_meter(mut self, unit_meter: f32) -> Self {
        self.unit_meter = unit_meter;
        self
    }

    /// Set the sleep thresholds
    pub fn with_sleeping(mut self, velocity_threshold: f32, steps: u32) -> Self {
        self.sleep_velocity_threshold = velocity_threshold;
        self.sleep_steps = steps;
        self
    }
}
