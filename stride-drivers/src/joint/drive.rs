//! Position-tracking joint drive
//!
//! Moves toward its target at no more than `max_velocity`, clamped to the
//! travel limits. A target beyond a limit parks the joint at the limit.

use libm::fabsf;

use stride_core::config::JointConfig;
use stride_core::traits::JointDrive;

/// Simulated joint with travel limits and a velocity ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionDrive {
    position: f32,
    target: f32,
    min: f32,
    max: f32,
    /// Fastest tracking speed, per second
    max_velocity: f32,
}

impl PositionDrive {
    /// Create a drive holding `position`
    pub fn new(position: f32, min: f32, max: f32, max_velocity: f32) -> Self {
        let position = position.clamp(min, max);
        Self {
            position,
            target: position,
            min,
            max,
            max_velocity,
        }
    }

    /// Create a drive from joint settings
    pub fn from_config(position: f32, config: &JointConfig) -> Self {
        Self::new(position, config.min, config.max, config.max_velocity)
    }

    /// Track the target for `dt` seconds
    pub fn integrate(&mut self, dt: f32) {
        let goal = self.target.clamp(self.min, self.max);
        let error = goal - self.position;
        let max_step = self.max_velocity * dt;

        if fabsf(error) <= max_step {
            self.position = goal;
        } else if error > 0.0 {
            self.position += max_step;
        } else {
            self.position -= max_step;
        }
    }

    /// Get the commanded target
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check whether the joint rests on a travel limit
    pub fn at_limit(&self) -> bool {
        self.position <= self.min || self.position >= self.max
    }
}

impl JointDrive for PositionDrive {
    fn position(&self) -> f32 {
        self.position
    }

    fn set_drive_target(&mut self, target: f32) {
        self.target = target;
    }
}
