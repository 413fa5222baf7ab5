//! Configuration type definitions

use core::fmt;

use crate::joint::JointMotionParams;
use crate::motion::profile::{ProfileAxis, ProfileParams};
use crate::motion::MotionError;
use crate::scheduler::TickMode;
use crate::traits::JointKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A derived motion request would be rejected
    Motion(MotionError),
    /// Batch tick budget is zero
    InvalidTickBudget,
    /// Kinematic rates or epsilons are out of range
    InvalidKinematic,
    /// Joint travel limits are inverted or not finite
    InvalidJointLimits(JointKind),
    /// Stored layout version differs from this build
    VersionMismatch,
}

impl From<MotionError> for ConfigError {
    fn from(e: MotionError) -> Self {
        ConfigError::Motion(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Motion(e) => write!(f, "invalid motion settings: {}", e),
            ConfigError::InvalidTickBudget => f.write_str("max_ticks must be at least 1"),
            ConfigError::InvalidKinematic => f.write_str("kinematic rates and epsilons must be positive"),
            ConfigError::InvalidJointLimits(kind) => {
                write!(f, "{} joint limits must be finite with min < max", kind.label())
            }
            ConfigError::VersionMismatch => f.write_str("configuration version mismatch"),
        }
    }
}

/// Force-driven agent body settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Body mass (kg)
    pub mass: f32,
    /// Moment of inertia about the vertical axis
    pub moment_of_inertia: f32,
    /// Linear damping coefficient
    pub linear_damping: f32,
    /// Angular damping coefficient
    pub angular_damping: f32,
    /// Walking cruise speed (m/s)
    pub move_speed: f32,
    /// Walking acceleration (m/s^2)
    pub move_acceleration: f32,
    /// Turning cruise speed (deg/s)
    pub turn_speed: f32,
    /// Turning acceleration (deg/s^2)
    pub turn_acceleration: f32,
    /// Convergence tolerance on displacement dispersion
    pub tolerance: f32,
    /// Simulated-time limit per movement (s)
    pub max_elapsed_s: f32,
    /// Convergence ring size
    pub cache_size: usize,
    /// Move back to the start position after a collision
    pub return_to_origin_on_failure: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            moment_of_inertia: 1.0,
            linear_damping: 0.5,
            angular_damping: 0.5,
            move_speed: 1.0,
            move_acceleration: 1.0,
            turn_speed: 90.0,
            turn_acceleration: 180.0,
            tolerance: 1e-4,
            max_elapsed_s: 10.0,
            cache_size: 10,
            return_to_origin_on_failure: true,
        }
    }
}

impl AgentConfig {
    /// Build profile parameters for a signed walk distance (m)
    pub fn move_params(&self, distance: f32, tick_duration: f32) -> ProfileParams {
        let params = ProfileParams::new(
            ProfileAxis::Linear,
            distance,
            self.move_speed,
            self.move_acceleration,
            self.mass,
        );
        self.apply_limits(params, tick_duration)
    }

    /// Build profile parameters for a signed turn (deg)
    pub fn turn_params(&self, degrees: f32, tick_duration: f32) -> ProfileParams {
        let params = ProfileParams::new(
            ProfileAxis::Angular,
            degrees,
            self.turn_speed,
            self.turn_acceleration,
            self.moment_of_inertia,
        );
        self.apply_limits(params, tick_duration)
    }

    fn apply_limits(&self, params: ProfileParams, tick_duration: f32) -> ProfileParams {
        params
            .with_tolerance(self.tolerance)
            .with_timeout(self.max_elapsed_s)
            .with_cache_size(self.cache_size)
            .with_tick_duration(tick_duration)
            .returning_to_origin(self.return_to_origin_on_failure)
    }
}

/// Kinematic (teleport-capable) property settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KinematicConfig {
    /// Translation rate (m/s)
    pub translation_rate: f32,
    /// Rotation rate (deg/s)
    pub rotation_rate: f32,
    /// Terminal epsilon on squared distance (m^2)
    pub position_epsilon: f32,
    /// Terminal epsilon on angle (deg)
    pub rotation_epsilon: f32,
    /// Terminal epsilon on scalar values
    pub scalar_epsilon: f32,
    /// Roll back to the start value after a collision
    pub return_to_origin_on_failure: bool,
}

impl Default for KinematicConfig {
    fn default() -> Self {
        Self {
            translation_rate: 0.5,
            rotation_rate: 90.0,
            position_epsilon: 1e-6,
            rotation_epsilon: 1e-3,
            scalar_epsilon: 1e-4,
            return_to_origin_on_failure: false,
        }
    }
}

impl KinematicConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let rates_ok = [self.translation_rate, self.rotation_rate]
            .iter()
            .all(|r| !r.is_nan() && *r > 0.0);
        let epsilons_ok = [self.position_epsilon, self.rotation_epsilon, self.scalar_epsilon]
            .iter()
            .all(|e| e.is_finite() && *e >= 0.0);
        if rates_ok && epsilons_ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidKinematic)
        }
    }
}

/// One joint axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JointConfig {
    /// Drive speed per second
    pub speed: f32,
    /// Convergence tolerance
    pub tolerance: f32,
    /// Simulated-time limit per movement (s)
    pub max_elapsed_s: f32,
    /// Convergence ring size
    pub cache_size: usize,
    /// Lower travel limit
    pub min: f32,
    /// Upper travel limit
    pub max: f32,
    /// Fastest the drive can track its target, per second
    pub max_velocity: f32,
}

impl Default for JointConfig {
    fn default() -> Self {
        Self {
            speed: 0.2,
            tolerance: 1e-4,
            max_elapsed_s: 10.0,
            cache_size: 10,
            min: 0.0,
            max: 1.0,
            max_velocity: 0.5,
        }
    }
}

impl JointConfig {
    /// Build joint parameters for a signed displacement
    pub fn params(&self, displacement: f32, tick_duration: f32) -> JointMotionParams {
        JointMotionParams {
            displacement,
            speed: self.speed,
            tolerance: self.tolerance,
            max_elapsed_time: self.max_elapsed_s,
            cache_size: self.cache_size,
            tick_duration,
        }
    }
}

/// Settings for every joint axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JointsConfig {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "axis::lift"))]
    pub lift: JointConfig,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "axis::extend"))]
    pub extend: JointConfig,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "axis::rotate"))]
    pub rotate: JointConfig,
}

impl Default for JointsConfig {
    fn default() -> Self {
        Self {
            lift: JointConfig {
                min: 0.0,
                max: 1.1,
                ..JointConfig::default()
            },
            extend: JointConfig {
                min: 0.0,
                max: 0.52,
                ..JointConfig::default()
            },
            rotate: JointConfig {
                speed: 45.0,
                tolerance: 1e-2,
                min: -90.0,
                max: 90.0,
                max_velocity: 120.0,
                ..JointConfig::default()
            },
        }
    }
}

impl JointsConfig {
    /// Get one axis
    pub fn get(&self, kind: JointKind) -> &JointConfig {
        match kind {
            JointKind::Lift => &self.lift,
            JointKind::Extend => &self.extend,
            JointKind::Rotate => &self.rotate,
        }
    }
}

/// Per-axis joint deserialization
///
/// A partial axis section in a text format is filled from that axis's own
/// defaults, not from [`JointConfig::default`]. Binary input always carries
/// every field.
#[cfg(feature = "serde")]
mod axis {
    use serde::{Deserialize, Deserializer};

    use super::{JointConfig, JointsConfig};

    /// Keys present in one axis section
    #[derive(Deserialize)]
    struct JointPatch {
        speed: Option<f32>,
        tolerance: Option<f32>,
        max_elapsed_s: Option<f32>,
        cache_size: Option<usize>,
        min: Option<f32>,
        max: Option<f32>,
        max_velocity: Option<f32>,
    }

    impl JointPatch {
        fn over(self, base: JointConfig) -> JointConfig {
            JointConfig {
                speed: self.speed.unwrap_or(base.speed),
                tolerance: self.tolerance.unwrap_or(base.tolerance),
                max_elapsed_s: self.max_elapsed_s.unwrap_or(base.max_elapsed_s),
                cache_size: self.cache_size.unwrap_or(base.cache_size),
                min: self.min.unwrap_or(base.min),
                max: self.max.unwrap_or(base.max),
                max_velocity: self.max_velocity.unwrap_or(base.max_velocity),
            }
        }
    }

    fn with_base<'de, D: Deserializer<'de>>(deserializer: D, base: JointConfig) -> Result<JointConfig, D::Error> {
        if deserializer.is_human_readable() {
            Ok(JointPatch::deserialize(deserializer)?.over(base))
        } else {
            JointConfig::deserialize(deserializer)
        }
    }

    pub fn lift<'de, D: Deserializer<'de>>(deserializer: D) -> Result<JointConfig, D::Error> {
        with_base(deserializer, JointsConfig::default().lift)
    }

    pub fn extend<'de, D: Deserializer<'de>>(deserializer: D) -> Result<JointConfig, D::Error> {
        with_base(deserializer, JointsConfig::default().extend)
    }

    pub fn rotate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<JointConfig, D::Error> {
        with_base(deserializer, JointsConfig::default().rotate)
    }
}

/// Complete motion configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Layout version
    pub version: u8,
    /// Fixed physics step (s)
    pub tick_duration: f32,
    /// Tick budget for batch execution
    pub max_ticks: u32,
    /// Per-tick suspension or batch resolution
    pub tick_mode: TickMode,
    pub agent: AgentConfig,
    pub kinematic: KinematicConfig,
    pub joints: JointsConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            tick_duration: 0.02,
            max_ticks: 10_000,
            tick_mode: TickMode::Stepped,
            agent: AgentConfig::default(),
            kinematic: KinematicConfig::default(),
            joints: JointsConfig::default(),
        }
    }
}

impl MotionConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every section
    ///
    /// Profile and joint settings are checked by building the requests they
    /// would produce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        if !self.tick_duration.is_finite() || self.tick_duration <= 0.0 {
            return Err(MotionError::InvalidTickDuration.into());
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::InvalidTickBudget);
        }

        self.agent.move_params(1.0, self.tick_duration).validate()?;
        self.agent.turn_params(1.0, self.tick_duration).validate()?;
        check_cache_size(self.agent.cache_size)?;
        self.kinematic.validate()?;

        for kind in JointKind::ALL {
            let joint = self.joints.get(kind);
            joint.params(1.0, self.tick_duration).validate()?;
            check_cache_size(joint.cache_size)?;
            if !joint.min.is_finite() || !joint.max.is_finite() || joint.min >= joint.max {
                return Err(ConfigError::InvalidJointLimits(kind));
            }
            if !joint.max_velocity.is_finite() || joint.max_velocity <= 0.0 {
                return Err(MotionError::InvalidRate.into());
            }
        }

        Ok(())
    }
}

fn check_cache_size(cache_size: usize) -> Result<(), ConfigError> {
    if cache_size == 0 || cache_size > crate::motion::MAX_CACHE_SIZE {
        Err(MotionError::InvalidCacheSize.into())
    } else {
        Ok(())
    }
}
