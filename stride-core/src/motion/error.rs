//! Synchronous request validation errors
//!
//! Every error here is raised before the first tick runs. Nothing on the
//! per-tick path returns an error; runtime failures are reported through
//! [`Termination`](super::Termination) instead.

use core::fmt;

/// Reasons a motion request is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Target is NaN or infinite
    InvalidTarget,
    /// Rate is negative or NaN
    InvalidRate,
    /// Tick duration is negative, non-finite, or zero without a teleport rate
    InvalidTickDuration,
    /// Epsilon is negative or non-finite
    InvalidEpsilon,
    /// Convergence tolerance is not strictly positive
    InvalidTolerance,
    /// Requested distance or angle is not finite
    InvalidDistance,
    /// Acceleration is not strictly positive
    InvalidAcceleration,
    /// Body mass is not strictly positive
    InvalidMass,
    /// Ring buffer size is zero or exceeds the supported maximum
    InvalidCacheSize,
    /// Maximum elapsed time is not strictly positive
    InvalidTimeout,
    /// The channel already has a motion in flight
    Busy,
    /// Batch execution ran out of ticks before the motion finished
    TickBudgetExhausted,
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MotionError::InvalidTarget => "target must be finite",
            MotionError::InvalidRate => "rate must be non-negative",
            MotionError::InvalidTickDuration => "tick duration must be positive unless teleporting",
            MotionError::InvalidEpsilon => "epsilon must be finite and non-negative",
            MotionError::InvalidTolerance => "tolerance must be positive",
            MotionError::InvalidDistance => "distance must be finite",
            MotionError::InvalidAcceleration => "acceleration must be positive",
            MotionError::InvalidMass => "mass must be positive",
            MotionError::InvalidCacheSize => "cache size out of range",
            MotionError::InvalidTimeout => "maximum elapsed time must be positive",
            MotionError::Busy => "a motion is already in progress",
            MotionError::TickBudgetExhausted => "tick budget exhausted",
        };
        f.write_str(text)
    }
}

/// Check that a value is finite and strictly positive
pub(crate) fn check_positive(value: f32, err: MotionError) -> Result<(), MotionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(err)
    }
}

/// Check that a tick duration is usable for time-stepped motion
pub(crate) fn check_tick(tick_duration: f32) -> Result<(), MotionError> {
    check_positive(tick_duration, MotionError::InvalidTickDuration)
}
