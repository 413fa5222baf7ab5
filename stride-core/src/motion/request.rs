//! Kinematic motion request

use super::error::MotionError;
use super::stepping::Step;

/// One request to move a kinematic property toward a target
///
/// Created per invocation and owned by the mover executing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionRequest<V> {
    /// Target value
    pub target: V,
    /// Linear or angular speed per second; `f32::INFINITY` teleports
    pub rate_per_second: f32,
    /// Fixed simulation step in seconds; 0 only for teleports
    pub tick_duration: f32,
    /// Roll back to the starting value (instead of the last pre-collision
    /// value) when a static obstruction halts the motion
    pub return_to_origin_on_failure: bool,
    /// Termination tolerance in the stepping strategy's own metric
    pub epsilon: f32,
    /// Optional simulated-time limit; `None` leaves halting to the caller
    pub max_elapsed_time: Option<f32>,
}

impl<V> MotionRequest<V> {
    /// Create a time-stepped request with zero epsilon and no timeout
    pub fn new(target: V, rate_per_second: f32, tick_duration: f32) -> Self {
        Self {
            target,
            rate_per_second,
            tick_duration,
            return_to_origin_on_failure: false,
            epsilon: 0.0,
            max_elapsed_time: None,
        }
    }

    /// Create a request that jumps to the target in a single tick
    pub fn teleport(target: V) -> Self {
        Self::new(target, f32::INFINITY, 0.0)
    }

    /// Set the termination tolerance
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Choose the rollback target used after a collision
    pub fn returning_to_origin(mut self, return_to_origin: bool) -> Self {
        self.return_to_origin_on_failure = return_to_origin;
        self
    }

    /// Stop with a timeout once `seconds` of simulated time have elapsed
    pub fn with_timeout(mut self, seconds: f32) -> Self {
        self.max_elapsed_time = Some(seconds);
        self
    }

    /// Check whether this request teleports instead of interpolating
    pub fn is_teleport(&self) -> bool {
        self.rate_per_second == f32::INFINITY
    }

    /// Get the per-tick advance derived from rate and tick duration
    pub fn step(&self) -> Step {
        if self.is_teleport() {
            Step::Teleport
        } else {
            Step::By(self.rate_per_second * self.tick_duration)
        }
    }

    /// Validate the scalar parameters of the request
    ///
    /// Target finiteness is checked by the stepping strategy, which knows
    /// the value type.
    pub fn validate(&self) -> Result<(), MotionError> {
        if self.rate_per_second.is_nan() || self.rate_per_second < 0.0 {
            return Err(MotionError::InvalidRate);
        }

        if !self.tick_duration.is_finite() || self.tick_duration < 0.0 {
            return Err(MotionError::InvalidTickDuration);
        }

        if self.tick_duration == 0.0 && !self.is_teleport() {
            return Err(MotionError::InvalidTickDuration);
        }

        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(MotionError::InvalidEpsilon);
        }

        if let Some(limit) = self.max_elapsed_time {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(MotionError::InvalidTimeout);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let req = MotionRequest::new(1.0f32, 2.0, 0.02);
        assert_eq!(req.epsilon, 0.0);
        assert!(!req.return_to_origin_on_failure);
        assert_eq!(req.max_elapsed_time, None);
        assert!(!req.is_teleport());
        assert_eq!(req.validate(), Ok(()));
    }

    #[test]
    fn test_step_from_rate_and_tick() {
        let req = MotionRequest::new(1.0f32, 2.0, 0.25);
        assert_eq!(req.step(), Step::By(0.5));
    }

    #[test]
    fn test_teleport_request() {
        let req = MotionRequest::teleport(3.0f32);
        assert!(req.is_teleport());
        assert_eq!(req.step(), Step::Teleport);
        assert_eq!(req.validate(), Ok(()));
    }

    #[test]
    fn test_infinite_rate_with_tick_is_teleport() {
        let req = MotionRequest::new(3.0f32, f32::INFINITY, 0.02);
        assert_eq!(req.step(), Step::Teleport);
        assert_eq!(req.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_rate() {
        assert_eq!(
            MotionRequest::new(1.0f32, -1.0, 0.02).validate(),
            Err(MotionError::InvalidRate)
        );
        assert_eq!(
            MotionRequest::new(1.0f32, f32::NAN, 0.02).validate(),
            Err(MotionError::InvalidRate)
        );
    }

    #[test]
    fn test_rejects_zero_tick_without_teleport() {
        assert_eq!(
            MotionRequest::new(1.0f32, 1.0, 0.0).validate(),
            Err(MotionError::InvalidTickDuration)
        );
        assert_eq!(
            MotionRequest::new(1.0f32, 1.0, f32::INFINITY).validate(),
            Err(MotionError::InvalidTickDuration)
        );
    }

    #[test]
    fn test_rejects_bad_epsilon_and_timeout() {
        let req = MotionRequest::new(1.0f32, 1.0, 0.02);
        assert_eq!(
            req.with_epsilon(-0.1).validate(),
            Err(MotionError::InvalidEpsilon)
        );
        assert_eq!(
            req.with_timeout(0.0).validate(),
            Err(MotionError::InvalidTimeout)
        );
    }

    #[test]
    fn test_zero_rate_is_allowed() {
        // A zero rate never arrives; the caller's halt condition or timeout ends it
        let req = MotionRequest::new(1.0f32, 0.0, 0.02).with_timeout(1.0);
        assert_eq!(req.validate(), Ok(()));
    }
}
