//! Trapezoidal force/torque profile controller
//!
//! Moves a force-integrated body a commanded distance (or angle) by
//! choosing each tick between three phases:
//!
//! - Accelerate: below cruise speed and outside the braking zone
//! - Cruise: proportional force holding the target speed
//! - Decelerate: inside the last `acceleration_distance` of travel
//!
//! When the braking zone takes up more than half the travel the profile is
//! triangular and cruise is skipped. Progress is measured from the body's own
//! position, not from the commanded motion.

use libm::fabsf;

use super::convergence::ConvergenceDetector;
use super::error::{check_positive, check_tick, MotionError};
use super::outcome::{MotionOutcome, Termination};
use crate::scheduler::{Motion, Progress};
use crate::traits::{CollisionSignal, Direction, ForceBody};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default convergence tolerance (metres or degrees of dispersion)
pub const DEFAULT_TOLERANCE: f32 = 1e-4;

/// Default simulated-time limit in seconds
pub const DEFAULT_MAX_ELAPSED_S: f32 = 10.0;

/// Default ring buffer size
pub const DEFAULT_CACHE_SIZE: usize = 10;

/// Default fixed physics step in seconds
pub const DEFAULT_TICK_S: f32 = 0.02;

/// Whether the profile drives a force or a torque
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProfileAxis {
    /// Translation in metres, force in newtons
    Linear,
    /// Rotation in degrees, torque about the vertical axis
    Angular,
}

impl ProfileAxis {
    /// Get the unit label for logs
    pub fn unit(self) -> &'static str {
        match self {
            ProfileAxis::Linear => "m",
            ProfileAxis::Angular => "deg",
        }
    }
}

/// Current phase of the velocity profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfilePhase {
    /// No motion in flight
    Idle,
    /// Speeding up toward target speed
    Accelerating,
    /// Holding target speed
    Cruising,
    /// Braking toward the commanded distance
    Decelerating,
}

/// Parameters of one profiled movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileParams {
    /// Force or torque
    pub axis: ProfileAxis,
    /// Distance (or angle) to cover, always non-negative
    pub total_distance: f32,
    /// Direction of travel along the body's axis
    pub direction: Direction,
    /// Cruise speed
    pub target_speed: f32,
    /// Acceleration used for both speeding up and braking
    pub target_acceleration: f32,
    /// Body mass (or moment of inertia for angular profiles)
    pub body_mass: f32,
    /// Convergence tolerance on displacement dispersion
    pub tolerance: f32,
    /// Simulated-time limit in seconds
    pub max_elapsed_time: f32,
    /// Ring buffer size for convergence detection
    pub cache_size: usize,
    /// Fixed physics step in seconds
    pub tick_duration: f32,
    /// Move the body back to its start position after a collision
    pub return_to_origin_on_failure: bool,
}

impl ProfileParams {
    /// Create parameters for a signed displacement with default limits
    pub fn new(
        axis: ProfileAxis,
        displacement: f32,
        target_speed: f32,
        target_acceleration: f32,
        body_mass: f32,
    ) -> Self {
        Self {
            axis,
            total_distance: fabsf(displacement),
            direction: Direction::of(displacement),
            target_speed,
            target_acceleration,
            body_mass,
            tolerance: DEFAULT_TOLERANCE,
            max_elapsed_time: DEFAULT_MAX_ELAPSED_S,
            cache_size: DEFAULT_CACHE_SIZE,
            tick_duration: DEFAULT_TICK_S,
            return_to_origin_on_failure: false,
        }
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the simulated-time limit
    pub fn with_timeout(mut self, seconds: f32) -> Self {
        self.max_elapsed_time = seconds;
        self
    }

    /// Set the ring buffer size
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    /// Set the fixed physics step
    pub fn with_tick_duration(mut self, tick_duration: f32) -> Self {
        self.tick_duration = tick_duration;
        self
    }

    /// Choose whether a collision rolls the body back to its start
    pub fn returning_to_origin(mut self, return_to_origin: bool) -> Self {
        self.return_to_origin_on_failure = return_to_origin;
        self
    }

    /// Distance spent accelerating (and braking)
    ///
    /// `speed^2 / (2 * acceleration)`, clamped to half the travel so a short
    /// move becomes a symmetric triangular profile.
    pub fn acceleration_distance(&self) -> f32 {
        let distance =
            self.target_speed * self.target_speed / (2.0 * self.target_acceleration);
        if 2.0 * distance > self.total_distance {
            self.total_distance / 2.0
        } else {
            distance
        }
    }

    /// Validate all parameters
    pub fn validate(&self) -> Result<(), MotionError> {
        if !self.total_distance.is_finite() {
            return Err(MotionError::InvalidDistance);
        }
        if !self.target_speed.is_finite() || self.target_speed < 0.0 {
            return Err(MotionError::InvalidRate);
        }
        check_positive(self.target_acceleration, MotionError::InvalidAcceleration)?;
        check_positive(self.body_mass, MotionError::InvalidMass)?;
        check_positive(self.tolerance, MotionError::InvalidTolerance)?;
        check_positive(self.max_elapsed_time, MotionError::InvalidTimeout)?;
        check_tick(self.tick_duration)?;
        Ok(())
    }
}

/// Tick-driven trapezoidal profile controller
#[derive(Debug, Clone)]
pub struct ProfileController {
    params: ProfileParams,
    /// Braking zone length fixed at start
    acceleration_distance: f32,
    /// Remaining distance latched on first entry to deceleration
    deceleration_distance: Option<f32>,
    phase: ProfilePhase,
    /// Body position when the request started
    original_position: f32,
    elapsed: f32,
    ticks: u32,
    detector: ConvergenceDetector,
    outcome: Option<MotionOutcome<f32>>,
}

impl ProfileController {
    /// Validate parameters and prepare to drive `body`
    pub fn start<B, S>(params: ProfileParams, body: &B, signal: &mut S) -> Result<Self, MotionError>
    where
        B: ForceBody + ?Sized,
        S: CollisionSignal + ?Sized,
    {
        params.validate()?;
        let detector = ConvergenceDetector::new(params.cache_size, params.tolerance)?;

        signal.reset();
        let acceleration_distance = params.acceleration_distance();

        info!(
            "profile start: {} {} at {} (accel zone {})",
            params.total_distance,
            params.axis.unit(),
            params.target_speed,
            acceleration_distance
        );

        Ok(Self {
            params,
            acceleration_distance,
            deceleration_distance: None,
            phase: ProfilePhase::Idle,
            original_position: body.position(),
            elapsed: 0.0,
            ticks: 0,
            detector,
            outcome: None,
        })
    }

    /// Run one tick: pick a phase, apply force, sample, check for termination
    pub fn step<B, S>(&mut self, body: &mut B, signal: &S) -> Progress<MotionOutcome<f32>>
    where
        B: ForceBody + ?Sized,
        S: CollisionSignal + ?Sized,
    {
        if let Some(outcome) = &self.outcome {
            return Progress::Done(outcome.clone());
        }

        if signal.should_halt() {
            return Progress::Done(self.finish(body, signal, Termination::Halted));
        }

        let total = self.params.total_distance;
        let moved = self.distance_moved(body);
        if moved >= total {
            return Progress::Done(self.finish(body, signal, Termination::Reached));
        }

        let sign = self.params.direction.sign();
        let speed = body.velocity() * sign;
        let remaining = total - moved;

        let phase = if speed < self.params.target_speed && remaining > self.acceleration_distance {
            ProfilePhase::Accelerating
        } else if moved >= total - self.acceleration_distance {
            ProfilePhase::Decelerating
        } else {
            ProfilePhase::Cruising
        };

        // Braking brought the body to rest short of the target
        if phase == ProfilePhase::Decelerating
            && self.phase == ProfilePhase::Decelerating
            && speed <= 0.0
        {
            return Progress::Done(self.finish(body, signal, Termination::Converged));
        }

        if phase != self.phase {
            debug!("profile phase change at {} after {} ticks", moved, self.ticks);
            if phase == ProfilePhase::Decelerating && self.deceleration_distance.is_none() {
                self.deceleration_distance = Some(remaining);
            }
            self.phase = phase;
        }

        let mass = self.params.body_mass;
        let accel = self.params.target_acceleration;
        let damping = body.damping();
        let force = match phase {
            ProfilePhase::Accelerating => mass * accel + speed * damping,
            ProfilePhase::Decelerating => -(mass * accel - speed * damping),
            _ => mass * (self.params.target_speed - speed) + speed * damping,
        };
        body.apply_force(sign * force);

        let stable = self.detector.sample(moved);
        self.ticks += 1;
        self.elapsed += self.params.tick_duration;

        if self.elapsed >= self.params.max_elapsed_time {
            let elapsed = self.elapsed;
            return Progress::Done(self.finish(body, signal, Termination::TimedOut { elapsed }));
        }

        if stable {
            return Progress::Done(self.finish(body, signal, Termination::Converged));
        }

        Progress::Pending
    }

    /// Get the current phase
    pub fn phase(&self) -> ProfilePhase {
        self.phase
    }

    /// Get the braking zone length
    pub fn acceleration_distance(&self) -> f32 {
        self.acceleration_distance
    }

    /// Get the remaining distance latched when braking began
    pub fn deceleration_distance(&self) -> Option<f32> {
        self.deceleration_distance
    }

    /// Get simulated seconds elapsed
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Get the parameters in use
    pub fn params(&self) -> &ProfileParams {
        &self.params
    }

    /// Measure the distance the body has moved from its start position
    pub fn distance_moved<B: ForceBody + ?Sized>(&self, body: &B) -> f32 {
        fabsf(body.position() - self.original_position)
    }

    fn finish<B, S>(&mut self, body: &mut B, signal: &S, termination: Termination) -> MotionOutcome<f32>
    where
        B: ForceBody + ?Sized,
        S: CollisionSignal + ?Sized,
    {
        body.halt();
        self.phase = ProfilePhase::Idle;

        let termination = match signal.first_static_obstruction() {
            Some(obstruction) => {
                if self.params.return_to_origin_on_failure {
                    body.reset_position(self.original_position);
                }
                warn!("profile halted by '{}'", obstruction.name.as_str());
                Termination::Collision(obstruction)
            }
            None => termination,
        };

        if let Termination::TimedOut { elapsed } = termination {
            warn!("profile timed out after {} s", elapsed);
        }

        let outcome = MotionOutcome {
            termination,
            final_value: self.distance_moved(body),
            ticks: self.ticks,
            elapsed: self.elapsed,
        };
        info!(
            "profile finished: {} after {} {}",
            outcome.termination.label(),
            outcome.final_value,
            self.params.axis.unit()
        );

        self.outcome = Some(outcome.clone());
        outcome
    }
}

impl<B, S> Motion<B, S> for ProfileController
where
    B: ForceBody + ?Sized,
    S: CollisionSignal + ?Sized,
{
    type Output = MotionOutcome<f32>;

    fn step(&mut self, body: &mut B, signal: &S) -> Progress<Self::Output> {
        ProfileController::step(self, body, signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{NeverHalt, ObstructionMonitor};

    const DT: f32 = 0.02;

    /// Point mass with viscous damping, semi-implicit Euler
    struct Sled {
        mass: f32,
        damping: f32,
        position: f32,
        velocity: f32,
        force: f32,
    }

    impl Sled {
        fn new(mass: f32, damping: f32) -> Self {
            Self {
                mass,
                damping,
                position: 0.0,
                velocity: 0.0,
                force: 0.0,
            }
        }

        fn integrate(&mut self, dt: f32) {
            let accel = (self.force - self.damping * self.velocity) / self.mass;
            self.velocity += accel * dt;
            self.position += self.velocity * dt;
            self.force = 0.0;
        }
    }

    impl ForceBody for Sled {
        fn position(&self) -> f32 {
            self.position
        }

        fn velocity(&self) -> f32 {
            self.velocity
        }

        fn damping(&self) -> f32 {
            self.damping
        }

        fn apply_force(&mut self, force: f32) {
            self.force += force;
        }

        fn halt(&mut self) {
            self.velocity = 0.0;
            self.force = 0.0;
        }

        fn reset_position(&mut self, position: f32) {
            self.position = position;
        }
    }

    /// Run to completion, recording every phase change
    fn run(
        controller: &mut ProfileController,
        sled: &mut Sled,
        signal: &impl CollisionSignal,
    ) -> (MotionOutcome<f32>, heapless::Vec<ProfilePhase, 16>) {
        let mut phases = heapless::Vec::new();
        for _ in 0..5_000 {
            let progress = controller.step(sled, signal);
            let phase = controller.phase();
            if phase != ProfilePhase::Idle && phases.last() != Some(&phase) {
                phases.push(phase).unwrap();
            }
            if let Progress::Done(outcome) = progress {
                return (outcome, phases);
            }
            sled.integrate(DT);
        }
        panic!("profile did not finish");
    }

    #[test]
    fn test_acceleration_distance() {
        let params = ProfileParams::new(ProfileAxis::Linear, 10.0, 2.0, 1.0, 1.0);
        assert_eq!(params.acceleration_distance(), 2.0);
    }

    #[test]
    fn test_acceleration_distance_clamped_for_short_moves() {
        let params = ProfileParams::new(ProfileAxis::Linear, 2.0, 10.0, 1.0, 1.0);
        assert_eq!(params.acceleration_distance(), 1.0);
    }

    #[test]
    fn test_signed_displacement_sets_direction() {
        let params = ProfileParams::new(ProfileAxis::Angular, -90.0, 30.0, 60.0, 2.0);
        assert_eq!(params.total_distance, 90.0);
        assert_eq!(params.direction, Direction::Negative);
    }

    #[test]
    fn test_trapezoidal_profile_covers_distance() {
        let mut sled = Sled::new(1.0, 0.5);
        let mut signal = NeverHalt;
        let params = ProfileParams::new(ProfileAxis::Linear, 10.0, 2.0, 1.0, 1.0).with_timeout(20.0);
        let mut controller = ProfileController::start(params, &sled, &mut signal).unwrap();

        let (outcome, phases) = run(&mut controller, &mut sled, &signal);

        assert!(outcome.success());
        assert!(fabsf(outcome.final_value - 10.0) < 0.05);
        assert_eq!(
            phases.as_slice(),
            &[
                ProfilePhase::Accelerating,
                ProfilePhase::Cruising,
                ProfilePhase::Decelerating
            ]
        );
        // Latched once, close to the 2 m braking zone
        let latched = controller.deceleration_distance().unwrap();
        assert!(latched <= 2.0 && latched > 1.9);
        assert_eq!(controller.phase(), ProfilePhase::Idle);
        assert_eq!(sled.velocity, 0.0);
    }

    #[test]
    fn test_triangular_profile_skips_cruise() {
        let mut sled = Sled::new(1.0, 0.5);
        let mut signal = NeverHalt;
        let params = ProfileParams::new(ProfileAxis::Linear, 2.0, 10.0, 1.0, 1.0);
        let mut controller = ProfileController::start(params, &sled, &mut signal).unwrap();

        let (outcome, phases) = run(&mut controller, &mut sled, &signal);

        assert!(outcome.success());
        assert!(fabsf(outcome.final_value - 2.0) < 0.05);
        assert_eq!(
            phases.as_slice(),
            &[ProfilePhase::Accelerating, ProfilePhase::Decelerating]
        );
        // Braking began at the midpoint
        let latched = controller.deceleration_distance().unwrap();
        assert!(fabsf(latched - 1.0) < 0.05);
    }

    #[test]
    fn test_negative_direction() {
        let mut sled = Sled::new(2.0, 0.0);
        let mut signal = NeverHalt;
        let params = ProfileParams::new(ProfileAxis::Linear, -3.0, 1.0, 2.0, 2.0).with_timeout(20.0);
        let mut controller = ProfileController::start(params, &sled, &mut signal).unwrap();

        let (outcome, _) = run(&mut controller, &mut sled, &signal);
        assert!(outcome.success());
        assert!(fabsf(sled.position + 3.0) < 0.05);
    }

    #[test]
    fn test_rest_short_of_target_converges() {
        let mut sled = Sled::new(1.0, 0.0);
        let mut signal = NeverHalt;
        let params = ProfileParams::new(ProfileAxis::Linear, 1.0, 1.0, 1.0, 1.0);
        let mut controller = ProfileController::start(params, &sled, &mut signal).unwrap();

        // Inside the braking zone and still moving
        sled.position = 0.6;
        sled.velocity = 0.5;
        assert_eq!(controller.step(&mut sled, &signal), Progress::Pending);
        assert_eq!(controller.phase(), ProfilePhase::Decelerating);

        sled.integrate(DT);
        sled.velocity = 0.0;
        let outcome = controller.step(&mut sled, &signal).done().unwrap();

        assert_eq!(outcome.termination, Termination::Converged);
        assert!(outcome.final_value < 1.0);
    }

    #[test]
    fn test_timeout_independent_of_distance() {
        let mut sled = Sled::new(1.0, 0.5);
        let mut signal = NeverHalt;
        let params = ProfileParams::new(ProfileAxis::Linear, 10.0, 0.0, 1.0, 1.0).with_timeout(0.01);
        let mut controller = ProfileController::start(params, &sled, &mut signal).unwrap();

        let (outcome, _) = run(&mut controller, &mut sled, &signal);
        assert!(matches!(outcome.termination, Termination::TimedOut { .. }));
        assert_eq!(outcome.ticks, 1);
        assert_eq!(outcome.final_value, 0.0);
    }

    #[test]
    fn test_stalled_body_converges() {
        // Zero cruise speed from rest applies no force, so every sample is 0
        let mut sled = Sled::new(1.0, 0.5);
        let mut signal = NeverHalt;
        let params = ProfileParams::new(ProfileAxis::Linear, 10.0, 0.0, 1.0, 1.0)
            .with_cache_size(5)
            .with_timeout(5.0);
        let mut controller = ProfileController::start(params, &sled, &mut signal).unwrap();

        let (outcome, _) = run(&mut controller, &mut sled, &signal);
        assert_eq!(outcome.termination, Termination::Converged);
        assert_eq!(outcome.ticks, 5);
    }

    #[test]
    fn test_collision_rolls_back_when_requested() {
        let mut sled = Sled::new(1.0, 0.0);
        sled.position = 4.0;
        let mut monitor = ObstructionMonitor::new();
        let params = ProfileParams::new(ProfileAxis::Linear, 5.0, 1.0, 1.0, 1.0).returning_to_origin(true);
        let mut controller = ProfileController::start(params, &sled, &mut monitor).unwrap();

        for _ in 0..30 {
            assert_eq!(controller.step(&mut sled, &monitor), Progress::Pending);
            sled.integrate(DT);
        }
        monitor.record_contact("Sofa", true, true);

        let outcome = controller.step(&mut sled, &monitor).done().unwrap();
        assert!(matches!(outcome.termination, Termination::Collision(_)));
        assert_eq!(sled.position, 4.0);
        assert_eq!(sled.velocity, 0.0);
        assert_eq!(outcome.final_value, 0.0);
    }

    #[test]
    fn test_collision_without_rollback_keeps_position() {
        let mut sled = Sled::new(1.0, 0.0);
        let mut monitor = ObstructionMonitor::new();
        let params = ProfileParams::new(ProfileAxis::Linear, 5.0, 1.0, 1.0, 1.0);
        let mut controller = ProfileController::start(params, &sled, &mut monitor).unwrap();

        for _ in 0..30 {
            controller.step(&mut sled, &monitor);
            sled.integrate(DT);
        }
        let stopped_at = sled.position;
        monitor.record_contact("Wall_1", true, false);

        let outcome = controller.step(&mut sled, &monitor).done().unwrap();
        assert!(!outcome.success());
        assert_eq!(sled.position, stopped_at);
        assert!(outcome.final_value > 0.0);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let sled = Sled::new(1.0, 0.0);
        let mut signal = NeverHalt;
        let base = ProfileParams::new(ProfileAxis::Linear, 1.0, 1.0, 1.0, 1.0);

        let cases = [
            (base.with_tolerance(0.0), MotionError::InvalidTolerance),
            (base.with_timeout(-1.0), MotionError::InvalidTimeout),
            (base.with_cache_size(0), MotionError::InvalidCacheSize),
            (base.with_tick_duration(0.0), MotionError::InvalidTickDuration),
            (
                ProfileParams::new(ProfileAxis::Linear, f32::NAN, 1.0, 1.0, 1.0),
                MotionError::InvalidDistance,
            ),
            (
                ProfileParams::new(ProfileAxis::Linear, 1.0, 1.0, 0.0, 1.0),
                MotionError::InvalidAcceleration,
            ),
            (
                ProfileParams::new(ProfileAxis::Linear, 1.0, 1.0, 1.0, 0.0),
                MotionError::InvalidMass,
            ),
        ];

        for (params, expected) in cases {
            let result = ProfileController::start(params, &sled, &mut signal);
            assert_eq!(result.unwrap_err(), expected);
        }
    }
}
