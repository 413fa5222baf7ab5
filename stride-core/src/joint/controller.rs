//! Single-joint controller
//!
//! Writes a position target one speed step ahead of the measured position
//! each tick. The drive does the tracking; no force is computed here.

use libm::fabsf;

use super::machine::{JointEvent, JointState, StopReason};
use crate::motion::convergence::ConvergenceDetector;
use crate::motion::error::{check_positive, check_tick, MotionError};
use crate::traits::{Direction, JointDrive, JointKind};

/// One joint movement request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointMotionParams {
    /// Signed displacement (metres, or degrees for rotation)
    pub displacement: f32,
    /// Drive speed per second
    pub speed: f32,
    /// Convergence tolerance on position dispersion
    pub tolerance: f32,
    /// Simulated-time limit in seconds
    pub max_elapsed_time: f32,
    /// Ring buffer size for convergence detection
    pub cache_size: usize,
    /// Fixed physics step in seconds
    pub tick_duration: f32,
}

impl JointMotionParams {
    /// Validate all parameters
    pub fn validate(&self) -> Result<(), MotionError> {
        if !self.displacement.is_finite() {
            return Err(MotionError::InvalidDistance);
        }
        check_positive(self.speed, MotionError::InvalidRate)?;
        check_positive(self.tolerance, MotionError::InvalidTolerance)?;
        check_positive(self.max_elapsed_time, MotionError::InvalidTimeout)?;
        check_tick(self.tick_duration)?;
        Ok(())
    }
}

/// State of the request currently in flight
#[derive(Debug, Clone)]
struct JointRun {
    initial_position: f32,
    requested_distance: f32,
    speed: f32,
    tick_duration: f32,
    max_elapsed_time: f32,
    elapsed: f32,
    detector: ConvergenceDetector,
}

/// Idle/Moving controller for one joint axis
#[derive(Debug, Clone)]
pub struct JointController {
    kind: JointKind,
    state: JointState,
    run: Option<JointRun>,
    last_stop: Option<StopReason>,
}

impl JointController {
    /// Create an idle controller for a joint axis
    pub fn new(kind: JointKind) -> Self {
        Self {
            kind,
            state: JointState::Idle,
            run: None,
            last_stop: None,
        }
    }

    /// Start a movement
    ///
    /// Refused with `Busy` while a previous request is still moving.
    pub fn request<D>(&mut self, params: JointMotionParams, drive: &D) -> Result<(), MotionError>
    where
        D: JointDrive + ?Sized,
    {
        if self.state.is_moving() {
            return Err(MotionError::Busy);
        }
        params.validate()?;
        let detector = ConvergenceDetector::new(params.cache_size, params.tolerance)?;

        let direction = Direction::of(params.displacement);
        self.run = Some(JointRun {
            initial_position: drive.position(),
            requested_distance: fabsf(params.displacement),
            speed: params.speed,
            tick_duration: params.tick_duration,
            max_elapsed_time: params.max_elapsed_time,
            elapsed: 0.0,
            detector,
        });
        self.state = self.state.transition(JointEvent::Start(direction));

        debug!(
            "{} joint start: {} at {}",
            self.kind.label(),
            params.displacement,
            params.speed
        );
        Ok(())
    }

    /// Run one tick
    ///
    /// Returns the stop reason on the tick the joint returns to idle.
    pub fn update<D>(&mut self, drive: &mut D) -> Option<StopReason>
    where
        D: JointDrive + ?Sized,
    {
        let direction = self.state.direction()?;
        let run = self.run.as_mut()?;

        let position = drive.position();
        let moved = fabsf(position - run.initial_position);

        let event = if moved >= run.requested_distance {
            Some(JointEvent::DistanceReached)
        } else {
            drive.set_drive_target(position + direction.sign() * run.tick_duration * run.speed);

            let stable = run.detector.sample(position);
            run.elapsed += run.tick_duration;

            if run.elapsed >= run.max_elapsed_time {
                Some(JointEvent::TimedOut)
            } else if stable {
                Some(JointEvent::Converged)
            } else {
                None
            }
        };

        let event = event?;
        drive.set_drive_target(position);
        self.stop(event, moved)
    }

    /// Abort any movement and hold the drive where it is
    ///
    /// Returns true if a movement was in flight.
    pub fn abort<D>(&mut self, drive: &mut D) -> bool
    where
        D: JointDrive + ?Sized,
    {
        let Some(run) = &self.run else {
            return false;
        };
        let position = drive.position();
        let moved = fabsf(position - run.initial_position);
        drive.set_drive_target(position);
        self.stop(JointEvent::Abort, moved).is_some()
    }

    /// Get the joint axis
    pub fn kind(&self) -> JointKind {
        self.kind
    }

    /// Get the current state
    pub fn state(&self) -> JointState {
        self.state
    }

    /// Check whether a request is in flight
    pub fn is_idle(&self) -> bool {
        !self.state.is_moving()
    }

    /// Get why the last request stopped
    pub fn last_stop(&self) -> Option<StopReason> {
        self.last_stop
    }

    /// Get simulated seconds spent on the current request
    pub fn elapsed(&self) -> f32 {
        self.run.as_ref().map_or(0.0, |run| run.elapsed)
    }

    fn stop(&mut self, event: JointEvent, moved: f32) -> Option<StopReason> {
        let reason = event.stop_reason()?;
        self.state = self.state.transition(event);
        self.run = None;
        self.last_stop = Some(reason);
        info!("{} joint stopped after {}: {}", self.kind.label(), moved, reason.label());
        Some(reason)
    }
}
