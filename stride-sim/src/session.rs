//! Movement session
//!
//! Turns high-level movement calls into motion requests on the world's
//! channels, runs them in the configured tick mode and reports each
//! outcome to a listener. Joint moves are started here and settle
//! independently; they never report through the listener.

use heapless::Vec as BoundedVec;
use nalgebra::{UnitQuaternion, Vector3};
use tracing::{debug, info, trace, warn};

use stride_core::config::MotionConfig;
use stride_core::joint::{JointSet, StopReason};
use stride_core::motion::{
    Angular, IncrementalMover, Linear, MotionError, MotionListener, MotionOutcome, MotionRequest,
    ProfileController, Property,
};
use stride_core::scheduler::{run, Motion, MotionHost};
use stride_core::traits::{JointKind, PhysicsWorld};

use crate::error::SimError;
use crate::host::{HandHost, ObjectOrientationHost, ObjectTranslationHost, TurnHost, WalkHost, WristHost};
use crate::world::SimWorld;

/// Listener that logs every outcome
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl MotionListener for LogListener {
    fn on_motion_finished(&mut self, success: bool, message: &str) {
        if success {
            info!("motion succeeded");
        } else {
            warn!("motion failed: {}", message);
        }
    }
}

/// Listener that keeps every outcome for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    pub outcomes: Vec<(bool, String)>,
}

impl MotionListener for RecordingListener {
    fn on_motion_finished(&mut self, success: bool, message: &str) {
        self.outcomes.push((success, message.to_string()));
    }
}

/// A world plus the controllers and listener driving it
pub struct Session<L> {
    world: SimWorld,
    config: MotionConfig,
    joints: JointSet,
    listener: L,
    /// Frames reported in stepped mode
    frames: u64,
}

impl<L: MotionListener> Session<L> {
    /// Create a session after validating its configuration
    pub fn new(config: MotionConfig, world: SimWorld, listener: L) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            world,
            config,
            joints: JointSet::new(),
            listener,
            frames: 0,
        })
    }

    /// Borrow the world
    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    /// Borrow the world mutably
    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    /// Borrow the configuration
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Borrow the joint controllers
    pub fn joints(&self) -> &JointSet {
        &self.joints
    }

    /// Borrow the listener
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Get the frames reported so far in stepped mode
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Walk a signed distance along the current heading (m)
    pub fn walk(&mut self, distance: f32) -> Result<MotionOutcome<f32>, SimError> {
        let params = self.config.agent.move_params(distance, self.config.tick_duration);
        info!(distance, "walk");
        let mut host = WalkHost(&mut self.world);
        let motion = {
            let (body, signal) = host.split();
            ProfileController::start(params, &*body, signal)
        };
        let result = motion.and_then(|mut motion| {
            execute(&self.config, &mut self.frames, &mut host, &mut motion, self.config.tick_duration)
        });
        self.report(result)
    }

    /// Turn a signed angle about the vertical axis (deg)
    pub fn turn(&mut self, degrees: f32) -> Result<MotionOutcome<f32>, SimError> {
        let params = self.config.agent.turn_params(degrees, self.config.tick_duration);
        info!(degrees, "turn");
        let mut host = TurnHost(&mut self.world);
        let motion = {
            let (body, signal) = host.split();
            ProfileController::start(params, &*body, signal)
        };
        let result = motion.and_then(|mut motion| {
            execute(&self.config, &mut self.frames, &mut host, &mut motion, self.config.tick_duration)
        });
        self.report(result)
    }

    /// Move the kinematic object toward a position at the configured rate
    pub fn move_object_to(&mut self, target: Vector3<f32>) -> Result<MotionOutcome<Vector3<f32>>, SimError> {
        let kinematic = self.config.kinematic;
        let request = MotionRequest::new(target, kinematic.translation_rate, self.config.tick_duration)
            .with_epsilon(kinematic.position_epsilon)
            .returning_to_origin(kinematic.return_to_origin_on_failure);
        self.translate_object(request)
    }

    /// Place the kinematic object at a position in a single tick
    pub fn teleport_object(&mut self, target: Vector3<f32>) -> Result<MotionOutcome<Vector3<f32>>, SimError> {
        let request = MotionRequest::teleport(target)
            .returning_to_origin(self.config.kinematic.return_to_origin_on_failure);
        self.translate_object(request)
    }

    /// Run a custom translation request on the kinematic object
    pub fn translate_object(
        &mut self,
        request: MotionRequest<Vector3<f32>>,
    ) -> Result<MotionOutcome<Vector3<f32>>, SimError> {
        debug!(goal = ?request.target, "move object");
        let dt = request.tick_duration;
        let mut host = ObjectTranslationHost(&mut self.world);
        let motion = {
            let (body, signal) = host.split();
            IncrementalMover::start(Linear, request, &*body, signal)
        };
        let result = motion.and_then(|mut motion| {
            execute(&self.config, &mut self.frames, &mut host, &mut motion, dt)
        });
        self.report(result)
    }

    /// Rotate the kinematic object to a heading (deg)
    pub fn rotate_object_to(&mut self, yaw_degrees: f32) -> Result<MotionOutcome<UnitQuaternion<f32>>, SimError> {
        let kinematic = self.config.kinematic;
        let target = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw_degrees.to_radians());
        let request = MotionRequest::new(target, kinematic.rotation_rate, self.config.tick_duration)
            .with_epsilon(kinematic.rotation_epsilon)
            .returning_to_origin(kinematic.return_to_origin_on_failure);
        debug!(yaw_degrees, "rotate object");

        let mut host = ObjectOrientationHost(&mut self.world);
        let motion = {
            let (body, signal) = host.split();
            IncrementalMover::start(Angular, request, &*body, signal)
        };
        let result = motion.and_then(|mut motion| {
            execute(&self.config, &mut self.frames, &mut host, &mut motion, self.config.tick_duration)
        });
        self.report(result)
    }

    /// Move the arm's hand target to a world position
    pub fn reach_to(&mut self, target: Vector3<f32>) -> Result<MotionOutcome<Vector3<f32>>, SimError> {
        let kinematic = self.config.kinematic;
        let request = MotionRequest::new(target, kinematic.translation_rate, self.config.tick_duration)
            .with_epsilon(kinematic.position_epsilon)
            .returning_to_origin(kinematic.return_to_origin_on_failure);
        debug!(goal = ?target, "reach");

        let mut host = HandHost(&mut self.world);
        let motion = {
            let (body, signal) = host.split();
            IncrementalMover::start(Linear, request, &*body, signal)
        };
        let result = motion.and_then(|mut motion| {
            execute(&self.config, &mut self.frames, &mut host, &mut motion, self.config.tick_duration)
        });
        if !self.world.hand.is_reachable() {
            warn!("hand target outside reach, arm clamped to its limit");
        }
        self.report(result)
    }

    /// Swing the wrist about its pivot by a signed yaw (deg)
    pub fn rotate_wrist_by(&mut self, yaw_degrees: f32) -> Result<MotionOutcome<UnitQuaternion<f32>>, SimError> {
        let kinematic = self.config.kinematic;
        let turn = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw_degrees.to_radians());
        let target = turn * self.world.wrist.get();
        let request = MotionRequest::new(target, kinematic.rotation_rate, self.config.tick_duration)
            .with_epsilon(kinematic.rotation_epsilon)
            .returning_to_origin(kinematic.return_to_origin_on_failure);
        debug!(yaw_degrees, "rotate wrist");

        let mut host = WristHost(&mut self.world);
        let motion = {
            let (body, signal) = host.split();
            IncrementalMover::start(Angular, request, &*body, signal)
        };
        let result = motion.and_then(|mut motion| {
            execute(&self.config, &mut self.frames, &mut host, &mut motion, self.config.tick_duration)
        });
        self.report(result)
    }

    /// Start a joint movement by a signed displacement
    ///
    /// Returns `Busy` while that joint is still moving. Other joints are
    /// unaffected.
    pub fn move_joint(&mut self, kind: JointKind, displacement: f32) -> Result<(), SimError> {
        let params = self.config.joints.get(kind).params(displacement, self.config.tick_duration);
        self.joints.request(kind, params, &mut self.world.rig)?;
        Ok(())
    }

    /// Run one world tick with joint updates
    ///
    /// Returns the joints that stopped on this tick.
    pub fn tick(&mut self) -> BoundedVec<(JointKind, StopReason), 3> {
        let stopped = self.joints.update(&mut self.world.rig);
        for (kind, reason) in &stopped {
            debug!(joint = kind.label(), reason = reason.label(), "joint idle");
        }
        self.world.advance(self.config.tick_duration);
        stopped
    }

    /// Tick until every joint is idle
    ///
    /// Aborts all joints if the tick budget runs out.
    pub fn settle_joints(&mut self) -> Result<Vec<(JointKind, StopReason)>, SimError> {
        let mut stops = Vec::new();
        for _ in 0..self.config.max_ticks {
            if self.joints.is_idle() {
                return Ok(stops);
            }
            stops.extend(self.tick());
        }

        if self.joints.is_idle() {
            return Ok(stops);
        }
        warn!("joints did not settle within {} ticks", self.config.max_ticks);
        self.joints.abort_all(&mut self.world.rig);
        Err(MotionError::TickBudgetExhausted.into())
    }

    fn report<V>(&mut self, result: Result<MotionOutcome<V>, MotionError>) -> Result<MotionOutcome<V>, SimError> {
        match result {
            Ok(outcome) => {
                info!(
                    termination = outcome.termination.label(),
                    ticks = outcome.ticks,
                    elapsed = outcome.elapsed,
                    "motion finished"
                );
                outcome.notify(&mut self.listener);
                Ok(outcome)
            }
            Err(e) => {
                self.listener.on_motion_finished(false, &e.to_string());
                Err(e.into())
            }
        }
    }
}

/// Run a started motion in the configured tick mode
fn execute<H, M>(
    config: &MotionConfig,
    frames: &mut u64,
    host: &mut H,
    motion: &mut M,
    tick_duration: f32,
) -> Result<M::Output, MotionError>
where
    H: MotionHost,
    M: Motion<H::Body, H::Signal>,
{
    run(config.tick_mode, host, motion, tick_duration, config.max_ticks, |_, tick| {
        *frames += 1;
        trace!(tick, "frame");
    })
}
