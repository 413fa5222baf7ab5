//! Simulated world
//!
//! Owns every driven body plus one obstruction monitor per channel. Each
//! advance integrates the force bodies and drives, then re-tests every
//! channel's body against the static scene.

use nalgebra::Vector3;
use tracing::trace;

use stride_core::collision::ObstructionMonitor;
use stride_core::config::MotionConfig;
use stride_core::traits::PhysicsWorld;
use stride_drivers::body::{DampedBody, PlanarAgent};
use stride_drivers::collision::StaticScene;
use stride_drivers::joint::ArmRig;
use stride_drivers::kinematic::{KinematicBody, PivotFrame, ReachSolver};

/// Independently monitored motion channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Walking and turning base
    Agent,
    /// Free kinematic object
    Object,
    /// Arm hand target
    Hand,
    /// Wrist swinging about its pivot
    Wrist,
}

impl Channel {
    /// All channels
    pub const ALL: [Channel; 4] = [Channel::Agent, Channel::Object, Channel::Hand, Channel::Wrist];
}

/// Default bounding radius of the walking base (m)
pub const AGENT_RADIUS: f32 = 0.3;

/// Default bounding radius of the hand (m)
pub const HAND_RADIUS: f32 = 0.05;

/// Host world implementing the per-tick driving loop
#[derive(Debug, Clone)]
pub struct SimWorld {
    pub agent: PlanarAgent,
    pub agent_radius: f32,
    pub object: KinematicBody,
    pub hand: ReachSolver,
    pub hand_radius: f32,
    pub wrist: PivotFrame,
    pub rig: ArmRig,
    pub scene: StaticScene,
    pub(crate) monitors: [ObstructionMonitor; 4],
    clock: f32,
    steps: u64,
}

impl SimWorld {
    /// Create an empty world with bodies built from configuration
    ///
    /// The agent starts at the origin facing +X, the arm shoulder sits
    /// 1 m above it and the wrist hangs 0.1 m past the hand.
    pub fn new(config: &MotionConfig) -> Self {
        let agent = &config.agent;
        let linear = DampedBody::new(agent.mass, agent.linear_damping);
        let angular = DampedBody::new(agent.moment_of_inertia, agent.angular_damping);
        let shoulder = Vector3::new(0.0, 0.0, 1.0);
        let hand = ReachSolver::new(shoulder, 0.4, 0.35);
        let hand_tip = shoulder + Vector3::new(hand.reach(), 0.0, 0.0);

        Self {
            agent: PlanarAgent::new(linear, angular, Vector3::zeros()),
            agent_radius: AGENT_RADIUS,
            object: KinematicBody::new(Vector3::new(1.0, 0.0, 0.5), 0.1),
            hand,
            hand_radius: HAND_RADIUS,
            wrist: PivotFrame::new(hand_tip, hand_tip + Vector3::new(0.1, 0.0, 0.0)),
            rig: ArmRig::from_config(&config.joints),
            scene: StaticScene::new(),
            monitors: Default::default(),
            clock: 0.0,
            steps: 0,
        }
    }

    /// Replace the obstacle scene
    pub fn with_scene(mut self, scene: StaticScene) -> Self {
        self.scene = scene;
        self
    }

    /// Get a channel's monitor
    pub fn monitor(&self, channel: Channel) -> &ObstructionMonitor {
        &self.monitors[channel as usize]
    }

    /// Get simulated seconds elapsed
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Get physics steps taken
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Get the bounding sphere a channel is tested with
    pub fn probe(&self, channel: Channel) -> (Vector3<f32>, f32) {
        match channel {
            Channel::Agent => (self.agent.world_position(), self.agent_radius),
            Channel::Object => (self.object.position(), self.object.radius),
            Channel::Hand => (self.hand.end_effector(), self.hand_radius),
            Channel::Wrist => (self.wrist.child_position(), self.hand_radius),
        }
    }

    /// Re-test every channel against the scene
    pub fn refresh_contacts(&mut self) {
        for channel in Channel::ALL {
            let (center, radius) = self.probe(channel);
            let contacts = self.scene.check(&center, radius, &mut self.monitors[channel as usize]);
            if contacts > 0 {
                trace!(?channel, contacts, "contacts");
            }
        }
    }
}

impl PhysicsWorld for SimWorld {
    fn advance(&mut self, dt: f32) {
        self.agent.integrate(dt);
        self.rig.integrate(dt);
        self.refresh_contacts();
        self.clock += dt;
        self.steps += 1;
    }
}
