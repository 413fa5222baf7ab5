//! Damped point-mass body
//!
//! Integrates one axis with semi-implicit Euler. Forces applied during a
//! tick accumulate and are cleared after the next integration step.

use stride_core::traits::ForceBody;

/// One-axis body resisted by viscous damping
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DampedBody {
    /// Mass, or moment of inertia for a rotating body
    mass: f32,
    /// Damping coefficient (force per unit velocity)
    damping: f32,
    position: f32,
    velocity: f32,
    /// Force accumulated since the last step
    force: f32,
}

impl DampedBody {
    /// Create a body at rest at the origin
    ///
    /// # Arguments
    /// - `mass`: Mass or moment of inertia, must be positive
    /// - `damping`: Damping coefficient, zero for a frictionless body
    pub fn new(mass: f32, damping: f32) -> Self {
        Self {
            mass,
            damping,
            position: 0.0,
            velocity: 0.0,
            force: 0.0,
        }
    }

    /// Place the body at a starting position
    pub fn at(mut self, position: f32) -> Self {
        self.position = position;
        self
    }

    /// Advance by `dt` seconds and clear the accumulated force
    ///
    /// Returns the distance travelled during the step.
    pub fn integrate(&mut self, dt: f32) -> f32 {
        let accel = (self.force - self.damping * self.velocity) / self.mass;
        self.velocity += accel * dt;
        let delta = self.velocity * dt;
        self.position += delta;
        self.force = 0.0;
        delta
    }

    /// Get the mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Get the force waiting for the next step
    pub fn pending_force(&self) -> f32 {
        self.force
    }
}

impl ForceBody for DampedBody {
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
