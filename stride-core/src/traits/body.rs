//! Force-integrated body trait
//!
//! Abstracts a dynamically simulated body (whole articulated agent, a
//! turning base) that is moved by applying forces or torques rather than
//! by setting its transform.

/// A body driven along a single axis by force (linear) or torque (angular)
///
/// Position and velocity are measured by the body itself along its drive
/// axis: metres and m/s for linear bodies, degrees and deg/s for angular
/// ones.
pub trait ForceBody {
    /// Get the measured position along the drive axis
    fn position(&self) -> f32;

    /// Get the measured signed velocity along the drive axis
    fn velocity(&self) -> f32;

    /// Get the linear damping coefficient resisting motion
    fn damping(&self) -> f32;

    /// Apply a signed force or torque for the next physics step
    fn apply_force(&mut self, force: f32);

    /// Zero all linear and angular velocity
    fn halt(&mut self);

    /// Place the body at a position along its drive axis
    ///
    /// Only used to roll back after a collision.
    fn reset_position(&mut self, position: f32);
}
