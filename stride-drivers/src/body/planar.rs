//! Planar agent body
//!
//! A walking base with two force-driven axes: distance travelled along the
//! current heading and yaw in degrees. The world position is anchored at
//! the last heading change so a rollback of the linear axis moves the body
//! back along the same line.

use libm::{cosf, sinf};
use nalgebra::Vector3;

use stride_core::traits::ForceBody;

use super::damped::DampedBody;

/// Walking base driven by force along its heading and torque about vertical
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarAgent {
    linear: DampedBody,
    angular: DampedBody,
    /// World position when the linear axis read `anchor_distance`
    anchor: Vector3<f32>,
    anchor_distance: f32,
    /// Heading (deg) the anchor segment runs along
    anchor_heading: f32,
}

impl PlanarAgent {
    /// Create an agent at `position`, facing the angular axis's position
    pub fn new(linear: DampedBody, angular: DampedBody, position: Vector3<f32>) -> Self {
        Self {
            anchor: position,
            anchor_distance: linear.position(),
            anchor_heading: angular.position(),
            linear,
            angular,
        }
    }

    /// Advance both axes by `dt` seconds
    pub fn integrate(&mut self, dt: f32) {
        self.angular.integrate(dt);
        self.reanchor();
        self.linear.integrate(dt);
    }

    /// Get the world position on the ground plane
    pub fn world_position(&self) -> Vector3<f32> {
        let travelled = self.linear.position() - self.anchor_distance;
        self.anchor + heading_vector(self.anchor_heading) * travelled
    }

    /// Get the heading in degrees
    pub fn heading(&self) -> f32 {
        self.angular.position()
    }

    /// Borrow the walking axis
    pub fn linear(&self) -> &DampedBody {
        &self.linear
    }

    /// Borrow the walking axis mutably
    pub fn linear_mut(&mut self) -> &mut DampedBody {
        &mut self.linear
    }

    /// Borrow the turning axis
    pub fn angular(&self) -> &DampedBody {
        &self.angular
    }

    /// Borrow the turning axis mutably
    ///
    /// Heading writes take effect on the world position at the next
    /// integration step.
    pub fn angular_mut(&mut self) -> &mut DampedBody {
        &mut self.angular
    }

    fn reanchor(&mut self) {
        let heading = self.angular.position();
        if heading != self.anchor_heading {
            self.anchor = self.world_position();
            self.anchor_distance = self.linear.position();
            self.anchor_heading = heading;
        }
    }
}

/// Unit vector on the ground plane for a heading in degrees (0 = +X)
pub fn heading_vector(heading_deg: f32) -> Vector3<f32> {
    let rad = heading_deg.to_radians();
    Vector3::new(cosf(rad), sinf(rad), 0.0)
}
