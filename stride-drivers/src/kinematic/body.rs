//! Kinematic translation and orientation
//!
//! The two channels are separate fields so a translation move and a
//! rotation move can run side by side on the same body.

use nalgebra::{UnitQuaternion, Vector3};

use stride_core::motion::Property;

/// World position of a kinematic body (m)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translation(pub Vector3<f32>);

impl Property for Translation {
    type Value = Vector3<f32>;

    fn get(&self) -> Vector3<f32> {
        self.0
    }

    fn set(&mut self, value: Vector3<f32>) {
        self.0 = value;
    }
}

/// World orientation of a kinematic body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation(pub UnitQuaternion<f32>);

impl Default for Orientation {
    fn default() -> Self {
        Self(UnitQuaternion::identity())
    }
}

impl Property for Orientation {
    type Value = UnitQuaternion<f32>;

    fn get(&self) -> UnitQuaternion<f32> {
        self.0
    }

    fn set(&mut self, value: UnitQuaternion<f32>) {
        self.0 = value;
    }
}

/// Body placed directly by transform rather than by force
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicBody {
    pub translation: Translation,
    pub orientation: Orientation,
    /// Bounding sphere radius used for obstacle checks
    pub radius: f32,
}

impl KinematicBody {
    /// Create a body at `position` with identity orientation
    pub fn new(position: Vector3<f32>, radius: f32) -> Self {
        Self {
            translation: Translation(position),
            orientation: Orientation::default(),
            radius,
        }
    }

    /// Get the world position
    pub fn position(&self) -> Vector3<f32> {
        self.translation.0
    }

    /// Get the heading about the vertical axis in degrees
    pub fn yaw_degrees(&self) -> f32 {
        self.orientation.0.euler_angles().2.to_degrees()
    }
}
