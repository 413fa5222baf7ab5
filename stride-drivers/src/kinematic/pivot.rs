//! Rotation about an external pivot
//!
//! A child point hangs off a pivot at a fixed offset. Writing an
//! orientation swings the child around the pivot instead of spinning it in
//! place, as for a door on its hinge or a hand about the elbow.

use nalgebra::{UnitQuaternion, Vector3};

use stride_core::motion::Property;

/// Orientation property that moves a child point around a pivot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotFrame {
    pivot: Vector3<f32>,
    /// Child offset from the pivot at identity orientation
    offset: Vector3<f32>,
    orientation: UnitQuaternion<f32>,
}

impl PivotFrame {
    /// Create a frame around `pivot` with the child currently at `child`
    pub fn new(pivot: Vector3<f32>, child: Vector3<f32>) -> Self {
        Self {
            pivot,
            offset: child - pivot,
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Get the pivot point
    pub fn pivot(&self) -> Vector3<f32> {
        self.pivot
    }

    /// Get the child's world position
    pub fn child_position(&self) -> Vector3<f32> {
        self.pivot + self.orientation * self.offset
    }
}

impl Property for PivotFrame {
    type Value = UnitQuaternion<f32>;

    fn get(&self) -> UnitQuaternion<f32> {
        self.orientation
    }

    fn set(&mut self, value: UnitQuaternion<f32>) {
        self.orientation = value;
    }
}
