//! Driven property trait

/// A value the mover reads and writes once per tick
///
/// The mover owns the property exclusively for the duration of a request.
/// Implementations may derive dependent state (an IK chain, a child
/// transform) from the written value before the next read.
pub trait Property {
    /// Value type, matching the stepping strategy's value
    type Value: Copy;

    /// Read the current value
    fn get(&self) -> Self::Value;

    /// Write a new value
    fn set(&mut self, value: Self::Value);
}

impl Property for f32 {
    type Value = f32;

    fn get(&self) -> f32 {
        *self
    }

    fn set(&mut self, value: f32) {
        *self = value;
    }
}
