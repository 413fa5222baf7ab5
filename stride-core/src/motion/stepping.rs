//! Stepping strategies
//!
//! A strategy supplies the `direction_of` / `advance` / `distance_of` set for
//! one value type so a single mover loop serves positions, rotations and
//! scalar joint values alike.

use libm::{atan2f, fabsf};
use nalgebra::{UnitQuaternion, Vector3};

/// Per-tick advance
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Move by this amount (metres, degrees or joint units) per tick
    By(f32),
    /// Jump straight to the target
    Teleport,
}

/// Strategy for stepping one value type toward a target
pub trait Stepping {
    /// The driven value
    type Value: Copy;
    /// Direction from a value toward the target
    type Direction: Copy;

    /// Compute the direction from `current` toward `target`
    ///
    /// The direction carries the full remaining offset, so a teleport can
    /// land on the target exactly.
    fn direction_of(&self, target: &Self::Value, current: &Self::Value) -> Self::Direction;

    /// Compute the next value one step along `direction`
    ///
    /// A step never carries the value past the end of `direction`.
    fn advance(&self, current: &Self::Value, direction: &Self::Direction, step: Step) -> Self::Value;

    /// Check whether one step covers the whole remaining offset
    fn reaches(&self, direction: &Self::Direction, step: Step) -> bool;

    /// Measure the remaining distance in this strategy's metric
    fn distance_of(&self, target: &Self::Value, value: &Self::Value) -> f32;

    /// Check that a value contains no NaN or infinite components
    fn is_finite(&self, value: &Self::Value) -> bool;
}

/// Linear translation; distance is the **squared** Euclidean distance
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Stepping for Linear {
    type Value = Vector3<f32>;
    type Direction = Vector3<f32>;

    fn direction_of(&self, target: &Vector3<f32>, current: &Vector3<f32>) -> Vector3<f32> {
        target - current
    }

    fn advance(&self, current: &Vector3<f32>, direction: &Vector3<f32>, step: Step) -> Vector3<f32> {
        match step {
            Step::Teleport => current + direction,
            Step::By(_) if self.reaches(direction, step) => current + direction,
            Step::By(amount) => match direction.try_normalize(f32::EPSILON) {
                Some(unit) => current + unit * amount,
                // Offset too small to normalise: close it outright
                None => current + direction,
            },
        }
    }

    fn reaches(&self, direction: &Vector3<f32>, step: Step) -> bool {
        match step {
            Step::Teleport => true,
            Step::By(amount) => amount * amount >= direction.norm_squared(),
        }
    }

    fn distance_of(&self, target: &Vector3<f32>, value: &Vector3<f32>) -> f32 {
        (target - value).norm_squared()
    }

    fn is_finite(&self, value: &Vector3<f32>) -> bool {
        value.iter().all(|c| c.is_finite())
    }
}

/// Rotation; steps are in degrees and distance is the angle in degrees
#[derive(Debug, Clone, Copy, Default)]
pub struct Angular;

impl Stepping for Angular {
    type Value = UnitQuaternion<f32>;
    type Direction = UnitQuaternion<f32>;

    fn direction_of(
        &self,
        target: &UnitQuaternion<f32>,
        current: &UnitQuaternion<f32>,
    ) -> UnitQuaternion<f32> {
        target * current.inverse()
    }

    fn advance(
        &self,
        current: &UnitQuaternion<f32>,
        direction: &UnitQuaternion<f32>,
        step: Step,
    ) -> UnitQuaternion<f32> {
        match step {
            Step::Teleport => direction * current,
            Step::By(_) if self.reaches(direction, step) => direction * current,
            Step::By(degrees) => {
                let fraction = degrees.to_radians() / rotation_angle(direction);
                direction.powf(fraction) * current
            }
        }
    }

    fn reaches(&self, direction: &UnitQuaternion<f32>, step: Step) -> bool {
        match step {
            Step::Teleport => true,
            Step::By(degrees) => {
                let remaining = rotation_angle(direction);
                remaining <= f32::EPSILON || degrees.to_radians() >= remaining
            }
        }
    }

    fn distance_of(&self, target: &UnitQuaternion<f32>, value: &UnitQuaternion<f32>) -> f32 {
        rotation_angle(&(value.inverse() * target)).to_degrees()
    }

    fn is_finite(&self, value: &UnitQuaternion<f32>) -> bool {
        value.coords.iter().all(|c| c.is_finite())
    }
}

/// Rotation angle in radians, in [0, pi]
///
/// Uses `atan2` rather than `acos` so near-identity rotations read as
/// near zero instead of being dominated by rounding in `w`.
fn rotation_angle(q: &UnitQuaternion<f32>) -> f32 {
    2.0 * atan2f(q.imag().norm(), fabsf(q.scalar()))
}

/// Scalar joint value; distance is the absolute difference
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl Stepping for Scalar {
    type Value = f32;
    type Direction = f32;

    fn direction_of(&self, target: &f32, current: &f32) -> f32 {
        target - current
    }

    fn advance(&self, current: &f32, direction: &f32, step: Step) -> f32 {
        match step {
            Step::Teleport => current + direction,
            Step::By(amount) if *direction > 0.0 => current + amount.min(*direction),
            Step::By(amount) if *direction < 0.0 => current - amount.min(-direction),
            Step::By(_) => *current,
        }
    }

    fn reaches(&self, direction: &f32, step: Step) -> bool {
        match step {
            Step::Teleport => true,
            Step::By(amount) => amount >= fabsf(*direction),
        }
    }

    fn distance_of(&self, target: &f32, value: &f32) -> f32 {
        fabsf(target - value)
    }

    fn is_finite(&self, value: &f32) -> bool {
        value.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        fabsf(a - b) <= tol
    }

    #[test]
    fn test_linear_advance_by_step() {
        let current = Vector3::new(0.0, 0.0, 0.0);
        let target = Vector3::new(3.0, 4.0, 0.0);
        let dir = Linear.direction_of(&target, &current);
        let next = Linear.advance(&current, &dir, Step::By(1.0));

        assert!(approx(next.x, 0.6, 1e-6));
        assert!(approx(next.y, 0.8, 1e-6));
        assert!(approx(Linear.distance_of(&target, &next), 16.0, 1e-4));
    }

    #[test]
    fn test_linear_distance_is_squared() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 2.0, 0.0);
        assert_eq!(Linear.distance_of(&a, &b), 4.0);
    }

    #[test]
    fn test_linear_zero_direction_stays_put() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        let dir = Linear.direction_of(&p, &p);
        assert_eq!(Linear.advance(&p, &dir, Step::By(0.5)), p);
    }

    #[test]
    fn test_linear_tiny_offset_closes() {
        let target = Vector3::new(0.0, 0.0, 1e-8);
        let current = Vector3::zeros();
        let dir = Linear.direction_of(&target, &current);
        assert_eq!(Linear.advance(&current, &dir, Step::By(0.5)), target);
    }

    #[test]
    fn test_linear_teleport_lands_on_target() {
        let current = Vector3::new(-7.0, 0.25, 9.0);
        let target = Vector3::new(1.5, 2.0, -3.0);
        let dir = Linear.direction_of(&target, &current);
        assert_eq!(Linear.advance(&current, &dir, Step::Teleport), target);
    }

    #[test]
    fn test_angular_advance_by_degrees() {
        let current = UnitQuaternion::identity();
        let target = UnitQuaternion::from_euler_angles(0.0, 0.0, 90.0f32.to_radians());
        let dir = Angular.direction_of(&target, &current);
        let next = Angular.advance(&current, &dir, Step::By(30.0));

        assert!(approx(next.angle_to(&current).to_degrees(), 30.0, 1e-3));
        assert!(approx(Angular.distance_of(&target, &next), 60.0, 1e-3));
    }

    #[test]
    fn test_angular_step_past_target_lands_on_target() {
        let current = UnitQuaternion::identity();
        let target = UnitQuaternion::from_euler_angles(0.0, 0.0, 10.0f32.to_radians());
        let dir = Angular.direction_of(&target, &current);
        let next = Angular.advance(&current, &dir, Step::By(45.0));

        assert!(Angular.distance_of(&target, &next) < 1e-3);
    }

    #[test]
    fn test_angular_distance_of_identical_rotations_is_zero() {
        let q = UnitQuaternion::from_euler_angles(0.3, -1.2, 2.5);
        assert!(Angular.distance_of(&q, &q) < 1e-4);
    }

    #[test]
    fn test_scalar_advance_toward_target() {
        assert_eq!(Scalar.advance(&0.0, &1.0, Step::By(0.25)), 0.25);
        assert_eq!(Scalar.advance(&0.0, &-1.0, Step::By(0.25)), -0.25);
        assert_eq!(Scalar.advance(&0.5, &0.0, Step::By(0.25)), 0.5);
        assert_eq!(Scalar.advance(&0.5, &-2.0, Step::Teleport), -1.5);
        assert_eq!(Scalar.distance_of(&-1.0, &0.5), 1.5);
    }

    #[test]
    fn test_scalar_step_capped_at_offset() {
        let current = -27.205809f32;
        let dir = Scalar.direction_of(&17.104357, &current);
        let next = Scalar.advance(&current, &dir, Step::By(3680.551 * 0.02));

        assert!(Scalar.reaches(&dir, Step::By(3680.551 * 0.02)));
        assert!(fabsf(next - 17.104357) < 1e-4);
        assert!(!Scalar.reaches(&dir, Step::By(1.0)));
    }

    #[test]
    fn test_linear_step_capped_at_offset() {
        let current = Vector3::zeros();
        let target = Vector3::new(1.0, 0.0, 0.0);
        let dir = Linear.direction_of(&target, &current);
        let step = Step::By(90.0 * 0.02);

        assert!(Linear.reaches(&dir, step));
        assert_eq!(Linear.advance(&current, &dir, step), target);
        assert!(!Linear.reaches(&dir, Step::By(0.5)));
    }

    #[test]
    fn test_finiteness_checks() {
        assert!(Scalar.is_finite(&1.0));
        assert!(!Scalar.is_finite(&f32::NAN));
        assert!(!Linear.is_finite(&Vector3::new(0.0, f32::INFINITY, 0.0)));
        assert!(Angular.is_finite(&UnitQuaternion::identity()));
    }
}
