//! Articulated joint drive trait

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of travel along a drive axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Increasing position
    Positive,
    /// Decreasing position
    Negative,
}

impl Direction {
    /// Get the direction of a signed displacement (zero counts as positive)
    pub fn of(displacement: f32) -> Self {
        if displacement < 0.0 {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }

    /// Get the sign multiplier (+1 or -1)
    pub fn sign(self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }

    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

/// Joint axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// Vertical lift (metres)
    Lift,
    /// Telescoping extension (metres)
    Extend,
    /// Wrist/base rotation (degrees)
    Rotate,
}

impl JointKind {
    /// All joint kinds in update order
    pub const ALL: [JointKind; 3] = [JointKind::Lift, JointKind::Extend, JointKind::Rotate];

    /// Get a short label for logs and messages
    pub fn label(self) -> &'static str {
        match self {
            JointKind::Lift => "lift",
            JointKind::Extend => "extend",
            JointKind::Rotate => "rotate",
        }
    }
}

/// A position-tracking joint drive
///
/// Unlike [`ForceBody`](super::ForceBody), the controller never computes a
/// force for a joint: it writes a drive target and the drive tracks it.
pub trait JointDrive {
    /// Get the measured joint position
    fn position(&self) -> f32;

    /// Command the drive to track a new target position
    fn set_drive_target(&mut self, target: f32);
}

/// Owner of the lift, extend and rotate drives of one arm
pub trait JointRig {
    /// Borrow the drive for a joint axis
    fn drive(&mut self, kind: JointKind) -> &mut dyn JointDrive;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_of_displacement() {
        assert_eq!(Direction::of(0.3), Direction::Positive);
        assert_eq!(Direction::of(-0.3), Direction::Negative);
        assert_eq!(Direction::of(0.0), Direction::Positive);
    }

    #[test]
    fn test_direction_sign_and_opposite() {
        assert_eq!(Direction::Positive.sign(), 1.0);
        assert_eq!(Direction::Negative.sign(), -1.0);
        assert_eq!(Direction::Positive.opposite(), Direction::Negative);
        assert_eq!(Direction::Negative.opposite(), Direction::Positive);
    }

    #[test]
    fn test_joint_kind_labels() {
        let labels = JointKind::ALL.map(JointKind::label);
        assert_eq!(labels, ["lift", "extend", "rotate"]);
    }
}
