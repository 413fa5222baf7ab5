//! Two-link reach solver
//!
//! The mover drives the hand target; every write re-derives base yaw,
//! shoulder pitch and elbow bend so the arm tracks the target tick by tick.
//! Targets outside the annulus `[|upper - fore|, upper + fore]` are pulled
//! onto its nearest edge.

use libm::{acosf, atan2f, cosf, fabsf, sinf, sqrtf};
use nalgebra::Vector3;

use stride_core::motion::Property;

/// Joint angles of a two-link arm, in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TwoLinkPose {
    /// Rotation of the arm plane about the vertical axis
    pub yaw: f32,
    /// Upper link elevation above the horizontal
    pub shoulder: f32,
    /// Bend between the upper link and the forearm (0 = straight)
    pub elbow: f32,
}

/// Inverse kinematics for a yawing two-link arm, driven through its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachSolver {
    base: Vector3<f32>,
    upper: f32,
    fore: f32,
    target: Vector3<f32>,
    pose: TwoLinkPose,
    reachable: bool,
}

impl ReachSolver {
    /// Create an arm at `base`, fully extended along +X
    ///
    /// # Arguments
    /// - `base`: Shoulder position
    /// - `upper`: Upper link length, must be positive
    /// - `fore`: Forearm length, must be positive
    pub fn new(base: Vector3<f32>, upper: f32, fore: f32) -> Self {
        Self {
            base,
            upper,
            fore,
            target: base + Vector3::new(upper + fore, 0.0, 0.0),
            pose: TwoLinkPose::default(),
            reachable: true,
        }
    }

    /// Get the current joint angles
    pub fn pose(&self) -> TwoLinkPose {
        self.pose
    }

    /// Check whether the last target was within reach
    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    /// Get the longest reach
    pub fn reach(&self) -> f32 {
        self.upper + self.fore
    }

    /// Solve for a target
    ///
    /// Returns the pose and whether the target was reachable.
    pub fn solve(&self, target: &Vector3<f32>) -> (TwoLinkPose, bool) {
        let d = target - self.base;
        let yaw = atan2f(d.y, d.x);
        let mut radial = sqrtf(d.x * d.x + d.y * d.y);
        let mut height = d.z;

        let max_reach = self.upper + self.fore;
        let min_reach = fabsf(self.upper - self.fore);
        let distance = sqrtf(radial * radial + height * height);

        let clamped = distance.clamp(min_reach, max_reach);
        let reachable = fabsf(clamped - distance) <= 1e-6;
        if distance > f32::EPSILON {
            let scale = clamped / distance;
            radial *= scale;
            height *= scale;
        } else {
            radial = min_reach;
            height = 0.0;
        }

        let upper2 = self.upper * self.upper;
        let fore2 = self.fore * self.fore;
        let cos_elbow =
            ((clamped * clamped - upper2 - fore2) / (2.0 * self.upper * self.fore)).clamp(-1.0, 1.0);
        let elbow = acosf(cos_elbow);
        let shoulder =
            atan2f(height, radial) - atan2f(self.fore * sinf(elbow), self.upper + self.fore * cos_elbow);

        (TwoLinkPose { yaw, shoulder, elbow }, reachable)
    }

    /// Get the hand position for the current pose
    pub fn end_effector(&self) -> Vector3<f32> {
        let TwoLinkPose { yaw, shoulder, elbow } = self.pose;
        let radial = self.upper * cosf(shoulder) + self.fore * cosf(shoulder + elbow);
        let height = self.upper * sinf(shoulder) + self.fore * sinf(shoulder + elbow);
        self.base + Vector3::new(radial * cosf(yaw), radial * sinf(yaw), height)
    }
}

impl Property for ReachSolver {
    type Value = Vector3<f32>;

    fn get(&self) -> Vector3<f32> {
        self.target
    }

    fn set(&mut self, value: Vector3<f32>) {
        let (pose, reachable) = self.solve(&value);
        self.target = value;
        self.pose = pose;
        self.reachable = reachable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stride_core::collision::NeverHalt;
    use stride_core::motion::{IncrementalMover, Linear, MotionRequest};
    use stride_core::scheduler::Progress;

    fn arm() -> ReachSolver {
        ReachSolver::new(Vector3::new(0.0, 0.0, 1.0), 0.4, 0.3)
    }

    #[test]
    fn test_initial_pose_is_straight() {
        let arm = arm();
        assert!((arm.end_effector() - Vector3::new(0.7, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_reachable_target() {
        let mut arm = arm();
        let target = Vector3::new(0.2, 0.3, 1.2);
        arm.set(target);
        assert!(arm.is_reachable());
        assert!((arm.end_effector() - target).norm() < 1e-4);
    }

    #[test]
    fn test_unreachable_target_clamps_to_full_reach() {
        let mut arm = arm();
        arm.set(Vector3::new(0.0, 5.0, 1.0));
        assert!(!arm.is_reachable());
        assert!((arm.end_effector() - Vector3::new(0.0, 0.7, 1.0)).norm() < 1e-4);
        // The requested target is kept for the mover
        assert_eq!(arm.get(), Vector3::new(0.0, 5.0, 1.0));
    }

    #[test]
    fn test_mover_tracks_hand_target() {
        let mut arm = arm();
        let mut signal = NeverHalt;
        let target = Vector3::new(0.3, -0.3, 0.9);
        let request = MotionRequest::new(target, 0.5, 0.02).with_epsilon(1e-8);
        let mut mover = IncrementalMover::start(Linear, request, &arm, &mut signal).unwrap();

        let mut outcome = None;
        for _ in 0..1_000 {
            if let Progress::Done(done) = mover.step(&mut arm, &signal) {
                outcome = Some(done);
                break;
            }
            // The pose follows every intermediate target
            assert!((arm.end_effector() - arm.get()).norm() < 1e-3);
        }

        assert!(outcome.unwrap().success());
        assert!((arm.end_effector() - target).norm() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_reachable_targets_are_hit(
            distance in 0.15f32..0.65,
            yaw in -3.0f32..3.0,
            pitch in -1.2f32..1.2,
        ) {
            let mut arm = arm();
            let offset = Vector3::new(
                distance * cosf(pitch) * cosf(yaw),
                distance * cosf(pitch) * sinf(yaw),
                distance * sinf(pitch),
            );
            let target = Vector3::new(0.0, 0.0, 1.0) + offset;
            arm.set(target);
            prop_assert!(arm.is_reachable());
            prop_assert!((arm.end_effector() - target).norm() < 1e-3);
        }
    }
}
