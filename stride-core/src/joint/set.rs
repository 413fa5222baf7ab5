//! Lift, extend and rotate controllers of one arm

use heapless::Vec;

use super::controller::{JointController, JointMotionParams};
use super::machine::StopReason;
use crate::motion::MotionError;
use crate::traits::{JointKind, JointRig};

/// Independent controllers for every joint axis of an arm
#[derive(Debug, Clone)]
pub struct JointSet {
    lift: JointController,
    extend: JointController,
    rotate: JointController,
}

impl Default for JointSet {
    fn default() -> Self {
        Self::new()
    }
}

impl JointSet {
    /// Create a set with every joint idle
    pub fn new() -> Self {
        Self {
            lift: JointController::new(JointKind::Lift),
            extend: JointController::new(JointKind::Extend),
            rotate: JointController::new(JointKind::Rotate),
        }
    }

    /// Borrow one joint's controller
    pub fn joint(&self, kind: JointKind) -> &JointController {
        match kind {
            JointKind::Lift => &self.lift,
            JointKind::Extend => &self.extend,
            JointKind::Rotate => &self.rotate,
        }
    }

    fn joint_mut(&mut self, kind: JointKind) -> &mut JointController {
        match kind {
            JointKind::Lift => &mut self.lift,
            JointKind::Extend => &mut self.extend,
            JointKind::Rotate => &mut self.rotate,
        }
    }

    /// Start a movement on one joint
    pub fn request<R>(
        &mut self,
        kind: JointKind,
        params: JointMotionParams,
        rig: &mut R,
    ) -> Result<(), MotionError>
    where
        R: JointRig + ?Sized,
    {
        let drive = rig.drive(kind);
        self.joint_mut(kind).request(params, &*drive)
    }

    /// Run one tick on every moving joint
    ///
    /// Returns the joints that stopped on this tick.
    pub fn update<R>(&mut self, rig: &mut R) -> Vec<(JointKind, StopReason), 3>
    where
        R: JointRig + ?Sized,
    {
        let mut stopped = Vec::new();
        for kind in JointKind::ALL {
            if let Some(reason) = self.joint_mut(kind).update(rig.drive(kind)) {
                // At most one entry per joint kind
                let _ = stopped.push((kind, reason));
            }
        }
        stopped
    }

    /// Abort every moving joint
    pub fn abort_all<R>(&mut self, rig: &mut R)
    where
        R: JointRig + ?Sized,
    {
        for kind in JointKind::ALL {
            self.joint_mut(kind).abort(rig.drive(kind));
        }
    }

    /// Check whether every joint is idle
    pub fn is_idle(&self) -> bool {
        JointKind::ALL.iter().all(|kind| self.joint(*kind).is_idle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::JointState;
    use crate::traits::{Direction, JointDrive};

    #[derive(Default)]
    struct SnapDrive {
        position: f32,
        target: f32,
    }

    impl JointDrive for SnapDrive {
        fn position(&self) -> f32 {
            self.position
        }

        fn set_drive_target(&mut self, target: f32) {
            self.target = target;
        }
    }

    #[derive(Default)]
    struct Rig {
        drives: [SnapDrive; 3],
    }

    impl Rig {
        fn advance(&mut self) {
            for drive in &mut self.drives {
                drive.position = drive.target;
            }
        }
    }

    impl JointRig for Rig {
        fn drive(&mut self, kind: JointKind) -> &mut dyn JointDrive {
            &mut self.drives[kind as usize]
        }
    }

    fn params(displacement: f32) -> JointMotionParams {
        JointMotionParams {
            displacement,
            speed: 1.0,
            tolerance: 1e-4,
            max_elapsed_time: 10.0,
            cache_size: 8,
            tick_duration: 0.25,
        }
    }

    #[test]
    fn test_joints_stop_independently() {
        let mut rig = Rig::default();
        let mut joints = JointSet::new();
        joints.request(JointKind::Lift, params(0.5), &mut rig).unwrap();
        joints.request(JointKind::Rotate, params(-1.0), &mut rig).unwrap();
        assert_eq!(joints.joint(JointKind::Extend).state(), JointState::Idle);

        let mut stops: Vec<(u32, JointKind), 3> = Vec::new();
        for tick in 1..=20 {
            for (kind, reason) in joints.update(&mut rig) {
                assert_eq!(reason, StopReason::DistanceReached);
                stops.push((tick, kind)).unwrap();
            }
            rig.advance();
        }

        assert_eq!(stops.as_slice(), &[(3, JointKind::Lift), (5, JointKind::Rotate)]);
        assert_eq!(rig.drives[JointKind::Lift as usize].position, 0.5);
        assert_eq!(rig.drives[JointKind::Rotate as usize].position, -1.0);
        assert!(joints.is_idle());
    }

    #[test]
    fn test_busy_joint_does_not_block_others() {
        let mut rig = Rig::default();
        let mut joints = JointSet::new();
        joints.request(JointKind::Lift, params(1.0), &mut rig).unwrap();

        assert_eq!(
            joints.request(JointKind::Lift, params(1.0), &mut rig),
            Err(MotionError::Busy)
        );
        joints.request(JointKind::Extend, params(1.0), &mut rig).unwrap();
        assert_eq!(
            joints.joint(JointKind::Extend).state(),
            JointState::Moving(Direction::Positive)
        );
    }

    #[test]
    fn test_abort_all() {
        let mut rig = Rig::default();
        let mut joints = JointSet::new();
        joints.request(JointKind::Lift, params(1.0), &mut rig).unwrap();
        joints.request(JointKind::Extend, params(1.0), &mut rig).unwrap();

        joints.abort_all(&mut rig);
        assert!(joints.is_idle());
        assert_eq!(joints.joint(JointKind::Lift).last_stop(), Some(StopReason::Aborted));
        assert_eq!(joints.joint(JointKind::Rotate).last_stop(), None);
    }
}
