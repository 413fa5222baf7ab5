//! Lift, extend and rotate drives of one arm

use stride_core::config::JointsConfig;
use stride_core::traits::{JointDrive, JointKind, JointRig};

use super::drive::PositionDrive;

/// Three position drives making up an arm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmRig {
    pub lift: PositionDrive,
    pub extend: PositionDrive,
    pub rotate: PositionDrive,
}

impl ArmRig {
    /// Create a rig with every joint at its lower limit, rotation centred
    pub fn from_config(config: &JointsConfig) -> Self {
        Self {
            lift: PositionDrive::from_config(config.lift.min, &config.lift),
            extend: PositionDrive::from_config(config.extend.min, &config.extend),
            rotate: PositionDrive::from_config(0.0, &config.rotate),
        }
    }

    /// Borrow one drive
    pub fn get(&self, kind: JointKind) -> &PositionDrive {
        match kind {
            JointKind::Lift => &self.lift,
            JointKind::Extend => &self.extend,
            JointKind::Rotate => &self.rotate,
        }
    }

    /// Track every drive's target for `dt` seconds
    pub fn integrate(&mut self, dt: f32) {
        self.lift.integrate(dt);
        self.extend.integrate(dt);
        self.rotate.integrate(dt);
    }
}

impl JointRig for ArmRig {
    fn drive(&mut self, kind: JointKind) -> &mut dyn JointDrive {
        match kind {
            JointKind::Lift => &mut self.lift,
            JointKind::Extend => &mut self.extend,
            JointKind::Rotate => &mut self.rotate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rig_from_config() {
        let config = JointsConfig::default();
        let rig = ArmRig::from_config(&config);
        assert_eq!(rig.get(JointKind::Lift).position(), config.lift.min);
        assert_eq!(rig.get(JointKind::Rotate).position(), 0.0);
    }

    #[test]
    fn test_rig_routes_targets() {
        let mut rig = ArmRig::from_config(&JointsConfig::default());
        rig.drive(JointKind::Extend).set_drive_target(0.25);
        assert_eq!(rig.extend.target(), 0.25);
        assert_eq!(rig.lift.target(), rig.lift.position());
    }
}
