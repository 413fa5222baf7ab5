//! Joint drives

pub mod drive;
pub mod rig;

pub use drive::PositionDrive;
pub use rig::ArmRig;
