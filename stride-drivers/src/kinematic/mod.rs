//! Kinematic properties driven by the incremental mover

pub mod body;
pub mod pivot;
pub mod reach;

pub use body::{KinematicBody, Orientation, Translation};
pub use pivot::PivotFrame;
pub use reach::{ReachSolver, TwoLinkPose};
