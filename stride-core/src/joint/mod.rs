//! Per-joint motion
//!
//! Each joint axis runs its own Idle/Moving machine. Joints converge
//! independently; a composite arm motion has no shared completion barrier.

pub mod controller;
pub mod machine;
pub mod set;

pub use controller::{JointController, JointMotionParams};
pub use machine::{JointEvent, JointState, StopReason};
pub use set::JointSet;
