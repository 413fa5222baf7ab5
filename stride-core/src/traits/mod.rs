//! Simulation abstraction traits
//!
//! These traits define the interface between the motion controllers and
//! whatever owns the bodies, joints and collision listeners.

pub mod body;
pub mod collision;
pub mod joint;
pub mod world;

pub use body::ForceBody;
pub use collision::{CollisionSignal, Obstruction, MAX_NAME_LEN};
pub use joint::{Direction, JointDrive, JointKind, JointRig};
pub use world::PhysicsWorld;
