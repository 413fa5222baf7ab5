//! Motion control
//!
//! Tick-driven controllers that move a value or a body toward a target and
//! report a shared success / collision / timeout outcome.

pub mod convergence;
pub mod error;
pub mod mover;
pub mod outcome;
pub mod profile;
pub mod property;
pub mod request;
pub mod stepping;

pub use convergence::{is_stable, ConvergenceDetector, SampleRing, MAX_CACHE_SIZE};
pub use error::MotionError;
pub use mover::{IncrementalMover, SETTLE_TICKS};
pub use outcome::{Message, MotionListener, MotionOutcome, Termination, MAX_MESSAGE_LEN};
pub use profile::{ProfileAxis, ProfileController, ProfileParams, ProfilePhase};
pub use property::Property;
pub use request::MotionRequest;
pub use stepping::{Angular, Linear, Scalar, Step, Stepping};
