//! Tick scheduling
//!
//! Motions are explicit state objects stepped once per simulation tick.
//! The host either steps them with a frame callback between physics
//! updates ([`run_stepped`]), or hands them to [`run_batch`] to resolve
//! every tick back-to-back.

pub mod runner;

pub use runner::{run, run_batch, run_stepped, Motion, MotionHost, Progress, TickMode};
