//! Collision signalling
//!
//! Tracks contacts reported by the host and decides when a motion must halt.

pub mod monitor;

pub use monitor::{NeverHalt, ObstructionMonitor};
