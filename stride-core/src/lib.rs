//! Host-agnostic core logic for incremental, collision-aware motion control
//!
//! This crate contains all motion logic that does not depend on a specific
//! physics engine or scene representation:
//!
//! - Hardware/simulation abstraction traits (collision signal, force body, joint drive)
//! - Generic incremental mover for kinematic properties
//! - Trapezoidal force/torque profile controller for physics-driven bodies
//! - Convergence detection over a ring buffer of samples
//! - Per-joint state machines
//! - Cooperative and batch tick scheduling
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod collision;
pub mod config;
pub mod joint;
pub mod motion;
pub mod scheduler;
pub mod traits;
