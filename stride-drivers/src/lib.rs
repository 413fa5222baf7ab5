//! Simulated implementations of the stride-core traits
//!
//! This crate provides concrete bodies, drives and scenes that the motion
//! controllers in stride-core can drive:
//!
//! - Force-integrated bodies (damped point mass, planar agent)
//! - Position-tracking joint drives with travel limits
//! - Kinematic properties (translation, orientation, pivot frame, reach solver)
//! - Static obstacle scenes feeding the obstruction monitor

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod body;
pub mod collision;
pub mod joint;
pub mod kinematic;
