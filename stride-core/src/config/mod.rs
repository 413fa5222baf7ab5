//! Configuration types
//!
//! Host-agnostic motion settings. The host loads them from TOML text or a
//! postcard blob.

pub mod types;

pub use types::*;
