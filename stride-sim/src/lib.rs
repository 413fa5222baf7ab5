//! Host simulation runner
//!
//! Wires the stride-core controllers to the stride-drivers bodies:
//!
//! - Configuration loading (TOML or postcard, embedded default)
//! - A simulated world implementing the per-tick driving loop
//! - Per-channel motion hosts for batch and stepped execution
//! - A session turning movement calls into outcomes for a listener

pub mod config;
pub mod error;
pub mod host;
pub mod session;
pub mod world;

pub use error::{LoadError, SimError};
pub use session::{LogListener, RecordingListener, Session};
pub use world::{Channel, SimWorld};
