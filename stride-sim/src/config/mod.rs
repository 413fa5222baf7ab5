//! Configuration loading
//!
//! Reads motion settings from a TOML file or a postcard blob, falling back
//! to the embedded `motion.toml`.

pub mod loader;

pub use loader::{default_config, from_binary, from_toml_str, load, load_bytes, to_binary, DEFAULT_CONFIG};
