//! Obstacle scenes feeding the obstruction monitor

pub mod scene;

pub use scene::{Obstacle, Shape, StaticScene, MAX_OBSTACLES};
