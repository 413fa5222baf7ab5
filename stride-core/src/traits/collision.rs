//! Collision signal trait
//!
//! The signal is owned and written by the host's contact listeners. The
//! controllers only reset it once per request and poll it once per tick.

use heapless::String;

/// Maximum stored length of an obstruction name in bytes
pub const MAX_NAME_LEN: usize = 32;

/// The first static entity that blocked a motion
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Obstruction {
    /// Entity name (truncated to [`MAX_NAME_LEN`])
    pub name: String<MAX_NAME_LEN>,
    /// True for registered scene objects, false for raw scene structure
    pub is_known_entity: bool,
}

impl Obstruction {
    /// Create an obstruction record, truncating long names at a char boundary
    pub fn new(name: &str, is_known_entity: bool) -> Self {
        let mut stored = String::new();
        for c in name.chars() {
            if stored.push(c).is_err() {
                break;
            }
        }
        Self {
            name: stored,
            is_known_entity,
        }
    }
}

/// Polled obstruction flag consumed by every controller
pub trait CollisionSignal {
    /// Clear all recorded contacts; called once when a motion request starts
    fn reset(&mut self);

    /// Check whether the in-flight motion must stop
    fn should_halt(&self) -> bool;

    /// Get the first static obstruction recorded since the last reset
    fn first_static_obstruction(&self) -> Option<Obstruction>;
}
