//! Obstruction monitor implementation
//!
//! Latches the first static contact reported since the last reset. The
//! monitor is written by the host's contact listeners between ticks and
//! polled by the controllers at each tick.

use crate::traits::{CollisionSignal, Obstruction};

/// Default [`CollisionSignal`] backed by a polled halt flag
#[derive(Debug, Clone, Default)]
pub struct ObstructionMonitor {
    /// First static obstruction since reset
    obstruction: Option<Obstruction>,
    /// Halt flag polled once per tick
    halt: bool,
    /// Whether contacts with moving entities also halt motion
    halt_on_dynamic: bool,
    /// Contacts recorded since reset
    contacts: u16,
}

impl ObstructionMonitor {
    /// Create a monitor that only halts on static contacts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a monitor that also halts on contacts with moving entities
    pub fn halting_on_dynamic() -> Self {
        Self {
            halt_on_dynamic: true,
            ..Self::default()
        }
    }

    /// Record a contact reported by the host
    ///
    /// # Arguments
    /// - `name`: Name of the touched entity
    /// - `is_static`: Whether the entity does not move (walls, fixed furniture)
    /// - `is_known_entity`: Whether the entity is a registered scene object
    pub fn record_contact(&mut self, name: &str, is_static: bool, is_known_entity: bool) {
        self.contacts = self.contacts.saturating_add(1);

        if is_static {
            if self.obstruction.is_none() {
                debug!("static obstruction: {}", name);
                self.obstruction = Some(Obstruction::new(name, is_known_entity));
            }
            self.halt = true;
        } else if self.halt_on_dynamic {
            self.halt = true;
        }
    }

    /// Get the number of contacts recorded since the last reset
    pub fn contact_count(&self) -> u16 {
        self.contacts
    }
}

impl CollisionSignal for ObstructionMonitor {
    fn reset(&mut self) {
        self.obstruction = None;
        self.halt = false;
        self.contacts = 0;
    }

    fn should_halt(&self) -> bool {
        self.halt
    }

    fn first_static_obstruction(&self) -> Option<Obstruction> {
        self.obstruction.clone()
    }
}

/// Signal for free-space motion that never halts
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverHalt;

impl CollisionSignal for NeverHalt {
    fn reset(&mut self) {}

    fn should_halt(&self) -> bool {
        false
    }

    fn first_static_obstruction(&self) -> Option<Obstruction> {
        None
    }
}
