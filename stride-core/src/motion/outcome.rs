//! Shared motion outcome model
//!
//! Every movement action ends in exactly one [`Termination`]. Collision
//! failures, timeouts and successful arrival are never conflated.

use core::fmt::{self, Write};

use heapless::String;

use crate::traits::Obstruction;

/// Maximum outcome message length in bytes
pub const MAX_MESSAGE_LEN: usize = 96;

/// Outcome message text
pub type Message = String<MAX_MESSAGE_LEN>;

/// Why a motion stopped
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Termination {
    /// Target reached within epsilon, or commanded distance met
    Reached,
    /// Recent samples were statistically stable
    Converged,
    /// The collision signal halted motion without a static obstruction
    Halted,
    /// Simulated time limit exceeded; the current value is kept
    TimedOut {
        /// Elapsed simulated time in seconds
        elapsed: f32,
    },
    /// A static obstruction halted motion; the value was rolled back
    Collision(Obstruction),
}

impl Termination {
    /// Check whether this termination counts as success
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Termination::Reached | Termination::Converged | Termination::Halted
        )
    }

    /// Get a short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Termination::Reached => "reached",
            Termination::Converged => "converged",
            Termination::Halted => "halted",
            Termination::TimedOut { .. } => "timed out",
            Termination::Collision(_) => "collision",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Reached => f.write_str("Target reached"),
            Termination::Converged => f.write_str("Motion converged"),
            Termination::Halted => f.write_str("Motion halted"),
            Termination::TimedOut { elapsed } => {
                write!(f, "Motion timed out after {:.2} s", elapsed)
            }
            Termination::Collision(ob) if ob.is_known_entity => {
                write!(f, "Collided with static/kinematic object: '{}'", ob.name)
            }
            Termination::Collision(ob) => {
                write!(f, "Collided with static structure in scene: '{}'", ob.name)
            }
        }
    }
}

/// Receiver of finished-motion notifications from action dispatch
pub trait MotionListener {
    /// Called once when a motion finishes
    fn on_motion_finished(&mut self, success: bool, message: &str);
}

/// Final result of one motion request
#[derive(Debug, Clone, PartialEq)]
pub struct MotionOutcome<V> {
    /// Why the motion stopped
    pub termination: Termination,
    /// Property value (or distance moved) after any rollback
    pub final_value: V,
    /// Ticks executed
    pub ticks: u32,
    /// Simulated seconds elapsed
    pub elapsed: f32,
}

impl<V> MotionOutcome<V> {
    /// Check whether the motion succeeded
    pub fn success(&self) -> bool {
        self.termination.is_success()
    }

    /// Get the failure message (empty on success)
    pub fn message(&self) -> Message {
        let mut message = Message::new();
        if !self.success() {
            // Names are bounded, so the text always fits
            let _ = write!(message, "{}", self.termination);
        }
        message
    }

    /// Report this outcome to a listener
    pub fn notify<L: MotionListener + ?Sized>(&self, listener: &mut L) {
        listener.on_motion_finished(self.success(), self.message().as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        calls: u32,
        success: bool,
        message: Message,
    }

    impl MotionListener for Recorder {
        fn on_motion_finished(&mut self, success: bool, message: &str) {
            self.calls += 1;
            self.success = success;
            self.message = Message::try_from(message).unwrap();
        }
    }

    fn outcome(termination: Termination) -> MotionOutcome<f32> {
        MotionOutcome {
            termination,
            final_value: 0.0,
            ticks: 3,
            elapsed: 0.06,
        }
    }

    #[test]
    fn test_success_classes() {
        assert!(Termination::Reached.is_success());
        assert!(Termination::Converged.is_success());
        assert!(Termination::Halted.is_success());
        assert!(!Termination::TimedOut { elapsed: 1.0 }.is_success());
        assert!(!Termination::Collision(Obstruction::new("Wall", false)).is_success());
    }

    #[test]
    fn test_success_has_empty_message() {
        assert!(outcome(Termination::Reached).message().is_empty());
    }

    #[test]
    fn test_collision_messages_distinguish_entities() {
        let known = outcome(Termination::Collision(Obstruction::new("Chair_1", true)));
        assert_eq!(
            known.message().as_str(),
            "Collided with static/kinematic object: 'Chair_1'"
        );

        let structure = outcome(Termination::Collision(Obstruction::new("Wall_2", false)));
        assert_eq!(
            structure.message().as_str(),
            "Collided with static structure in scene: 'Wall_2'"
        );
    }

    #[test]
    fn test_timeout_message() {
        let o = outcome(Termination::TimedOut { elapsed: 0.5 });
        assert_eq!(o.message().as_str(), "Motion timed out after 0.50 s");
    }

    #[test]
    fn test_longest_collision_message_fits() {
        let name = "nnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnnn";
        let o = outcome(Termination::Collision(Obstruction::new(name, false)));
        assert!(o.message().ends_with("'"));
        assert!(o.message().len() <= MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_notify_listener() {
        let mut recorder = Recorder {
            calls: 0,
            success: true,
            message: Message::new(),
        };
        outcome(Termination::TimedOut { elapsed: 2.0 }).notify(&mut recorder);

        assert_eq!(recorder.calls, 1);
        assert!(!recorder.success);
        assert_eq!(recorder.message.as_str(), "Motion timed out after 2.00 s");
    }
}
