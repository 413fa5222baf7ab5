//! Joint state machine definition

use crate::traits::Direction;

/// Joint motion states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JointState {
    /// No request in flight
    #[default]
    Idle,
    /// Driving in one direction
    Moving(Direction),
}

/// Why a joint returned to idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopReason {
    /// Position samples settled
    Converged,
    /// Requested distance covered
    DistanceReached,
    /// Simulated-time limit hit
    TimedOut,
    /// Caller aborted the request
    Aborted,
}

impl StopReason {
    /// Get a short label for logs
    pub fn label(self) -> &'static str {
        match self {
            StopReason::Converged => "converged",
            StopReason::DistanceReached => "distance reached",
            StopReason::TimedOut => "timed out",
            StopReason::Aborted => "aborted",
        }
    }
}

/// Events that can trigger joint transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JointEvent {
    /// A request was accepted
    Start(Direction),
    /// Ring buffer lapped with stable samples
    Converged,
    /// Distance moved met the request
    DistanceReached,
    /// Elapsed time met the limit
    TimedOut,
    /// Caller abort
    Abort,
}

impl JointEvent {
    /// Get the stop reason carried by a terminating event
    pub fn stop_reason(self) -> Option<StopReason> {
        match self {
            JointEvent::Start(_) => None,
            JointEvent::Converged => Some(StopReason::Converged),
            JointEvent::DistanceReached => Some(StopReason::DistanceReached),
            JointEvent::TimedOut => Some(StopReason::TimedOut),
            JointEvent::Abort => Some(StopReason::Aborted),
        }
    }
}

impl JointState {
    /// Check whether a request is in flight
    pub fn is_moving(&self) -> bool {
        matches!(self, JointState::Moving(_))
    }

    /// Get the direction of travel, if moving
    pub fn direction(&self) -> Option<Direction> {
        match self {
            JointState::Moving(direction) => Some(*direction),
            JointState::Idle => None,
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: JointEvent) -> Self {
        use JointEvent::*;
        use JointState::*;

        match (self, event) {
            (Idle, Start(direction)) => Moving(direction),

            (Moving(_), Converged) => Idle,
            (Moving(_), DistanceReached) => Idle,
            (Moving(_), TimedOut) => Idle,
            (Moving(_), Abort) => Idle,

            // A second start while moving is refused by the controller
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_to_moving() {
        let next = JointState::Idle.transition(JointEvent::Start(Direction::Negative));
        assert_eq!(next, JointState::Moving(Direction::Negative));
        assert_eq!(next.direction(), Some(Direction::Negative));
    }

    #[test]
    fn test_every_stop_returns_to_idle() {
        let stops = [
            JointEvent::Converged,
            JointEvent::DistanceReached,
            JointEvent::TimedOut,
            JointEvent::Abort,
        ];

        for event in stops {
            let next = JointState::Moving(Direction::Positive).transition(event);
            assert_eq!(next, JointState::Idle);
            assert!(event.stop_reason().is_some());
        }
    }

    #[test]
    fn test_start_while_moving_keeps_direction() {
        let state = JointState::Moving(Direction::Positive);
        let next = state.transition(JointEvent::Start(Direction::Negative));
        assert_eq!(next, state);
    }

    #[test]
    fn test_stop_events_ignored_when_idle() {
        assert_eq!(JointState::Idle.transition(JointEvent::TimedOut), JointState::Idle);
        assert!(!JointState::Idle.is_moving());
    }
}
