//! Per-channel motion hosts
//!
//! Each host borrows the world for one motion and hands the controller the
//! channel's body together with that channel's monitor. Advancing any host
//! advances the whole world.

use stride_core::collision::ObstructionMonitor;
use stride_core::scheduler::MotionHost;
use stride_core::traits::PhysicsWorld;
use stride_drivers::body::DampedBody;
use stride_drivers::kinematic::{Orientation, PivotFrame, ReachSolver, Translation};

use crate::world::{Channel, SimWorld};

macro_rules! channel_host {
    ($(#[$meta:meta])* $name:ident, $body:ty, $channel:expr, |$world:ident| $borrow:expr) => {
        $(#[$meta])*
        pub struct $name<'w>(pub &'w mut SimWorld);

        impl PhysicsWorld for $name<'_> {
            fn advance(&mut self, dt: f32) {
                self.0.advance(dt);
            }
        }

        impl MotionHost for $name<'_> {
            type Body = $body;
            type Signal = ObstructionMonitor;

            fn split(&mut self) -> (&mut $body, &mut ObstructionMonitor) {
                let $world = &mut *self.0;
                ($borrow, &mut $world.monitors[$channel as usize])
            }
        }
    };
}

channel_host!(
    /// Agent walking axis
    WalkHost, DampedBody, Channel::Agent, |w| w.agent.linear_mut()
);

channel_host!(
    /// Agent turning axis
    TurnHost, DampedBody, Channel::Agent, |w| w.agent.angular_mut()
);

channel_host!(
    /// Kinematic object position
    ObjectTranslationHost, Translation, Channel::Object, |w| &mut w.object.translation
);

channel_host!(
    /// Kinematic object orientation
    ObjectOrientationHost, Orientation, Channel::Object, |w| &mut w.object.orientation
);

channel_host!(
    /// Arm hand target
    HandHost, ReachSolver, Channel::Hand, |w| &mut w.hand
);

channel_host!(
    /// Wrist frame swinging about its pivot
    WristHost, PivotFrame, Channel::Wrist, |w| &mut w.wrist
);

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use stride_core::config::MotionConfig;
    use stride_core::motion::{IncrementalMover, Linear, MotionRequest};
    use stride_core::scheduler::run_batch;

    #[test]
    fn test_split_borrows_channel_body() {
        let mut world = SimWorld::new(&MotionConfig::default());
        let mut host = ObjectTranslationHost(&mut world);
        let (body, _) = host.split();
        body.0 = Vector3::new(0.0, 2.0, 0.0);
        assert_eq!(world.object.position(), Vector3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_batch_through_host_advances_world() {
        let mut world = SimWorld::new(&MotionConfig::default());
        let target = Vector3::new(1.0, 0.5, 0.5);
        let mut host = ObjectTranslationHost(&mut world);

        let (body, signal) = host.split();
        let request = MotionRequest::new(target, 0.5, 0.02);
        let mut mover = IncrementalMover::start(Linear, request, &*body, signal).unwrap();
        let outcome = run_batch(&mut host, &mut mover, 0.02, 1_000).unwrap();

        assert!(outcome.success());
        assert_eq!(world.object.position(), target);
        assert_eq!(world.steps(), u64::from(outcome.ticks) - 1);
    }
}
