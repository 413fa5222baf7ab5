//! Generic incremental mover
//!
//! Drives one kinematic property toward a target one tick at a time:
//!
//! 1. Poll the collision signal; stop if it asks to halt
//! 2. Step toward the target, snapping onto it when the step covers the
//!    remaining offset, lands within epsilon or moves further away
//! 3. Finish after two consecutive ticks within epsilon
//!
//! On a static obstruction the property is rolled back either to its value
//! at request start or to its value just before the final tick.

use super::error::MotionError;
use super::outcome::{MotionOutcome, Termination};
use super::property::Property;
use super::request::MotionRequest;
use super::stepping::{Step, Stepping};
use crate::scheduler::{Motion, Progress};
use crate::traits::CollisionSignal;

/// Consecutive in-tolerance ticks required before declaring arrival
pub const SETTLE_TICKS: u8 = 2;

/// Tick-driven mover for one property
#[derive(Debug, Clone)]
pub struct IncrementalMover<M: Stepping> {
    /// Stepping strategy for the value type
    stepping: M,
    /// Request being executed
    request: MotionRequest<M::Value>,
    /// Per-tick advance
    step: Step,
    /// Value when the request started
    original: M::Value,
    /// Value recorded before the most recent tick
    previous: M::Value,
    /// Consecutive ticks within epsilon
    settled: u8,
    /// Ticks executed
    ticks: u32,
    /// Simulated seconds elapsed
    elapsed: f32,
    /// Cached result once finished
    outcome: Option<MotionOutcome<M::Value>>,
}

impl<M: Stepping> IncrementalMover<M> {
    /// Validate a request and prepare to drive `property`
    ///
    /// Resets the collision signal and snapshots the starting value. No
    /// tick runs until [`step`](Self::step) is called.
    pub fn start<P, S>(
        stepping: M,
        request: MotionRequest<M::Value>,
        property: &P,
        signal: &mut S,
    ) -> Result<Self, MotionError>
    where
        P: Property<Value = M::Value> + ?Sized,
        S: CollisionSignal + ?Sized,
    {
        request.validate()?;
        if !stepping.is_finite(&request.target) {
            return Err(MotionError::InvalidTarget);
        }

        signal.reset();
        let original = property.get();

        debug!(
            "mover start: rate {} /s, tick {} s, epsilon {}",
            request.rate_per_second,
            request.tick_duration,
            request.epsilon
        );

        Ok(Self {
            step: request.step(),
            stepping,
            request,
            original,
            previous: original,
            settled: 0,
            ticks: 0,
            elapsed: 0.0,
            outcome: None,
        })
    }

    /// Run one tick
    ///
    /// Returns `Pending` at each tick boundary; the host must advance its
    /// world once before the next call.
    pub fn step<P, S>(&mut self, property: &mut P, signal: &S) -> Progress<MotionOutcome<M::Value>>
    where
        P: Property<Value = M::Value> + ?Sized,
        S: CollisionSignal + ?Sized,
    {
        if let Some(outcome) = &self.outcome {
            return Progress::Done(outcome.clone());
        }

        if signal.should_halt() {
            return Progress::Done(self.finish(property, signal, Termination::Halted));
        }

        if let Some(limit) = self.request.max_elapsed_time {
            if self.elapsed >= limit {
                let elapsed = self.elapsed;
                return Progress::Done(self.finish(property, signal, Termination::TimedOut { elapsed }));
            }
        }

        let target = self.request.target;
        let current = property.get();
        self.previous = current;

        let direction = self.stepping.direction_of(&target, &current);
        let next = self.stepping.advance(&current, &direction, self.step);
        let next_distance = self.stepping.distance_of(&target, &next);

        if self.stepping.reaches(&direction, self.step)
            || next_distance <= self.request.epsilon
            || next_distance > self.stepping.distance_of(&target, &current)
        {
            property.set(target);
        } else {
            property.set(next);
        }

        self.ticks += 1;
        self.elapsed += self.request.tick_duration;

        if self.stepping.distance_of(&target, &property.get()) <= self.request.epsilon {
            self.settled = self.settled.saturating_add(1);
        } else {
            self.settled = 0;
        }

        // A teleport has no noisy approach to debounce
        if self.step == Step::Teleport || self.settled >= SETTLE_TICKS {
            return Progress::Done(self.finish(property, signal, Termination::Reached));
        }

        Progress::Pending
    }

    /// Get the value recorded when the request started
    pub fn original_value(&self) -> M::Value {
        self.original
    }

    /// Get the request being executed
    pub fn request(&self) -> &MotionRequest<M::Value> {
        &self.request
    }

    /// Get the number of ticks executed so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Check whether the mover has finished
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    fn finish<P, S>(
        &mut self,
        property: &mut P,
        signal: &S,
        termination: Termination,
    ) -> MotionOutcome<M::Value>
    where
        P: Property<Value = M::Value> + ?Sized,
        S: CollisionSignal + ?Sized,
    {
        let termination = match signal.first_static_obstruction() {
            Some(obstruction) => {
                let reset = if self.request.return_to_origin_on_failure {
                    self.original
                } else {
                    self.previous
                };
                property.set(reset);
                warn!(
                    "mover halted by '{}' after {} ticks",
                    obstruction.name.as_str(),
                    self.ticks
                );
                Termination::Collision(obstruction)
            }
            None => termination,
        };

        if let Termination::TimedOut { elapsed } = termination {
            warn!("mover timed out after {} s", elapsed);
        }

        let outcome = MotionOutcome {
            termination,
            final_value: property.get(),
            ticks: self.ticks,
            elapsed: self.elapsed,
        };
        debug!("mover finished: {}", outcome.termination.label());

        self.outcome = Some(outcome.clone());
        outcome
    }
}

impl<M, P, S> Motion<P, S> for IncrementalMover<M>
where
    M: Stepping,
    P: Property<Value = M::Value> + ?Sized,
    S: CollisionSignal + ?Sized,
{
    type Output = MotionOutcome<M::Value>;

    fn step(&mut self, body: &mut P, signal: &S) -> Progress<Self::Output> {
        IncrementalMover::step(self, body, signal)
    }
}
