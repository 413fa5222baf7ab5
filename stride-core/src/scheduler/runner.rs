//! Cooperative and batch execution

use crate::motion::MotionError;
use crate::traits::{CollisionSignal, PhysicsWorld};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of stepping a motion by one tick
#[derive(Debug, Clone, PartialEq)]
pub enum Progress<T> {
    /// Suspended at a tick boundary; step again after the host advances
    Pending,
    /// Finished with a result
    Done(T),
}

impl<T> Progress<T> {
    /// Check whether the motion finished
    pub fn is_done(&self) -> bool {
        matches!(self, Progress::Done(_))
    }

    /// Take the result, if finished
    pub fn done(self) -> Option<T> {
        match self {
            Progress::Done(value) => Some(value),
            Progress::Pending => None,
        }
    }
}

/// A motion that advances one tick per call
///
/// `B` is the driven property or body and `S` the collision signal. The
/// motion holds no borrow of either between ticks, so the host is free to
/// advance physics on the same objects.
pub trait Motion<B: ?Sized, S: CollisionSignal + ?Sized> {
    /// Result produced when the motion finishes
    type Output;

    /// Run one tick
    fn step(&mut self, body: &mut B, signal: &S) -> Progress<Self::Output>;
}

/// A host that owns one driven channel plus its collision signal
pub trait MotionHost: PhysicsWorld {
    /// Driven property or body
    type Body: ?Sized;
    /// Collision signal observing the body
    type Signal: CollisionSignal + ?Sized;

    /// Borrow the body and signal together for one tick
    fn split(&mut self) -> (&mut Self::Body, &mut Self::Signal);
}

/// How motions are scheduled against the host clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TickMode {
    /// Suspend once per tick; the host renders or reports between ticks
    #[default]
    Stepped,
    /// Resolve every tick synchronously inside one call
    Batch,
}

/// Run a motion to completion, advancing the host by one tick between steps
///
/// # Arguments
/// - `host`: World owning the driven channel
/// - `motion`: Motion to run
/// - `tick_duration`: Fixed physics step passed to the host (0 for teleports)
/// - `max_ticks`: Tick budget before giving up
///
/// # Returns
/// The motion's output, or `TickBudgetExhausted` if it did not finish
pub fn run_batch<H, M>(
    host: &mut H,
    motion: &mut M,
    tick_duration: f32,
    max_ticks: u32,
) -> Result<M::Output, MotionError>
where
    H: MotionHost,
    M: Motion<H::Body, H::Signal>,
{
    for tick in 0..max_ticks {
        let (body, signal) = host.split();
        if let Progress::Done(output) = motion.step(body, signal) {
            trace!("batch motion finished after {} ticks", tick + 1);
            return Ok(output);
        }
        host.advance(tick_duration);
    }

    warn!("batch motion exceeded {} ticks", max_ticks);
    Err(MotionError::TickBudgetExhausted)
}

/// Run a motion with a frame callback at every tick boundary
///
/// Same tick order as [`run_batch`], but `on_frame` sees the host after each
/// advance so it can render or report the intermediate state.
pub fn run_stepped<H, M, F>(
    host: &mut H,
    motion: &mut M,
    tick_duration: f32,
    max_ticks: u32,
    mut on_frame: F,
) -> Result<M::Output, MotionError>
where
    H: MotionHost,
    M: Motion<H::Body, H::Signal>,
    F: FnMut(&H, u32),
{
    for tick in 0..max_ticks {
        let (body, signal) = host.split();
        if let Progress::Done(output) = motion.step(body, signal) {
            return Ok(output);
        }
        host.advance(tick_duration);
        on_frame(host, tick + 1);
    }

    warn!("stepped motion exceeded {} ticks", max_ticks);
    Err(MotionError::TickBudgetExhausted)
}

/// Run a motion in the given mode
pub fn run<H, M, F>(
    mode: TickMode,
    host: &mut H,
    motion: &mut M,
    tick_duration: f32,
    max_ticks: u32,
    on_frame: F,
) -> Result<M::Output, MotionError>
where
    H: MotionHost,
    M: Motion<H::Body, H::Signal>,
    F: FnMut(&H, u32),
{
    match mode {
        TickMode::Stepped => run_stepped(host, motion, tick_duration, max_ticks, on_frame),
        TickMode::Batch => run_batch(host, motion, tick_duration, max_ticks),
    }
}
