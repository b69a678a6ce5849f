//! The suspension model: routines as explicit state machines.

use crate::Effect;

/// What the interpreter hands a saga when advancing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// First advance of a freshly constructed saga.
    Start,
    /// The previously yielded [`Effect::Wait`] has elapsed.
    Elapsed,
    /// The previously yielded [`Effect::Emit`] was accepted by the dispatch
    /// bus.
    Accepted,
}

/// What a saga hands back when advanced.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Suspend on this effect. The interpreter resumes the saga once the
    /// effect is fulfilled.
    Yield(Effect),
    /// The saga has run to completion.
    Done,
}

/// A suspendable routine.
///
/// A saga is a sequence of segments separated by suspension points. Each call
/// to [`step`](Saga::step) runs one segment to completion without preemption
/// and either yields the next effect or reports completion. Suspension
/// happens exactly at `Yield` boundaries; the saga holds no locks and does no
/// IO across them.
///
/// Implementations must be idempotent past completion: stepping a finished
/// saga returns [`Step::Done`] again.
pub trait Saga: Send {
    /// Advance to the next suspension point.
    fn step(&mut self, resume: Resume) -> Step;
}
