//! The thin mapping from effect descriptions onto tokio primitives.
//!
//! This is deliberately not a scheduler. Tokio is the cooperative runtime;
//! the interpreter only translates each yielded [`Effect`] into the matching
//! tokio operation and resumes the saga with the outcome.

use crate::bus::{Occurrence, Subscription};
use crate::dispatch::DispatchBus;
use crate::error::SagaError;
use crate::saga::{Resume, Saga, Step};
use crate::Effect;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// Drives sagas: advance until the next effect, fulfill it, resume.
///
/// Cloning is cheap; clones share the dispatch bus.
#[derive(Clone)]
pub struct Interpreter {
    dispatch: Arc<dyn DispatchBus>,
}

impl Interpreter {
    pub fn new(dispatch: Arc<dyn DispatchBus>) -> Self {
        Interpreter { dispatch }
    }

    /// Run one saga to completion.
    ///
    /// [`Effect::Wait`] suspends on a tokio timer and resumes with
    /// [`Resume::Elapsed`]; [`Effect::Emit`] suspends until the dispatch bus
    /// accepts the message and resumes with [`Resume::Accepted`]. A rejected
    /// emit fails the run.
    pub async fn run<S: Saga>(&self, mut saga: S) -> Result<(), SagaError> {
        let mut resume = Resume::Start;
        loop {
            match saga.step(resume) {
                Step::Done => return Ok(()),
                Step::Yield(Effect::Wait(duration)) => {
                    tokio::time::sleep(duration).await;
                    resume = Resume::Elapsed;
                }
                Step::Yield(Effect::Emit(message)) => {
                    self.dispatch
                        .accept(message)
                        .await
                        .map_err(SagaError::EmitRejected)?;
                    resume = Resume::Accepted;
                }
            }
        }
    }

    /// Watcher loop: for every occurrence on `subscription`, start a fresh
    /// saga from `factory` on its own task, without waiting for it.
    ///
    /// Fire-and-forget with unbounded concurrency: occurrences arriving
    /// faster than instances finish simply accumulate in-flight instances.
    /// No deduplication, no back-pressure. A failed instance is logged and
    /// does not affect the loop or sibling instances.
    ///
    /// Never returns while the bus behind the subscription is alive.
    pub async fn take_every<S, F>(&self, mut subscription: Subscription, factory: F)
    where
        S: Saga + 'static,
        F: Fn(Occurrence) -> S + Send,
    {
        while let Some(occurrence) = subscription.next().await {
            let instance = Uuid::new_v4();
            debug!(%instance, kind = %occurrence.kind, "starting saga instance");
            let saga = factory(occurrence);
            let interpreter = self.clone();
            tokio::spawn(async move {
                if let Err(err) = interpreter.run(saga).await {
                    error!(%instance, %err, "saga instance failed");
                }
            });
        }
        debug!(kind = %subscription.kind(), "bus torn down, watcher settling");
    }
}
