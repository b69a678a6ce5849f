//! Testing utilities for the saga-core crate.
//!
//! Probes for the two seams a saga touches (the dispatch bus and the
//! diagnostic sink) plus a synchronous driver for asserting on effect
//! sequences without a runtime.

use anyhow::Result;
use async_trait::async_trait;
use saga_core::counter::DiagnosticSink;
use saga_core::{DispatchBus, Effect, Message, Resume, Saga, Step};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Step a saga to completion with all-success resumes, recording every
/// yielded effect.
///
/// No effect is actually fulfilled: a `Wait` resumes immediately with
/// [`Resume::Elapsed`] and an `Emit` with [`Resume::Accepted`]. This makes
/// the observable effect sequence of a saga a plain value to assert on.
pub fn record_effects<S: Saga>(saga: &mut S) -> Vec<Effect> {
    let mut effects = Vec::new();
    let mut resume = Resume::Start;
    loop {
        match saga.step(resume) {
            Step::Done => return effects,
            Step::Yield(effect) => {
                resume = match effect {
                    Effect::Wait(_) => Resume::Elapsed,
                    Effect::Emit(_) => Resume::Accepted,
                };
                effects.push(effect);
            }
        }
    }
}

/// Dispatch bus that records every accepted message.
#[derive(Default)]
pub struct DispatchProbe {
    messages: Mutex<Vec<Message>>,
    notify: Notify,
}

impl DispatchProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything accepted so far, in acceptance order.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    /// Kinds of everything accepted so far, in acceptance order.
    pub fn kinds(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|message| message.kind.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait until at least `count` messages have been accepted.
    pub async fn await_count(&self, count: usize) {
        loop {
            let notified = self.notify.notified();
            if self.len() >= count {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl DispatchBus for DispatchProbe {
    async fn accept(&self, message: Message) -> Result<()> {
        self.messages.lock().unwrap().push(message);
        self.notify.notify_waiters();
        Ok(())
    }
}

/// Dispatch bus that rejects every message, for exercising the failure path.
pub struct RejectingDispatch;

#[async_trait]
impl DispatchBus for RejectingDispatch {
    async fn accept(&self, message: Message) -> Result<()> {
        anyhow::bail!("rejecting {}", message.kind)
    }
}

/// Diagnostic sink that records every line.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn line(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}
