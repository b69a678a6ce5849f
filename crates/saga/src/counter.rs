//! The counter tutorial: one worker, one watcher, a greeting, and the root
//! composition running them side by side.

use crate::bus::EventBus;
use crate::error::SagaError;
use crate::interpreter::Interpreter;
use crate::saga::{Resume, Saga, Step};
use crate::{Effect, Message};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Message kind emitted by each worker instance.
pub const INCREMENT: &str = "INCREMENT";
/// Occurrence kind the watcher subscribes to.
pub const INCREMENT_SYNC: &str = "INCREMENT_SYNC";
/// How long each worker waits before emitting.
pub const INCREMENT_DELAY: Duration = Duration::from_millis(1000);

/// Worker saga: wait one second, then emit a single `INCREMENT` message.
///
/// The observable effect sequence of every instance is exactly
/// `[Wait(1000ms), Emit(INCREMENT)]`, in that order. Instances share no
/// state and complete independently of one another.
#[derive(Debug, Default)]
pub struct IncrementWorker {
    state: WorkerState,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    #[default]
    Start,
    AwaitingWait,
    AwaitingEmit,
    Done,
}

impl IncrementWorker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Saga for IncrementWorker {
    fn step(&mut self, _resume: Resume) -> Step {
        match self.state {
            WorkerState::Start => {
                self.state = WorkerState::AwaitingWait;
                Step::Yield(Effect::Wait(INCREMENT_DELAY))
            }
            WorkerState::AwaitingWait => {
                self.state = WorkerState::AwaitingEmit;
                Step::Yield(Effect::Emit(Message::of_kind(INCREMENT)))
            }
            WorkerState::AwaitingEmit | WorkerState::Done => {
                self.state = WorkerState::Done;
                Step::Done
            }
        }
    }
}

/// Where the greeting saga writes its one line.
pub trait DiagnosticSink: Send + Sync {
    fn line(&self, text: &str);
}

/// Default sink: lines go to the tracing pipeline.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn line(&self, text: &str) {
        info!("{text}");
    }
}

/// Greeting saga: one side effect, then done.
///
/// Exists to show the root composition running heterogeneous sagas side by
/// side. The sink is injected so the side effect stays observable in tests.
pub struct HelloSaga {
    sink: Arc<dyn DiagnosticSink>,
    greeted: bool,
}

impl HelloSaga {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        HelloSaga {
            sink,
            greeted: false,
        }
    }
}

impl Saga for HelloSaga {
    fn step(&mut self, _resume: Resume) -> Step {
        if !self.greeted {
            self.greeted = true;
            self.sink.line("hello sagas!");
        }
        Step::Done
    }
}

/// Root composition: the single entry point handed to the runtime.
///
/// Runs the greeting saga and the take-every watcher as siblings under one
/// join and settles only when both settle. The watcher outlives any finite
/// occurrence stream, so the root settles only once the bus is torn down.
pub async fn run_root(
    interpreter: Interpreter,
    bus: EventBus,
    sink: Arc<dyn DiagnosticSink>,
) -> Result<(), SagaError> {
    let subscription = bus.subscribe(INCREMENT_SYNC);
    // The root only listens; holding a sender would keep the bus open.
    drop(bus);

    let (greeting, ()) = futures::future::join(
        interpreter.run(HelloSaga::new(sink)),
        interpreter.take_every(subscription, |_| IncrementWorker::new()),
    )
    .await;
    greeting
}
