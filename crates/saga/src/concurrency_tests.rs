//! Behavior of the take-every loop and the root composition under
//! deterministic (paused) time.

use saga_core::counter::{run_root, IncrementWorker, INCREMENT, INCREMENT_SYNC};
use saga_core::{EventBus, Interpreter, Occurrence, SagaError};
use saga_testing::{DispatchProbe, RecordingSink, RejectingDispatch};
use std::sync::Arc;
use std::time::Duration;

/// Let every ready task run without advancing the clock.
async fn yield_to_tasks() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

fn watcher_fixture() -> (EventBus, Arc<DispatchProbe>, tokio::task::JoinHandle<()>) {
    let bus = EventBus::new();
    let probe = DispatchProbe::new();
    let interpreter = Interpreter::new(probe.clone());
    let subscription = bus.subscribe(INCREMENT_SYNC);
    let watcher = tokio::spawn(async move {
        interpreter
            .take_every(subscription, |_| IncrementWorker::new())
            .await
    });
    (bus, probe, watcher)
}

#[tokio::test(start_paused = true)]
async fn no_worker_emits_before_its_wait_elapses() {
    let (bus, probe, _watcher) = watcher_fixture();

    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    yield_to_tasks().await;
    assert!(probe.is_empty());

    tokio::time::advance(Duration::from_millis(999)).await;
    yield_to_tasks().await;
    assert!(probe.is_empty());

    tokio::time::advance(Duration::from_millis(1)).await;
    yield_to_tasks().await;
    assert_eq!(probe.kinds(), vec![INCREMENT.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn back_to_back_occurrences_run_concurrent_workers() {
    let (bus, probe, _watcher) = watcher_fixture();

    // Both arrive before either wait elapses.
    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    yield_to_tasks().await;

    tokio::time::advance(Duration::from_millis(999)).await;
    yield_to_tasks().await;
    assert!(probe.is_empty(), "both workers must still be pending");

    tokio::time::advance(Duration::from_millis(1)).await;
    yield_to_tasks().await;
    assert_eq!(probe.len(), 2);
    assert!(probe.kinds().iter().all(|kind| kind == INCREMENT));
}

#[tokio::test(start_paused = true)]
async fn each_occurrence_gets_its_own_worker_timer() {
    let (bus, probe, _watcher) = watcher_fixture();

    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    yield_to_tasks().await;
    tokio::time::advance(Duration::from_millis(300)).await;
    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    yield_to_tasks().await;

    // t = 1000: only the first worker's wait has elapsed.
    tokio::time::advance(Duration::from_millis(700)).await;
    yield_to_tasks().await;
    assert_eq!(probe.len(), 1);

    // t = 1300: the second worker's own 1000ms is up.
    tokio::time::advance(Duration::from_millis(300)).await;
    yield_to_tasks().await;
    assert_eq!(probe.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn watcher_stays_subscribed_after_a_finite_occurrence_stream() {
    let (bus, probe, watcher) = watcher_fixture();

    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    yield_to_tasks().await;
    tokio::time::advance(Duration::from_millis(1000)).await;
    yield_to_tasks().await;
    assert_eq!(probe.len(), 1);
    assert!(!watcher.is_finished());

    // A later occurrence still starts a fresh worker.
    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    yield_to_tasks().await;
    tokio::time::advance(Duration::from_millis(1000)).await;
    yield_to_tasks().await;
    assert_eq!(probe.len(), 2);
    assert!(!watcher.is_finished());
}

#[tokio::test(start_paused = true)]
async fn watcher_settles_once_the_bus_is_torn_down() {
    let (bus, _probe, watcher) = watcher_fixture();

    yield_to_tasks().await;
    assert!(!watcher.is_finished());

    drop(bus);
    yield_to_tasks().await;
    assert!(watcher.is_finished());
}

#[tokio::test(start_paused = true)]
async fn a_lagged_subscription_drops_occurrences_but_keeps_watching() {
    let bus = EventBus::with_capacity(4);
    let probe = DispatchProbe::new();
    let interpreter = Interpreter::new(probe.clone());
    let subscription = bus.subscribe(INCREMENT_SYNC);
    tokio::spawn(async move {
        interpreter
            .take_every(subscription, |_| IncrementWorker::new())
            .await
    });

    // Flood the ring before the watcher gets a chance to run.
    for _ in 0..8 {
        bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    }
    yield_to_tasks().await;
    tokio::time::advance(Duration::from_millis(1000)).await;
    yield_to_tasks().await;

    let after_flood = probe.len();
    assert!(after_flood < 8, "lag must have dropped occurrences");

    // The loop survives the lag.
    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    yield_to_tasks().await;
    tokio::time::advance(Duration::from_millis(1000)).await;
    yield_to_tasks().await;
    assert_eq!(probe.len(), after_flood + 1);
}

#[tokio::test(start_paused = true)]
async fn a_rejected_emit_fails_only_that_instance() {
    let bus = EventBus::new();
    let interpreter = Interpreter::new(Arc::new(RejectingDispatch));
    let subscription = bus.subscribe(INCREMENT_SYNC);
    let watcher = tokio::spawn(async move {
        interpreter
            .take_every(subscription, |_| IncrementWorker::new())
            .await
    });

    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    yield_to_tasks().await;
    tokio::time::advance(Duration::from_millis(1000)).await;
    yield_to_tasks().await;

    // The failed instance is logged and gone; the watcher keeps going.
    assert!(!watcher.is_finished());
    drop(bus);
    yield_to_tasks().await;
    assert!(watcher.is_finished());
}

#[tokio::test(start_paused = true)]
async fn a_rejected_emit_surfaces_as_emit_rejected() {
    let interpreter = Interpreter::new(Arc::new(RejectingDispatch));
    let err = interpreter.run(IncrementWorker::new()).await.unwrap_err();
    assert!(matches!(err, SagaError::EmitRejected(_)));
}

#[tokio::test(start_paused = true)]
async fn root_greets_once_even_with_zero_occurrences() {
    let bus = EventBus::new();
    let probe = DispatchProbe::new();
    let interpreter = Interpreter::new(probe.clone());
    let sink = RecordingSink::new();
    let root = tokio::spawn(run_root(interpreter, bus.clone(), sink.clone()));

    yield_to_tasks().await;
    assert_eq!(sink.lines(), vec!["hello sagas!"]);
    assert!(probe.is_empty());
    assert!(!root.is_finished());

    drop(bus);
    yield_to_tasks().await;
    assert!(root.is_finished());
    root.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn root_settles_only_when_the_bus_is_torn_down() {
    let bus = EventBus::new();
    let probe = DispatchProbe::new();
    let interpreter = Interpreter::new(probe.clone());
    let sink = RecordingSink::new();
    let root = tokio::spawn(run_root(interpreter, bus.clone(), sink.clone()));

    yield_to_tasks().await;
    bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
    yield_to_tasks().await;
    tokio::time::advance(Duration::from_millis(1000)).await;
    yield_to_tasks().await;
    assert_eq!(probe.kinds(), vec![INCREMENT.to_string()]);

    // The greeting finished long ago, but the watcher child keeps the root
    // pending.
    assert!(!root.is_finished());

    drop(bus);
    yield_to_tasks().await;
    assert!(root.is_finished());
    root.await.unwrap().unwrap();
}
