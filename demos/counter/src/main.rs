//! # Counter Demo
//!
//! The classic saga counter: every `INCREMENT_SYNC` occurrence starts a
//! worker that waits one second and emits one `INCREMENT` message. A toy
//! store folds the messages into a counter.

use anyhow::Result;
use saga_core::counter::{run_root, TracingSink, INCREMENT, INCREMENT_SYNC};
use saga_core::{ChannelDispatch, EventBus, Interpreter, Occurrence};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (dispatch, mut store_rx) = ChannelDispatch::pair();
    let interpreter = Interpreter::new(Arc::new(dispatch));
    let bus = EventBus::new();

    let root = tokio::spawn(run_root(
        interpreter.clone(),
        bus.clone(),
        Arc::new(TracingSink),
    ));

    // The "store": fold INCREMENT messages into a counter.
    let store = tokio::spawn(async move {
        let mut count = 0u64;
        while let Some(message) = store_rx.recv().await {
            if message.kind == INCREMENT {
                count += 1;
                println!("counter = {count}");
            }
        }
        count
    });

    for _ in 0..3 {
        bus.emit(Occurrence::of_kind(INCREMENT_SYNC));
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    // Give the last worker time to finish its one-second wait.
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // Tearing down the bus settles the watcher, and with it the root.
    drop(bus);
    root.await??;

    // Dropping the last dispatch handle lets the store drain and stop.
    drop(interpreter);
    let count = store.await?;
    println!("done, counter = {count}");

    Ok(())
}
