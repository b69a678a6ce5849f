//! Occurrence side: an in-memory broadcast bus of named events.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

const DEFAULT_CAPACITY: usize = 256;

/// One instance of a named event kind, as observed by a watcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Kind label, e.g. `"INCREMENT_SYNC"`.
    pub kind: String,
}

impl Occurrence {
    /// An occurrence of the given kind.
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Occurrence { kind: kind.into() }
    }
}

/// Broadcast bus for occurrences.
///
/// At-most-once, in-memory only: slow subscribers may lag and miss
/// occurrences, and nothing is persisted or replayed. Cloning the bus clones
/// the sending side; the bus is torn down once every clone is dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Occurrence>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        EventBus { tx }
    }

    /// Emit one occurrence. Returns how many subscribers will see it.
    pub fn emit(&self, occurrence: Occurrence) -> usize {
        self.tx.send(occurrence).unwrap_or(0)
    }

    /// Subscribe to every future occurrence of one event kind.
    ///
    /// Subscriptions only see occurrences emitted after they are created, so
    /// create the subscription before handing it to a watcher.
    pub fn subscribe(&self, kind: impl Into<String>) -> Subscription {
        Subscription {
            kind: kind.into(),
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A single-kind view of the bus, handed to a watcher at construction.
pub struct Subscription {
    kind: String,
    rx: broadcast::Receiver<Occurrence>,
}

impl Subscription {
    /// The event kind this subscription filters to.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The next occurrence of the subscribed kind, or `None` once the bus has
    /// been torn down.
    ///
    /// Occurrences of other kinds are skipped. Lag is logged and skipped:
    /// dropped occurrences are gone, matching the bus's at-most-once
    /// guarantee.
    pub async fn next(&mut self) -> Option<Occurrence> {
        loop {
            match self.rx.recv().await {
                Ok(occurrence) if occurrence.kind == self.kind => return Some(occurrence),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(kind = %self.kind, skipped, "subscription lagged, occurrences dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
