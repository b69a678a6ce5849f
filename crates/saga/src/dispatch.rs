//! Message side: the external dispatch bus that `Emit` hands messages to.

use crate::Message;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Where emitted messages go.
///
/// This crate only consumes the bus. The store behind it (a reducer, a
/// counter, a log) belongs to the application.
#[async_trait]
pub trait DispatchBus: Send + Sync {
    /// Accept one message. An error here fails the emitting saga instance.
    async fn accept(&self, message: Message) -> Result<()>;
}

/// Channel-backed bus: accepted messages land on an unbounded mpsc receiver.
pub struct ChannelDispatch {
    tx: mpsc::UnboundedSender<Message>,
}

impl ChannelDispatch {
    /// Create the bus plus the receiving end the store reads from.
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelDispatch { tx }, rx)
    }
}

#[async_trait]
impl DispatchBus for ChannelDispatch {
    async fn accept(&self, message: Message) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|err| anyhow::anyhow!("dispatch receiver dropped, rejecting {}", err.0.kind))
    }
}

/// Accepts and drops every message. For wiring where nobody reads.
pub struct NullDispatch;

#[async_trait]
impl DispatchBus for NullDispatch {
    async fn accept(&self, _message: Message) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_dispatch_delivers_to_the_receiver() {
        let (bus, mut rx) = ChannelDispatch::pair();
        bus.accept(Message::of_kind("INCREMENT")).await.unwrap();
        assert_eq!(rx.recv().await, Some(Message::of_kind("INCREMENT")));
    }

    #[tokio::test]
    async fn channel_dispatch_rejects_after_receiver_drops() {
        let (bus, rx) = ChannelDispatch::pair();
        drop(rx);
        assert!(bus.accept(Message::of_kind("INCREMENT")).await.is_err());
    }
}
