//! # Outbox
//!
//! In-memory queue of best-effort messages for the server cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Outbox Flow                                    │
//! │                                                                         │
//! │  CartStore ──enqueue()──► [ msg | msg | msg ] ──recv()──► SyncWorker    │
//! │   (sync)                   unbounded mpsc              (async task)     │
//! │                                                                         │
//! │  • enqueue never blocks and never fails                                 │
//! │  • receiver gone → message dropped with a debug log                     │
//! │  • Outbox::disabled() → everything dropped (offline mode)               │
//! │  • nothing is persisted; a closed session loses pending messages        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::protocol::{CartOp, SyncMessage};

/// Sending half, owned by the [`crate::CartStore`].
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: Option<mpsc::UnboundedSender<SyncMessage>>,
}

/// Receiving half, owned by the [`crate::SyncWorker`] (or a test).
#[derive(Debug)]
pub struct OutboxReceiver {
    rx: mpsc::UnboundedReceiver<SyncMessage>,
}

impl Outbox {
    /// Creates a connected outbox/receiver pair.
    pub fn channel() -> (Outbox, OutboxReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Outbox { tx: Some(tx) }, OutboxReceiver { rx })
    }

    /// An outbox that drops everything. Used when sync is off.
    pub fn disabled() -> Self {
        Outbox { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Queues `op` for the server. Fire-and-forget.
    pub fn enqueue(&self, op: CartOp) {
        let Some(tx) = &self.tx else {
            trace!(op = op.kind(), "Outbox disabled, dropping op");
            return;
        };

        let message = SyncMessage::new(op);
        let id = message.id;
        if let Err(rejected) = tx.send(message) {
            debug!(
                message_id = %id,
                op = rejected.0.op.kind(),
                book_id = %rejected.0.op.book_id(),
                "Sync receiver gone, dropping message"
            );
        } else {
            trace!(message_id = %id, "Queued sync message");
        }
    }
}

impl Default for Outbox {
    fn default() -> Self {
        Outbox::disabled()
    }
}

impl OutboxReceiver {
    /// Waits for the next message. `None` once every [`Outbox`] is dropped.
    pub async fn recv(&mut self) -> Option<SyncMessage> {
        self.rx.recv().await
    }

    /// Takes everything queued right now without waiting.
    pub fn try_drain(&mut self) -> Vec<SyncMessage> {
        let mut drained = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            drained.push(message);
        }
        drained
    }

    /// Stops accepting new messages; already queued ones can still be read.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::BookId;

    fn delete(id: &str) -> CartOp {
        CartOp::Delete {
            book_id: BookId::new(id),
        }
    }

    #[test]
    fn test_enqueue_preserves_order() {
        let (outbox, mut rx) = Outbox::channel();
        outbox.enqueue(delete("a"));
        outbox.enqueue(delete("b"));

        let ids: Vec<_> = rx
            .try_drain()
            .into_iter()
            .map(|m| m.op.book_id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(rx.try_drain().is_empty());
    }

    #[test]
    fn test_disabled_outbox_drops() {
        let outbox = Outbox::disabled();
        assert!(!outbox.is_enabled());
        outbox.enqueue(delete("a"));
    }

    #[test]
    fn test_enqueue_after_receiver_dropped_does_not_panic() {
        let (outbox, rx) = Outbox::channel();
        assert!(outbox.is_enabled());
        drop(rx);
        assert!(!outbox.is_enabled());
        outbox.enqueue(delete("a"));
    }

    #[tokio::test]
    async fn test_recv_ends_when_senders_dropped() {
        let (outbox, mut rx) = Outbox::channel();
        outbox.enqueue(delete("a"));
        drop(outbox);

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }
}
