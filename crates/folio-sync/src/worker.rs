//! # Sync Worker
//!
//! Drains the outbox and applies each message to the server cart.
//!
//! ## Worker Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SyncWorker Flow                                   │
//! │                                                                         │
//! │  loop {                                                                 │
//! │    select! {                                                            │
//! │      msg = outbox.recv()  ──► remote.apply(op)                          │
//! │                                 ├─ Ok  ► applied += 1                   │
//! │                                 └─ Err ► failed += 1, warn! (no retry)  │
//! │                                                                         │
//! │      None (outboxes gone) ──► stop                                      │
//! │                                                                         │
//! │      shutdown signal      ──► close outbox                              │
//! │                               apply what is already queued              │
//! │                               stop                                      │
//! │    }                                                                    │
//! │  }                                                                      │
//! │                                                                         │
//! │  One message at a time, in queue order. The store never sees results.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::outbox::OutboxReceiver;
use crate::protocol::SyncMessage;
use crate::remote::RemoteCart;

// =============================================================================
// Stats
// =============================================================================

/// Counters for messages the worker has processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub applied: u64,
    pub failed: u64,
    /// Subset of `failed` caused by a missing or rejected token.
    pub auth_failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    applied: AtomicU64,
    failed: AtomicU64,
    auth_failures: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> SyncStats {
        SyncStats {
            applied: self.applied.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            auth_failures: self.auth_failures.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// Sync Worker
// =============================================================================

pub struct SyncWorker {
    remote: Arc<dyn RemoteCart>,
    receiver: OutboxReceiver,
    shutdown_rx: mpsc::Receiver<()>,
    counters: Arc<Counters>,
}

/// Handle for controlling a running [`SyncWorker`].
#[derive(Debug, Clone)]
pub struct SyncWorkerHandle {
    shutdown_tx: mpsc::Sender<()>,
    counters: Arc<Counters>,
}

impl SyncWorkerHandle {
    /// Asks the worker to finish queued messages and stop.
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SyncError::ChannelError("Shutdown channel closed".into()))
    }

    pub fn stats(&self) -> SyncStats {
        self.counters.snapshot()
    }
}

impl SyncWorker {
    pub fn new(remote: Arc<dyn RemoteCart>, receiver: OutboxReceiver) -> (Self, SyncWorkerHandle) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let counters = Arc::new(Counters::default());

        let worker = SyncWorker {
            remote,
            receiver,
            shutdown_rx,
            counters: counters.clone(),
        };

        (worker, SyncWorkerHandle { shutdown_tx, counters })
    }

    /// Creates the worker and runs it on a tokio task.
    pub fn spawn(
        remote: Arc<dyn RemoteCart>,
        receiver: OutboxReceiver,
    ) -> (SyncWorkerHandle, JoinHandle<()>) {
        let (worker, handle) = SyncWorker::new(remote, receiver);
        (handle, tokio::spawn(worker.run()))
    }

    /// Runs until shutdown or until every outbox is dropped.
    pub async fn run(mut self) {
        info!("Sync worker starting");

        loop {
            tokio::select! {
                message = self.receiver.recv() => {
                    match message {
                        Some(message) => self.apply(message).await,
                        None => {
                            debug!("All outboxes dropped");
                            break;
                        }
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Sync worker shutting down");
                    self.flush().await;
                    break;
                }
            }
        }

        let stats = self.counters.snapshot();
        info!(
            applied = stats.applied,
            failed = stats.failed,
            "Sync worker stopped"
        );
    }

    /// Applies whatever was queued before shutdown, then stops reading.
    async fn flush(&mut self) {
        self.receiver.close();
        let mut flushed = 0usize;
        while let Some(message) = self.receiver.recv().await {
            self.apply(message).await;
            flushed += 1;
        }
        if flushed > 0 {
            debug!(flushed, "Flushed queued sync messages");
        }
    }

    async fn apply(&self, message: SyncMessage) {
        let op = message.op.kind();
        let book_id = message.op.book_id().clone();

        match self.remote.apply(&message.op).await {
            Ok(()) => {
                self.counters.applied.fetch_add(1, Ordering::Relaxed);
                debug!(message_id = %message.id, op, book_id = %book_id, "Synced cart change");
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                if e.is_auth_error() {
                    self.counters.auth_failures.fetch_add(1, Ordering::Relaxed);
                }
                warn!(
                    message_id = %message.id,
                    op,
                    book_id = %book_id,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Cart sync failed, local cart kept"
                );
            }
        }
    }
}
