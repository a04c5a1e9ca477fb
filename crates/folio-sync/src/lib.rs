//! # folio-sync: Cart Store and Server Sync
//!
//! Keeps the shopper's cart responsive by applying every change locally
//! first and mirroring it to the server-side cart in the background.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Sync Architecture                           │
//! │                                                                         │
//! │   user action                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────┐  mutate   ┌──────────────────┐                    │
//! │  │    CartStore     │──────────►│ folio_core::Cart │  (visible at once) │
//! │  └────────┬─────────┘           └──────────────────┘                    │
//! │           │ enqueue (sync, never blocks)                                │
//! │           ▼                                                             │
//! │  ┌──────────────────┐           ┌──────────────────┐                    │
//! │  │      Outbox      │──────────►│    SyncWorker    │  (tokio task)      │
//! │  │ (unbounded mpsc) │   recv    │  apply once, log │                    │
//! │  └──────────────────┘           └────────┬─────────┘                    │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                                 ┌──────────────────┐                    │
//! │                                 │  dyn RemoteCart  │                    │
//! │                                 │  HttpRemoteCart  │── Bearer ──► API   │
//! │                                 └──────────────────┘                    │
//! │                                                                         │
//! │  Remote failures are logged and counted. They never roll back the      │
//! │  local change and nothing is retried.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`store`] - `CartStore`, the single owner of the cart snapshot
//! - [`outbox`] - queue of outbound sync messages
//! - [`protocol`] - the messages and their wire bodies
//! - [`remote`] - `RemoteCart` collaborator trait
//! - [`http`] - `reqwest` implementation of `RemoteCart`
//! - [`auth`] - bearer token providers
//! - [`worker`] - background task draining the outbox
//! - [`config`] - TOML/env configuration
//! - [`error`] - sync error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use folio_sync::{CartStore, FolioConfig, HttpRemoteCart, EnvToken, Outbox, SyncWorker};
//!
//! let config = FolioConfig::load_or_default(None);
//! let remote = Arc::new(HttpRemoteCart::new(&config, Arc::new(EnvToken::default()))?);
//!
//! let (outbox, receiver) = Outbox::channel();
//! let (worker, handle) = SyncWorker::new(remote.clone(), receiver);
//! tokio::spawn(worker.run());
//!
//! let mut store = CartStore::with_outbox(outbox);
//! store.hydrate_from(remote.as_ref()).await;
//! store.add_item(&book);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod outbox;
pub mod protocol;
pub mod remote;
pub mod store;
pub mod worker;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::{EnvToken, StaticToken, TokenProvider};
pub use config::{FolioConfig, QuantitySyncMode, SyncMode};
pub use error::{SyncError, SyncResult};
pub use http::HttpRemoteCart;
pub use outbox::{Outbox, OutboxReceiver};
pub use protocol::{CartOp, LineUpsert, SyncMessage};
pub use remote::RemoteCart;
pub use store::CartStore;
pub use worker::{SyncStats, SyncWorker, SyncWorkerHandle};
