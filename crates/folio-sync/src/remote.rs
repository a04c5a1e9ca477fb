//! # Remote Cart
//!
//! The server-side cart, seen as a black box with three operations.

use async_trait::async_trait;
use folio_core::{BookId, CartItem};

use crate::error::SyncResult;
use crate::protocol::{CartOp, LineUpsert};

/// Durable copy of the cart owned by the bookstore API.
#[async_trait]
pub trait RemoteCart: Send + Sync {
    /// Fetches the server cart for the authenticated session.
    async fn fetch_cart(&self) -> SyncResult<Vec<CartItem>>;

    /// Inserts or updates one line.
    async fn upsert_line(&self, line: &LineUpsert) -> SyncResult<()>;

    /// Deletes one line by book id.
    async fn delete_line(&self, book_id: &BookId) -> SyncResult<()>;

    /// Dispatches a queued operation to the matching call.
    async fn apply(&self, op: &CartOp) -> SyncResult<()> {
        match op {
            CartOp::Upsert(line) => self.upsert_line(line).await,
            CartOp::Delete { book_id } => self.delete_line(book_id).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub Remote {}

        #[async_trait]
        impl RemoteCart for Remote {
            async fn fetch_cart(&self) -> SyncResult<Vec<CartItem>>;
            async fn upsert_line(&self, line: &LineUpsert) -> SyncResult<()>;
            async fn delete_line(&self, book_id: &BookId) -> SyncResult<()>;
        }
    }
}
