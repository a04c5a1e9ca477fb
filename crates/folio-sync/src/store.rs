//! # Cart Store
//!
//! The single owner of the shopper's cart snapshot.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore Operations                                 │
//! │                                                                         │
//! │  Caller                 CartStore                 Side Effects          │
//! │  ──────                 ─────────                 ────────────          │
//! │                                                                         │
//! │  add_item(book) ──────► cart.add() ─────────────► Upsert (+1)          │
//! │                                                                         │
//! │  increase_quantity(id) ► cart.increase() ───────► Upsert (+1)          │
//! │                                                                         │
//! │  decrease_quantity(id) ► cart.decrease() ───────► Upsert (-1)          │
//! │                                          └─ qty 0 ► Delete              │
//! │                                                                         │
//! │  remove_item(id) ─────► cart.remove() ──────────► Delete               │
//! │                                                                         │
//! │  clear() ─────────────► cart.clear() ───────────► Delete per line      │
//! │                                                                         │
//! │  rehydrate(items) ────► cart.replace_with() ────► (nothing)            │
//! │                                                                         │
//! │  NOTE: the local change is visible before anything is queued. A no-op  │
//! │        queues nothing. Remote results never reach this type.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use folio_core::validation::validate_line;
use folio_core::{Book, BookId, Cart, CartChange, CartItem, CartTotals, Money};
use tracing::{debug, info, warn};

use crate::outbox::Outbox;
use crate::protocol::CartOp;
use crate::remote::RemoteCart;

/// Cart state plus the outbox that mirrors it to the server.
///
/// All mutations take `&mut self`; callers that share a store across tasks
/// wrap it themselves.
#[derive(Debug, Default)]
pub struct CartStore {
    cart: Cart,
    outbox: Outbox,
}

impl CartStore {
    /// A store that never talks to a server.
    pub fn new() -> Self {
        CartStore::default()
    }

    /// A store that mirrors every effective change into `outbox`.
    pub fn with_outbox(outbox: Outbox) -> Self {
        CartStore {
            cart: Cart::new(),
            outbox,
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.outbox.is_enabled()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one copy of `book`. Never fails.
    pub fn add_item(&mut self, book: &Book) -> CartChange {
        let change = self.cart.add(book);
        debug!(book_id = %book.id, quantity = self.quantity_of(&book.id), "Added to cart");
        self.publish(&change);
        change
    }

    /// Deletes the line for `id`. Removing an absent id does nothing.
    pub fn remove_item(&mut self, id: &BookId) -> CartChange {
        let change = self.cart.remove(id);
        if !change.is_unchanged() {
            debug!(book_id = %id, "Removed from cart");
        }
        self.publish(&change);
        change
    }

    pub fn increase_quantity(&mut self, id: &BookId) -> CartChange {
        let change = self.cart.increase(id);
        if !change.is_unchanged() {
            debug!(book_id = %id, quantity = self.quantity_of(id), "Increased quantity");
        }
        self.publish(&change);
        change
    }

    /// Takes one copy off; the last copy removes the line.
    pub fn decrease_quantity(&mut self, id: &BookId) -> CartChange {
        let change = self.cart.decrease(id);
        match &change {
            CartChange::Removed(_) => debug!(book_id = %id, "Decreased to zero, removed"),
            CartChange::QuantityChanged { item, .. } => {
                debug!(book_id = %id, quantity = item.quantity, "Decreased quantity")
            }
            _ => {}
        }
        self.publish(&change);
        change
    }

    /// Empties the cart, e.g. after an order is placed.
    pub fn clear(&mut self) -> CartChange {
        let change = self.cart.clear();
        if let CartChange::Cleared(removed) = &change {
            debug!(lines = removed.len(), "Cleared cart");
        }
        self.publish(&change);
        change
    }

    /// Replaces the snapshot with lines loaded from the server.
    ///
    /// Invalid lines are skipped with a warning. Nothing is queued: the
    /// server already holds these lines.
    pub fn rehydrate(&mut self, items: Vec<CartItem>) {
        let received = items.len();
        let valid: Vec<CartItem> = items
            .into_iter()
            .filter(|item| match validate_line(item) {
                Ok(()) => true,
                Err(e) => {
                    warn!(book_id = %item.id, error = %e, "Skipping invalid cart line");
                    false
                }
            })
            .collect();

        self.cart.replace_with(valid);
        info!(
            received,
            lines = self.cart.item_count(),
            total_quantity = self.cart.total_quantity(),
            "Rehydrated cart"
        );
    }

    /// Loads the server cart through `remote`.
    ///
    /// Returns whether the snapshot was replaced. On failure the local
    /// snapshot is left exactly as it was.
    pub async fn hydrate_from(&mut self, remote: &dyn RemoteCart) -> bool {
        match remote.fetch_cart().await {
            Ok(items) => {
                self.rehydrate(items);
                true
            }
            Err(e) => {
                warn!(error = %e, "Could not load server cart, keeping local cart");
                false
            }
        }
    }

    fn publish(&self, change: &CartChange) {
        for op in CartOp::from_change(change) {
            self.outbox.enqueue(op);
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    pub fn snapshot(&self) -> &Cart {
        &self.cart
    }

    /// Σ price × quantity, computed from the current lines on every call.
    pub fn total_price(&self) -> Money {
        self.cart.total_price()
    }

    /// Distinct books in the cart.
    pub fn item_count(&self) -> usize {
        self.cart.item_count()
    }

    /// Copies across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.cart.total_quantity()
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Quantity of `id`, 0 when absent.
    pub fn quantity_of(&self, id: &BookId) -> u32 {
        self.cart.get(id).map_or(0, |item| item.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::outbox::OutboxReceiver;
    use crate::remote::mock::MockRemote;

    fn book(id: &str, price: i64) -> Book {
        Book::new(id, format!("Book {}", id), Money::from_minor(price))
    }

    fn synced() -> (CartStore, OutboxReceiver) {
        let (outbox, rx) = Outbox::channel();
        (CartStore::with_outbox(outbox), rx)
    }

    fn ops(rx: &mut OutboxReceiver) -> Vec<CartOp> {
        rx.try_drain().into_iter().map(|m| m.op).collect()
    }

    #[test]
    fn test_add_same_book_accumulates() {
        let mut store = CartStore::new();
        let x = book("x", 1000);
        for _ in 0..4 {
            store.add_item(&x);
        }

        assert_eq!(store.item_count(), 1);
        assert_eq!(store.quantity_of(&x.id), 4);
        assert_eq!(store.total_quantity(), 4);
    }

    #[test]
    fn test_totals_follow_every_mutation() {
        let mut store = CartStore::new();
        let a = book("a", 1000);
        let b = book("b", 500);

        store.add_item(&a);
        store.add_item(&a);
        store.add_item(&b);
        store.increase_quantity(&b.id);
        store.increase_quantity(&b.id);
        assert_eq!(store.total_price().minor(), 3500);
        assert_eq!(store.item_count(), 2);
        assert_eq!(store.total_quantity(), 5);

        store.decrease_quantity(&a.id);
        assert_eq!(store.total_price().minor(), 2500);

        store.remove_item(&b.id);
        assert_eq!(store.total_price().minor(), 1000);

        let totals = store.totals();
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_quantity, 1);
    }

    #[test]
    fn test_add_then_remove_leaves_empty() {
        let mut store = CartStore::new();
        let x = book("x", 1000);
        store.add_item(&x);
        store.remove_item(&x.id);

        assert!(store.is_empty());
        assert_eq!(store.total_price(), Money::zero());
    }

    #[test]
    fn test_remove_twice_same_as_once() {
        let mut store = CartStore::new();
        let x = book("x", 1000);
        store.add_item(&x);
        store.add_item(&book("y", 200));

        store.remove_item(&x.id);
        let after_once: Vec<_> = store.items().to_vec();
        assert!(store.remove_item(&x.id).is_unchanged());
        assert_eq!(store.items(), after_once.as_slice());
    }

    #[test]
    fn test_decrease_at_one_removes() {
        let mut store = CartStore::new();
        let x = book("x", 1000);
        store.add_item(&x);

        assert!(matches!(store.decrease_quantity(&x.id), CartChange::Removed(_)));
        assert!(store.is_empty());
        assert!(store.decrease_quantity(&x.id).is_unchanged());
    }

    #[test]
    fn test_clear_always_empties() {
        let mut store = CartStore::new();
        store.clear();
        assert!(store.is_empty());

        store.add_item(&book("a", 1));
        store.add_item(&book("b", 2));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.total_quantity(), 0);
    }

    #[test]
    fn test_mutations_enqueue_matching_ops() {
        let (mut store, mut rx) = synced();
        let x = book("x", 1000);

        store.add_item(&x);
        store.add_item(&x);
        store.decrease_quantity(&x.id);
        store.decrease_quantity(&x.id);

        let ops = ops(&mut rx);
        assert_eq!(ops.len(), 4);
        match &ops[1] {
            CartOp::Upsert(line) => {
                assert_eq!(line.quantity_delta, 1);
                assert_eq!(line.quantity, 2);
            }
            other => panic!("expected upsert, got {:?}", other),
        }
        match &ops[2] {
            CartOp::Upsert(line) => {
                assert_eq!(line.quantity_delta, -1);
                assert_eq!(line.quantity, 1);
            }
            other => panic!("expected upsert, got {:?}", other),
        }
        assert_eq!(ops[3], CartOp::Delete { book_id: x.id.clone() });
    }

    #[test]
    fn test_noops_enqueue_nothing() {
        let (mut store, mut rx) = synced();
        let missing = BookId::new("missing");

        store.remove_item(&missing);
        store.increase_quantity(&missing);
        store.decrease_quantity(&missing);
        store.clear();

        assert!(rx.try_drain().is_empty());
    }

    #[test]
    fn test_clear_enqueues_delete_per_line() {
        let (mut store, mut rx) = synced();
        store.add_item(&book("a", 1));
        store.add_item(&book("b", 2));
        rx.try_drain();

        store.clear();
        let ids: Vec<_> = ops(&mut rx)
            .iter()
            .map(|op| (op.kind(), op.book_id().to_string()))
            .collect();
        assert_eq!(ids, vec![("delete", "a".to_string()), ("delete", "b".to_string())]);
    }

    #[test]
    fn test_local_state_same_with_or_without_outbox() {
        let (mut synced_store, _rx) = synced();
        let mut local = CartStore::new();
        let a = book("a", 1000);
        let b = book("b", 500);

        for store in [&mut synced_store, &mut local] {
            store.add_item(&a);
            store.add_item(&b);
            store.increase_quantity(&b.id);
            store.decrease_quantity(&a.id);
        }

        assert_eq!(synced_store.totals(), local.totals());
        assert_eq!(synced_store.items().len(), local.items().len());
    }

    #[test]
    fn test_dropped_worker_does_not_affect_local_state() {
        let (mut store, rx) = synced();
        drop(rx);

        store.add_item(&book("a", 700));
        assert_eq!(store.total_price().minor(), 700);
        assert!(!store.is_syncing());
    }

    #[test]
    fn test_rehydrate_merges_and_skips_invalid() {
        let (mut store, mut rx) = synced();
        store.add_item(&book("old", 1));
        rx.try_drain();

        store.rehydrate(vec![
            CartItem::new("a", "A", Money::from_minor(1000), 1),
            CartItem::new("a", "A", Money::from_minor(1000), 2),
            CartItem::new("zero", "Z", Money::from_minor(10), 0),
            CartItem::new("neg", "N", Money::from_minor(-5), 1),
            CartItem::new("b", "B", Money::from_minor(500), 1),
        ]);

        assert_eq!(store.item_count(), 2);
        assert_eq!(store.quantity_of(&BookId::new("a")), 3);
        assert_eq!(store.quantity_of(&BookId::new("old")), 0);
        assert_eq!(store.total_price().minor(), 3500);
        assert!(rx.try_drain().is_empty());
    }

    #[test]
    fn test_oversized_lines_never_break_totals() {
        let mut store = CartStore::new();
        store.rehydrate(vec![CartItem::new(
            "a",
            "A",
            Money::from_minor(100_000_000_000),
            1_000_000_000,
        )]);
        assert!(store.is_empty());
        assert_eq!(store.total_price(), Money::zero());

        let pricey = Book::new("p", "P", Money::from_minor(i64::MAX));
        store.add_item(&pricey);
        store.add_item(&pricey);
        store.add_item(&book("q", 100));
        assert_eq!(store.total_price().minor(), i64::MAX);
    }

    #[tokio::test]
    async fn test_hydrate_from_replaces_snapshot() {
        let mut remote = MockRemote::new();
        remote
            .expect_fetch_cart()
            .times(1)
            .returning(|| Ok(vec![CartItem::new("a", "A", Money::from_minor(250), 2)]));

        let mut store = CartStore::new();
        assert!(store.hydrate_from(&remote).await);
        assert_eq!(store.total_price().minor(), 500);
    }

    #[tokio::test]
    async fn test_hydrate_failure_keeps_local_cart() {
        let mut remote = MockRemote::new();
        remote
            .expect_fetch_cart()
            .times(1)
            .returning(|| Err(SyncError::Timeout));

        let mut store = CartStore::new();
        store.add_item(&book("a", 1000));
        assert!(!store.hydrate_from(&remote).await);
        assert_eq!(store.total_price().minor(), 1000);
    }
}
