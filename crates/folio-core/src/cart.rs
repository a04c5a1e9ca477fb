//! # Cart
//!
//! The in-memory cart snapshot and every mutation a shopper can make.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add(book) ─────────► present? qty + 1 : push(qty = 1)                 │
//! │                                                                         │
//! │  increase(id) ──────► present? qty + 1 : no-op                         │
//! │                                                                         │
//! │  decrease(id) ──────► qty == 1? remove : qty - 1   (absent: no-op)     │
//! │                                                                         │
//! │  remove(id) ────────► retain(id != x)              (absent: no-op)     │
//! │                                                                         │
//! │  clear() ───────────► items.clear()                                    │
//! │                                                                         │
//! │  NOTE: none of these fail. Each returns a CartChange describing what   │
//! │        actually happened so callers can mirror it elsewhere.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Book, BookId};

/// An item in the shopping cart.
///
/// `title` and `price` are frozen copies taken when the book was first
/// added, so the cart keeps rendering consistently if the catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: BookId,
    pub title: String,
    pub price: Money,
    /// Always >= 1 while the item is in a cart.
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a cart line for a book with quantity 1.
    pub fn from_book(book: &Book) -> Self {
        CartItem {
            id: book.id.clone(),
            title: book.title.clone(),
            price: book.price,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Creates a line with an explicit quantity (used when rehydrating).
    pub fn new(id: impl Into<BookId>, title: impl Into<String>, price: Money, quantity: u32) -> Self {
        CartItem {
            id: id.into(),
            title: title.into(),
            price,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// What a mutation did to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was pushed with quantity 1.
    Inserted(CartItem),

    /// An existing line's quantity moved by `delta`; `item` is the line after the change.
    QuantityChanged { item: CartItem, delta: i32 },

    /// The line was deleted (explicitly, or because its quantity reached 0).
    Removed(CartItem),

    /// Every line was dropped.
    Cleared(Vec<CartItem>),

    /// The target id was not in the cart.
    Unchanged,
}

impl CartChange {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, CartChange::Unchanged)
    }
}

/// The cart snapshot.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same book increases quantity)
/// - Quantity is never 0 (reaching 0 removes the line)
/// - Insertion order is kept for display; totals never depend on it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,

    /// When the cart was created/last cleared
    created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one copy of `book`, inserting the line if needed.
    pub fn add(&mut self, book: &Book) -> CartChange {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == book.id) {
            item.quantity = item.quantity.saturating_add(1);
            return CartChange::QuantityChanged {
                item: item.clone(),
                delta: 1,
            };
        }

        let item = CartItem::from_book(book);
        self.items.push(item.clone());
        CartChange::Inserted(item)
    }

    /// Removes the line for `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: &BookId) -> CartChange {
        match self.position(id) {
            Some(index) => CartChange::Removed(self.items.remove(index)),
            None => CartChange::Unchanged,
        }
    }

    /// Adds one to an existing line. Absent ids are a no-op.
    pub fn increase(&mut self, id: &BookId) -> CartChange {
        match self.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                CartChange::QuantityChanged {
                    item: item.clone(),
                    delta: 1,
                }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Subtracts one from an existing line, removing it instead of keeping a 0.
    pub fn decrease(&mut self, id: &BookId) -> CartChange {
        let Some(index) = self.position(id) else {
            return CartChange::Unchanged;
        };

        let item = &mut self.items[index];
        if item.quantity <= 1 {
            return CartChange::Removed(self.items.remove(index));
        }

        item.quantity -= 1;
        CartChange::QuantityChanged {
            item: item.clone(),
            delta: -1,
        }
    }

    /// Drops every line.
    pub fn clear(&mut self) -> CartChange {
        let removed = std::mem::take(&mut self.items);
        self.created_at = Utc::now();
        CartChange::Cleared(removed)
    }

    /// Replaces the contents with `items`, keeping first-seen order.
    ///
    /// Duplicate ids are merged by summing quantities and zero-quantity lines
    /// are dropped, so the result always satisfies the cart invariants.
    pub fn replace_with(&mut self, items: impl IntoIterator<Item = CartItem>) {
        let mut merged: Vec<CartItem> = Vec::new();

        for incoming in items {
            if incoming.quantity == 0 {
                continue;
            }
            match merged.iter_mut().find(|i| i.id == incoming.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(incoming.quantity);
                }
                None => merged.push(incoming),
            }
        }

        self.items = merged;
    }

    fn position(&self, id: &BookId) -> Option<usize> {
        self.items.iter().position(|i| &i.id == id)
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: &BookId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the number of distinct books in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total number of copies across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Σ price × quantity over the current lines.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u64,
    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total_price: cart.total_price(),
        }
    }
}
