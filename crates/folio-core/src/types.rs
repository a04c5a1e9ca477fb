//! # Domain Types
//!
//! Catalog-side types the cart works with.
//!
//! ```text
//! ┌─────────────────┐        ┌─────────────────┐
//! │      Book       │        │    CartItem     │
//! │  ─────────────  │ add()  │  ─────────────  │
//! │  id (BookId)    │──────► │  id (BookId)    │
//! │  title          │        │  title          │
//! │  price (Money)  │        │  price (frozen) │
//! │                 │        │  quantity >= 1  │
//! └─────────────────┘        └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Book Identifier
// =============================================================================

/// Identifier of a book in the catalog.
///
/// The catalog API hands out UUIDs, but the cart only needs equality, so the
/// id is kept as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        BookId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        BookId(id.to_string())
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        BookId(id)
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Book
// =============================================================================

/// A catalog entry as seen by a shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub price: Money,
}

impl Book {
    pub fn new(id: impl Into<BookId>, title: impl Into<String>, price: Money) -> Self {
        Book {
            id: id.into(),
            title: title.into(),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_id_is_transparent_in_json() {
        let id = BookId::new("3f1c");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3f1c\"");
        assert_eq!(id.to_string(), "3f1c");
    }

    #[test]
    fn test_book_new() {
        let book = Book::new("b-1", "Half of a Yellow Sun", Money::from_major(4500));
        assert_eq!(book.id.as_str(), "b-1");
        assert_eq!(book.price.minor(), 450_000);
    }
}
