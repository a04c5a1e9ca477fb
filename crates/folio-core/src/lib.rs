//! # folio-core: Pure Cart Logic for the Folio storefront
//!
//! This crate holds the shopping cart as plain data plus the rules that keep
//! it consistent. Nothing in here touches the network or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Cart Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    folio-cli (terminal)                         │   │
//! │  │        add / remove / inc / dec / clear / show                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │   folio-sync: CartStore ──► Outbox ──► SyncWorker ──► REST API  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  BookId   │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │   Book    │  │  Naira    │  │ CartItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Book identifiers and catalog entries
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart snapshot and its mutations
//! - [`error`] - Domain error types
//! - [`validation`] - Checks for data arriving from outside (server, CLI)
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::{Book, Cart, Money};
//!
//! let mut cart = Cart::new();
//! let book = Book::new("b-1", "Things Fall Apart", Money::from_minor(1000));
//!
//! cart.add(&book);
//! cart.add(&book);
//!
//! assert_eq!(cart.item_count(), 1);
//! assert_eq!(cart.total_price().minor(), 2000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartChange, CartItem, CartTotals};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::{Book, BookId};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a book title accepted from outside the process.
pub const MAX_TITLE_LEN: usize = 300;

/// Maximum length of a book identifier.
pub const MAX_BOOK_ID_LEN: usize = 64;

/// Highest unit price accepted into a cart, in kobo (₦100,000,000.00).
pub const MAX_PRICE_MINOR: i64 = 10_000_000_000;

/// Highest quantity of a single line accepted from outside the process.
pub const MAX_ITEM_QUANTITY: u32 = 999;
