//! # Sync Protocol
//!
//! The outbound messages queued by the store and the JSON bodies exchanged
//! with the server cart.
//!
//! ## Message Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartChange::Inserted / QuantityChanged ──► CartOp::Upsert(LineUpsert)  │
//! │  CartChange::Removed / Cleared          ──► CartOp::Delete { book_id }  │
//! │  CartChange::Unchanged                  ──► (nothing)                   │
//! │                                                                         │
//! │  LineUpsert ──to_wire(mode)──► WireLine ──► POST /cart                  │
//! │  GET /cart  ──► Vec<WireLine> ──TryFrom──► Vec<CartItem>                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! ```json
//! { "book_id": "4b0e…", "title": "Arrow of God", "price": 2500.0, "quantity": 1 }
//! ```
//! Prices travel as decimal major units because that is how the catalog API
//! stores them; they become [`Money`] as soon as they are parsed.

use chrono::{DateTime, Utc};
use folio_core::{BookId, CartChange, CartItem, CoreError, Money, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::QuantitySyncMode;

// =============================================================================
// Outbound Messages
// =============================================================================

/// Upsert of one line in the server cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineUpsert {
    pub book_id: BookId,
    pub title: String,
    pub price: Money,
    /// Signed change applied locally (+1 / -1).
    pub quantity_delta: i32,
    /// Local quantity after the change.
    pub quantity: u32,
}

impl LineUpsert {
    /// Builds the request body, expressing the quantity per `mode`.
    pub fn to_wire(&self, mode: QuantitySyncMode) -> WireLine {
        let quantity = match mode {
            QuantitySyncMode::Delta => i64::from(self.quantity_delta),
            QuantitySyncMode::Absolute => i64::from(self.quantity),
        };

        WireLine {
            book_id: self.book_id.to_string(),
            title: self.title.clone(),
            price: self.price.to_major_f64(),
            quantity,
        }
    }
}

/// One operation against the server cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CartOp {
    Upsert(LineUpsert),
    Delete { book_id: BookId },
}

impl CartOp {
    pub fn book_id(&self) -> &BookId {
        match self {
            CartOp::Upsert(line) => &line.book_id,
            CartOp::Delete { book_id } => book_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CartOp::Upsert(_) => "upsert",
            CartOp::Delete { .. } => "delete",
        }
    }

    /// Translates a local cart change into the server operations mirroring it.
    pub fn from_change(change: &CartChange) -> Vec<CartOp> {
        match change {
            CartChange::Inserted(item) => vec![CartOp::Upsert(LineUpsert {
                book_id: item.id.clone(),
                title: item.title.clone(),
                price: item.price,
                quantity_delta: 1,
                quantity: item.quantity,
            })],
            CartChange::QuantityChanged { item, delta } => vec![CartOp::Upsert(LineUpsert {
                book_id: item.id.clone(),
                title: item.title.clone(),
                price: item.price,
                quantity_delta: *delta,
                quantity: item.quantity,
            })],
            CartChange::Removed(item) => vec![CartOp::Delete {
                book_id: item.id.clone(),
            }],
            CartChange::Cleared(items) => items
                .iter()
                .map(|item| CartOp::Delete {
                    book_id: item.id.clone(),
                })
                .collect(),
            CartChange::Unchanged => Vec::new(),
        }
    }
}

/// A queued operation plus bookkeeping for logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMessage {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub op: CartOp,
}

impl SyncMessage {
    pub fn new(op: CartOp) -> Self {
        SyncMessage {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            op,
        }
    }
}

// =============================================================================
// Wire Bodies
// =============================================================================

/// A cart line as the REST API sends and receives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireLine {
    pub book_id: String,
    pub title: String,
    pub price: f64,
    pub quantity: i64,
}

impl TryFrom<WireLine> for CartItem {
    type Error = CoreError;

    fn try_from(line: WireLine) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(line.quantity).map_err(|_| CoreError::InvalidLine {
            book_id: line.book_id.clone(),
            source: ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: i64::from(u32::MAX),
            },
        })?;

        Ok(CartItem::new(
            line.book_id,
            line.title,
            Money::from_major_f64(line.price),
            quantity,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert(delta: i32, quantity: u32) -> LineUpsert {
        LineUpsert {
            book_id: BookId::new("b-1"),
            title: "Arrow of God".into(),
            price: Money::from_major(2500),
            quantity_delta: delta,
            quantity,
        }
    }

    #[test]
    fn test_quantity_mode_shapes_body() {
        let line = upsert(-1, 4);
        assert_eq!(line.to_wire(QuantitySyncMode::Delta).quantity, -1);
        assert_eq!(line.to_wire(QuantitySyncMode::Absolute).quantity, 4);
        assert_eq!(line.to_wire(QuantitySyncMode::Delta).price, 2500.0);
    }

    #[test]
    fn test_wire_json_shape() {
        let json = serde_json::to_value(upsert(1, 1).to_wire(QuantitySyncMode::Delta)).unwrap();
        assert_eq!(json["book_id"], "b-1");
        assert_eq!(json["quantity"], 1);
        assert_eq!(json["price"], 2500.0);
    }

    #[test]
    fn test_ops_from_changes() {
        let item = CartItem::new("a", "A", Money::from_minor(100), 2);

        let ops = CartOp::from_change(&CartChange::QuantityChanged {
            item: item.clone(),
            delta: -1,
        });
        assert!(matches!(
            ops.as_slice(),
            [CartOp::Upsert(LineUpsert { quantity_delta: -1, quantity: 2, .. })]
        ));

        let ops = CartOp::from_change(&CartChange::Removed(item.clone()));
        assert_eq!(ops[0].kind(), "delete");

        let other = CartItem::new("b", "B", Money::from_minor(1), 1);
        let ops = CartOp::from_change(&CartChange::Cleared(vec![item, other]));
        assert_eq!(ops.len(), 2);

        assert!(CartOp::from_change(&CartChange::Unchanged).is_empty());
    }

    #[test]
    fn test_wire_line_into_cart_item() {
        let line = WireLine {
            book_id: "b-7".into(),
            title: "Weep Not, Child".into(),
            price: 1999.99,
            quantity: 2,
        };
        let item = CartItem::try_from(line).unwrap();
        assert_eq!(item.price.minor(), 199_999);
        assert_eq!(item.quantity, 2);

        let negative = WireLine {
            book_id: "b-8".into(),
            title: "T".into(),
            price: 1.0,
            quantity: -3,
        };
        assert!(CartItem::try_from(negative).is_err());
    }

    #[test]
    fn test_message_ids_are_unique() {
        let op = CartOp::Delete {
            book_id: BookId::new("x"),
        };
        assert_ne!(SyncMessage::new(op.clone()).id, SyncMessage::new(op).id);
    }
}
