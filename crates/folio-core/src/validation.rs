//! # Validation Module
//!
//! Checks applied to data that enters the cart from outside the process:
//! lines returned by the server cart and arguments typed at the terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Points                                  │
//! │                                                                         │
//! │  GET /cart ──► validate_line() ──► ok: rehydrate   err: skip + warn    │
//! │                                                                         │
//! │  CLI "add" ──► validate_book() ──► ok: Cart::add   err: print error    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::cart::CartItem;
use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::types::{Book, BookId};
use crate::{MAX_BOOK_ID_LEN, MAX_ITEM_QUANTITY, MAX_PRICE_MINOR, MAX_TITLE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a book identifier.
///
/// ```rust
/// use folio_core::validation::validate_book_id;
///
/// assert!(validate_book_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_book_id("  ").is_err());
/// ```
pub fn validate_book_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "book id".to_string(),
        });
    }

    if id.len() > MAX_BOOK_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "book id".to_string(),
            max: MAX_BOOK_ID_LEN,
        });
    }

    if id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "book id".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a book title.
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }

    Ok(())
}

/// Prices lie in `0..=MAX_PRICE_MINOR`; zero is allowed (free books).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.minor() > MAX_PRICE_MINOR {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_MINOR,
        });
    }

    Ok(())
}

pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Parses a decimal price typed by a user (`"1500"`, `"1500.5"`, `"12.99"`).
///
/// ```rust
/// use folio_core::validation::parse_price;
///
/// assert_eq!(parse_price("12.99").unwrap().minor(), 1299);
/// assert_eq!(parse_price("1500").unwrap().minor(), 150_000);
/// assert!(parse_price("12.999").is_err());
/// assert!(parse_price("-3").is_err());
/// ```
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: reason.to_string(),
    };

    let input = input.trim();
    let (major, minor) = match input.split_once('.') {
        Some((major, minor)) => (major, minor),
        None => (input, ""),
    };

    if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected digits, optionally followed by .NN"));
    }
    if minor.len() > 2 || !minor.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("at most two decimal places"));
    }

    let major: i64 = major
        .parse()
        .map_err(|_| invalid("amount too large"))?;
    let minor: i64 = match minor.len() {
        0 => 0,
        1 => minor.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
        _ => minor.parse().map_err(|_| invalid("bad fraction"))?,
    };

    let total = major
        .checked_mul(100)
        .and_then(|m| m.checked_add(minor))
        .ok_or_else(|| invalid("amount too large"))?;

    Ok(Money::from_minor(total))
}

/// Validates everything needed to put a book in the cart.
pub fn validate_book(book: &Book) -> Result<(), CoreError> {
    let wrap = |source| CoreError::InvalidLine {
        book_id: book.id.to_string(),
        source,
    };

    validate_book_id(book.id.as_str()).map_err(wrap)?;
    validate_title(&book.title).map_err(wrap)?;
    validate_price(book.price).map_err(wrap)?;
    Ok(())
}

/// Validates a cart line received from outside (e.g. the server cart).
pub fn validate_line(item: &CartItem) -> Result<(), CoreError> {
    let wrap = |source| CoreError::InvalidLine {
        book_id: item.id.to_string(),
        source,
    };

    validate_book_id(item.id.as_str()).map_err(wrap)?;
    validate_title(&item.title).map_err(wrap)?;
    validate_price(item.price).map_err(wrap)?;
    validate_quantity(item.quantity).map_err(wrap)?;
    Ok(())
}

/// Builds a validated [`Book`] from raw user input.
pub fn book_from_input(id: &str, title: &str, price: &str) -> Result<Book, CoreError> {
    let book = Book::new(BookId::new(id.trim()), title.trim(), parse_price(price)?);
    validate_book(&book)?;
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_book_id() {
        assert!(validate_book_id("b-1").is_ok());
        assert!(validate_book_id("").is_err());
        assert!(validate_book_id("has space").is_err());
        assert!(validate_book_id(&"x".repeat(MAX_BOOK_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Purple Hibiscus").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_price_and_quantity() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_minor(-1)).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());

        assert!(validate_price(Money::from_minor(MAX_PRICE_MINOR)).is_ok());
        assert!(validate_price(Money::from_minor(MAX_PRICE_MINOR + 1)).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_oversized_input_rejected() {
        let line = CartItem::new("a", "A", Money::from_minor(100_000_000_000), 1_000_000_000);
        assert!(validate_line(&line).is_err());
        assert!(book_from_input("x", "T", "92233720368547758.07").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("0").unwrap(), Money::zero());
        assert_eq!(parse_price("1500.5").unwrap().minor(), 150_050);
        assert_eq!(parse_price(" 7.05 ").unwrap().minor(), 705);
        assert!(parse_price("").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price(".50").is_err());
        assert!(parse_price("99999999999999999999").is_err());
    }

    #[test]
    fn test_validate_line_rejects_zero_quantity() {
        let line = CartItem::new("b-1", "Title", Money::from_minor(100), 0);
        let err = validate_line(&line).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidLine {
                source: ValidationError::MustBePositive { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_book_from_input() {
        let book = book_from_input("b-2", " Arrow of God ", "2500").unwrap();
        assert_eq!(book.title, "Arrow of God");
        assert_eq!(book.price.minor(), 250_000);

        assert!(book_from_input("b-2", "", "10").is_err());
        assert!(book_from_input("b-2", "T", "-10").is_err());
    }
}
