//! # Session Commands
//!
//! One line of input, one [`Command`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add <book-id> <price> <title...>   CartStore::add_item                 │
//! │  remove <book-id>                   CartStore::remove_item              │
//! │  inc <book-id>                      CartStore::increase_quantity        │
//! │  dec <book-id>                      CartStore::decrease_quantity        │
//! │  clear                              CartStore::clear                    │
//! │  show                               table + totals                      │
//! │  total                              totals only                         │
//! │  help / quit                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::str::FromStr;

use folio_core::validation::{book_from_input, validate_book_id};
use folio_core::{Book, BookId};
use folio_sync::CartStore;

use crate::error::{CliError, CliResult};
use crate::render;

pub const HELP: &str = "\
Commands:
  add <book-id> <price> <title...>   add one copy of a book
  remove <book-id>                   remove a book from the cart
  inc <book-id>                      one more copy
  dec <book-id>                      one copy fewer (removes at zero)
  clear                              empty the cart
  show                               print the cart
  total                              print the totals
  help                               this list
  quit                               leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(Book),
    Remove(BookId),
    Increase(BookId),
    Decrease(BookId),
    Clear,
    Show,
    Total,
    Help,
    Quit,
}

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> CliResult<Self> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));

        match name.to_ascii_lowercase().as_str() {
            "add" => {
                let mut parts = rest.splitn(3, char::is_whitespace);
                let id = parts.next().filter(|s| !s.is_empty());
                let price = parts.next();
                let title = parts.next().map(str::trim).filter(|s| !s.is_empty());
                match (id, price, title) {
                    (Some(id), Some(price), Some(title)) => {
                        Ok(Command::Add(book_from_input(id, title, price)?))
                    }
                    _ => Err(CliError::Usage("add <book-id> <price> <title...>")),
                }
            }
            "remove" | "rm" => Ok(Command::Remove(single_id(rest, "remove <book-id>")?)),
            "inc" => Ok(Command::Increase(single_id(rest, "inc <book-id>")?)),
            "dec" => Ok(Command::Decrease(single_id(rest, "dec <book-id>")?)),
            "clear" => Ok(Command::Clear),
            "show" | "ls" => Ok(Command::Show),
            "total" => Ok(Command::Total),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CliError::UnknownCommand(other.to_string())),
        }
    }
}

fn single_id(rest: &str, usage: &'static str) -> CliResult<BookId> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(id), None) => {
            validate_book_id(id).map_err(folio_core::CoreError::from)?;
            Ok(BookId::new(id))
        }
        _ => Err(CliError::Usage(usage)),
    }
}

/// Runs `command` against the store and prints the result.
pub fn execute<W: Write>(store: &mut CartStore, command: Command, out: &mut W) -> CliResult<Flow> {
    let change = match command {
        Command::Add(book) => store.add_item(&book),
        Command::Remove(id) => store.remove_item(&id),
        Command::Increase(id) => store.increase_quantity(&id),
        Command::Decrease(id) => store.decrease_quantity(&id),
        Command::Clear => store.clear(),
        Command::Show => {
            writeln!(out, "{}", render::cart(store))?;
            return Ok(Flow::Continue);
        }
        Command::Total => {
            writeln!(out, "{}", render::totals(&store.totals()))?;
            return Ok(Flow::Continue);
        }
        Command::Help => {
            writeln!(out, "{}", HELP)?;
            return Ok(Flow::Continue);
        }
        Command::Quit => return Ok(Flow::Quit),
    };

    writeln!(out, "{}", render::change(&change))?;
    writeln!(out, "{}", render::cart(store))?;
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> CliResult<Command> {
        line.parse()
    }

    #[test]
    fn test_parse_add() {
        match parse("add b-1 2500 Arrow of God").unwrap() {
            Command::Add(book) => {
                assert_eq!(book.id.as_str(), "b-1");
                assert_eq!(book.title, "Arrow of God");
                assert_eq!(book.price.minor(), 250_000);
            }
            other => panic!("expected add, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_needs_title() {
        assert!(matches!(parse("add b-1 2500"), Err(CliError::Usage(_))));
        assert!(matches!(parse("add"), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_parse_add_rejects_bad_price() {
        assert!(matches!(parse("add b-1 -4 Title"), Err(CliError::Input(_))));
        assert!(matches!(parse("add b-1 abc Title"), Err(CliError::Input(_))));
    }

    #[test]
    fn test_parse_id_commands() {
        assert_eq!(parse("remove b-1").unwrap(), Command::Remove(BookId::new("b-1")));
        assert_eq!(parse("INC b-1").unwrap(), Command::Increase(BookId::new("b-1")));
        assert_eq!(parse("  dec   b-1 ").unwrap(), Command::Decrease(BookId::new("b-1")));
        assert!(matches!(parse("inc"), Err(CliError::Usage(_))));
        assert!(matches!(parse("inc a b"), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(parse("clear").unwrap(), Command::Clear);
        assert_eq!(parse("show").unwrap(), Command::Show);
        assert_eq!(parse("total").unwrap(), Command::Total);
        assert_eq!(parse("exit").unwrap(), Command::Quit);
        assert!(matches!(parse("buy b-1"), Err(CliError::UnknownCommand(_))));
    }

    #[test]
    fn test_execute_mutations() {
        let mut store = CartStore::new();
        let mut out = Vec::new();

        let add = parse("add b-1 10 Purple Hibiscus").unwrap();
        execute(&mut store, add.clone(), &mut out).unwrap();
        execute(&mut store, add, &mut out).unwrap();
        execute(&mut store, parse("dec b-1").unwrap(), &mut out).unwrap();

        assert_eq!(store.total_quantity(), 1);
        assert_eq!(store.total_price().minor(), 1000);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Purple Hibiscus"));
        assert!(text.contains("₦10.00"));
    }

    #[test]
    fn test_execute_quit() {
        let mut store = CartStore::new();
        let mut out = Vec::new();
        assert_eq!(execute(&mut store, Command::Quit, &mut out).unwrap(), Flow::Quit);
        assert!(out.is_empty());
    }
}
