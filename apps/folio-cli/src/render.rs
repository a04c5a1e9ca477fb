//! Cart tables and one-line summaries for the terminal.

use folio_core::{CartChange, CartItem, CartTotals};
use folio_sync::CartStore;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Book")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Line total")]
    line_total: String,
}

impl Row {
    fn new(index: usize, item: &CartItem) -> Self {
        Row {
            index: index + 1,
            id: item.id.to_string(),
            title: item.title.clone(),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_total: item.line_total().to_string(),
        }
    }
}

/// The cart as a table followed by its totals.
pub fn cart(store: &CartStore) -> String {
    if store.is_empty() {
        return "Cart is empty".to_string();
    }

    let rows = store.items().iter().enumerate().map(|(i, item)| Row::new(i, item));
    let mut table = Table::new(rows);
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..), Alignment::right());

    format!("{}\n{}", table, totals(&store.totals()))
}

pub fn totals(totals: &CartTotals) -> String {
    format!(
        "{} {}, {} {}, total {}",
        totals.item_count,
        plural(totals.item_count as u64, "book", "books"),
        totals.total_quantity,
        plural(totals.total_quantity, "copy", "copies"),
        totals.total_price
    )
}

/// Short confirmation of what a command did.
pub fn change(change: &CartChange) -> String {
    match change {
        CartChange::Inserted(item) => format!("Added \"{}\"", item.title),
        CartChange::QuantityChanged { item, .. } => {
            format!("\"{}\" now x{}", item.title, item.quantity)
        }
        CartChange::Removed(item) => format!("Removed \"{}\"", item.title),
        CartChange::Cleared(items) => format!(
            "Cleared {} {}",
            items.len(),
            plural(items.len() as u64, "line", "lines")
        ),
        CartChange::Unchanged => "Not in cart, nothing changed".to_string(),
    }
}

fn plural(n: u64, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}
