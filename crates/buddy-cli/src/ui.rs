//! Terminal rendering
//!
//! Formatting helpers return strings so they stay testable; printing happens
//! at the call sites in the chat loop and command handlers.

use chrono::Local;

use buddy_assistant::Reply;
use buddy_store::{ChatRole, ChatTurn, Order};

/// Placeholder shown for an empty or non-text reply.
pub const NO_CONTENT: &str = "(no content)";

/// Format a price with its display currency
pub fn format_price(price: f64, currency: &str) -> String {
    format!("{:.2} {}", price, currency)
}

/// Format the whole transcript for re-display when the widget reopens.
pub fn format_transcript(turns: &[ChatTurn]) -> String {
    let mut out = String::new();
    for turn in turns {
        out.push_str(&format_turn(turn));
    }
    out
}

/// Format one turn with its sender label and local time.
pub fn format_turn(turn: &ChatTurn) -> String {
    let label = match turn.role {
        ChatRole::User => "You",
        ChatRole::Assistant => "TechBuddy",
    };
    let time = turn.created_at.with_timezone(&Local).format("%H:%M");
    format!("[{}] {}: {}\n", time, label, turn.text)
}

/// Format an interpreted reply for the terminal.
pub fn format_reply(reply: &Reply) -> String {
    match reply {
        Reply::Empty => format!("TechBuddy: {}\n", NO_CONTENT),
        Reply::PlainText(text) => format!("TechBuddy: {}\n", text),
        Reply::Table(rows) => format!("TechBuddy:\n{}", format_table(rows)),
        Reply::PurchaseForm { prompt } => match prompt {
            Some(text) => format!("TechBuddy: {}\n", text),
            None => "TechBuddy: Your purchase form is ready.\n".to_string(),
        },
    }
}

/// Render a cell grid as an aligned table; the first row is the header.
pub fn format_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');

        if index == 0 && rows.len() > 1 {
            let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&sep.join("-|-"));
            out.push('\n');
        }
    }
    out
}

/// Format the order confirmation view.
pub fn format_order(order: &Order, currency: &str) -> String {
    let mut out = String::new();
    out.push_str("Order Confirmed!\n");
    out.push_str(&format!("Order ID: {}\n", order.order_id));
    out.push_str(&format!(
        "Order Date: {}\n",
        order.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    ));
    out.push_str(&format!("Status: {:?}\n", order.status));
    out.push_str("Items:\n");
    for item in &order.items {
        out.push_str(&format!(
            "  {} x{} - {}\n",
            item.name,
            item.quantity,
            format_price(item.price, currency)
        ));
    }
    out.push_str(&format!(
        "Total: {}\n",
        format_price(order.total_price, currency)
    ));
    out.push_str(&format!(
        "Payment: {} ending in {}\n",
        order.payment.method, order.payment.last_four_digits
    ));
    out
}
