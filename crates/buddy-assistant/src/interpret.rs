//! Response interpreter
//!
//! Classifies one assistant text blob into a tagged [`Reply`]. Pure function
//! of the text; rendering is the caller's job. The purchase form itself is
//! always built by native UI code — markup arriving from the wire only
//! selects the variant, it is never re-rendered.

use std::sync::LazyLock;

use regex::Regex;

/// Container marker this system's earlier revisions injected around
/// generated payment forms. Its presence requests the native form.
pub const FORM_MARKER: &str = "purchase-form-container";

/// Phrases that signal the assistant wants the buyer to complete a purchase.
const PURCHASE_PHRASES: &[&str] = &[
    "proceed with the purchase",
    "complete your order",
    "purchase form",
    "payment form",
];

/// Lines consisting only of whitespace, pipes, and hyphens are table
/// separators, not rows.
static SEPARATOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s|\-]+$").expect("valid separator pattern"));

/// Classified assistant reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to show; render a fixed "no content" placeholder
    Empty,
    /// Verbatim text, line breaks preserved
    PlainText(String),
    /// Pipe-delimited rows; the first row is the header
    Table(Vec<Vec<String>>),
    /// The reply asks for the purchase flow. `prompt` is assistant prose to
    /// display first; `None` when the reply was an injected form container
    /// with nothing displayable.
    PurchaseForm { prompt: Option<String> },
}

/// Classify one assistant text blob. First match wins.
pub fn interpret(text: &str) -> Reply {
    if text.trim().is_empty() {
        return Reply::Empty;
    }

    if text.contains(FORM_MARKER) {
        return Reply::PurchaseForm { prompt: None };
    }

    let lower = text.to_lowercase();
    if PURCHASE_PHRASES.iter().any(|p| lower.contains(p)) {
        return Reply::PurchaseForm {
            prompt: Some(text.to_string()),
        };
    }

    if text.contains('|') && text.contains('-') {
        if let Some(rows) = parse_table(text) {
            return Reply::Table(rows);
        }
    }

    Reply::PlainText(text.to_string())
}

/// Parse pipe-delimited lines into a cell grid. Returns `None` when nothing
/// but separators remains, so the caller falls through to plain text.
fn parse_table(text: &str) -> Option<Vec<Vec<String>>> {
    let rows: Vec<Vec<String>> = text
        .lines()
        .filter(|line| line.contains('|'))
        .filter(|line| !SEPARATOR_LINE.is_match(line))
        .map(|line| {
            line.split('|')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(String::from)
                .collect::<Vec<String>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    if rows.is_empty() { None } else { Some(rows) }
}
