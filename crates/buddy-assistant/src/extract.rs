//! Purchase-intent extraction
//!
//! The remote assistant replies in prose; this module is the only bridge
//! from that prose to a machine-actionable purchase draft. The heuristics
//! run from most-specific (explicit total with bundle detection) to
//! least-specific (positional token guessing) and are deliberately kept in
//! one place: they are a compatibility shim over an endpoint that has no
//! structured intent channel, not a contract to extend.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use buddy_store::{ChatRole, ChatTurn};

use crate::types::ConversationContext;

/// How many trailing turns the extractor inspects.
pub const EXTRACTOR_WINDOW: usize = 5;

/// Draft name used for a detected multi-component build.
pub const BUNDLE_NAME: &str = "PC Build";

/// A line stating a total: the word `Total`, optional punctuation, a
/// decimal number, then a currency token.
static TOTAL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\btotal\b[^0-9]*([0-9]+(?:\.[0-9]+)?)\s*(?:jod|jd|usd|\$)")
        .expect("valid total pattern")
});

/// `<name>: <price> <currency>` anywhere in the text.
static NAME_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([^\n:]+):\s*([0-9]+(?:\.[0-9]+)?)\s*(?:jod|jd|usd|\$)")
        .expect("valid name-price pattern")
});

/// A bare `<number> <currency>` occurrence.
static BARE_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(?:jod|jd|usd|\$)").expect("valid price pattern")
});

/// An unconfirmed candidate purchase inferred from assistant prose.
/// Never persisted until promoted to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseDraft {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub category: String,
    pub is_bundle: bool,
}

impl PurchaseDraft {
    /// True when the extractor could not recover a price; the purchase form
    /// must collect one manually before an order can exist.
    pub fn needs_price(&self) -> bool {
        self.price <= 0.0
    }
}

/// What one turn yielded before context is folded in
struct Candidate {
    name: String,
    price: f64,
    is_bundle: bool,
}

/// Derive a purchase draft from the most recent turns.
///
/// Scans at most [`EXTRACTOR_WINDOW`] turns, most-recent-first, assistant
/// turns only, stopping at the first turn that yields a candidate. When no
/// turn matches, the ambient context fills in a draft with price 0.
/// Deterministic and side-effect free.
pub fn extract_purchase_draft(turns: &[ChatTurn], context: &ConversationContext) -> PurchaseDraft {
    for turn in turns.iter().rev().take(EXTRACTOR_WINDOW) {
        if turn.role != ChatRole::Assistant {
            continue;
        }
        if let Some(candidate) = candidate_from_text(&turn.text) {
            return if candidate.is_bundle {
                PurchaseDraft {
                    id: "pc-build".to_string(),
                    name: BUNDLE_NAME.to_string(),
                    price: candidate.price,
                    quantity: 1,
                    category: "pc-build".to_string(),
                    is_bundle: true,
                }
            } else {
                PurchaseDraft {
                    id: context
                        .product_id
                        .clone()
                        .unwrap_or_else(|| slug(&candidate.name)),
                    name: candidate.name,
                    price: candidate.price,
                    quantity: 1,
                    category: context
                        .product_category
                        .clone()
                        .unwrap_or_else(|| "general".to_string()),
                    is_bundle: false,
                }
            };
        }
    }

    PurchaseDraft {
        id: context.product_id.clone().unwrap_or_else(|| "unknown".to_string()),
        name: context
            .product_name
            .clone()
            .unwrap_or_else(|| "Selected product".to_string()),
        price: 0.0,
        quantity: 1,
        category: context
            .product_category
            .clone()
            .unwrap_or_else(|| "general".to_string()),
        is_bundle: false,
    }
}

/// Run the heuristic chain over one assistant turn.
fn candidate_from_text(text: &str) -> Option<Candidate> {
    let lines: Vec<&str> = text.lines().collect();

    // Most specific first: an explicit total line.
    let total = lines.iter().enumerate().find_map(|(idx, line)| {
        let captures = TOTAL_LINE.captures(line)?;
        let price: f64 = captures[1].parse().ok()?;
        Some((idx, price))
    });

    if let Some((total_idx, total_price)) = total {
        // Two differently-typed component bullets make this a build.
        let bullets: Vec<&str> = lines.iter().copied().filter(|l| l.contains('•')).collect();
        if bullets.len() > 1 {
            let mentions = |needle: &str| bullets.iter().any(|l| l.to_lowercase().contains(needle));
            if mentions("cpu") && mentions("gpu") {
                return Some(Candidate {
                    name: BUNDLE_NAME.to_string(),
                    price: total_price,
                    is_bundle: true,
                });
            }
        }

        // A single `<name>: <price> <currency>` line names the item; the
        // price is still the stated total.
        if let Some(name) = first_named_price(text) {
            return Some(Candidate {
                name,
                price: total_price,
                is_bundle: false,
            });
        }

        // Last resort: a bulleted line directly above the total.
        if total_idx > 0 {
            let prev = lines[total_idx - 1];
            if prev.contains('•') {
                let name = clean_name(prev.split(':').next().unwrap_or(prev));
                if !name.is_empty() {
                    return Some(Candidate {
                        name,
                        price: total_price,
                        is_bundle: false,
                    });
                }
            }
        }

        return None;
    }

    // No total: fall back to any bare price.
    let price_match = BARE_PRICE.captures(text)?;
    let price: f64 = price_match[1].parse().ok()?;
    let price_start = price_match.get(0).expect("whole match").start();

    let name = first_named_price(text)
        .or_else(|| preceding_line_name(text, price_start))
        .or_else(|| trailing_tokens_name(text, price_start))?;

    Some(Candidate {
        name,
        price,
        is_bundle: false,
    })
}

/// First `<name>: <price> <currency>` match whose name is not the total
/// line itself.
fn first_named_price(text: &str) -> Option<String> {
    NAME_PRICE.captures_iter(text).find_map(|captures| {
        let name = clean_name(captures.get(1)?.as_str());
        if name.is_empty() || name.eq_ignore_ascii_case("total") {
            None
        } else {
            Some(name)
        }
    })
}

/// Nearest non-empty line above the price match, skipping total and
/// bulleted lines.
fn preceding_line_name(text: &str, price_start: usize) -> Option<String> {
    let price_line = text[..price_start].bytes().filter(|&b| b == b'\n').count();
    text.lines()
        .take(price_line)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(str::trim)
        .find(|line| {
            !line.is_empty() && !line.contains('•') && !line.to_lowercase().contains("total")
        })
        .map(String::from)
}

/// The last three whitespace-delimited tokens before the price match.
fn trailing_tokens_name(text: &str, price_start: usize) -> Option<String> {
    let tokens: Vec<&str> = text[..price_start].split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }
    let start = tokens.len().saturating_sub(3);
    Some(tokens[start..].join(" "))
}

/// Strip the bullet marker and tidy whitespace.
fn clean_name(raw: &str) -> String {
    raw.trim().trim_start_matches('•').trim().to_string()
}

/// Filesystem- and key-safe identifier derived from a product name.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}
