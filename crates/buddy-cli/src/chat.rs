//! Interactive chat loop
//!
//! The terminal counterpart of the embedded widget: reads one line per turn,
//! shows the interpreted reply, and hands purchase-form replies to the
//! payment flow. A transport failure prints a transient banner; the apology
//! turn is already in the transcript by the time the error surfaces here.

use std::io::{self, Write};

use buddy_assistant::{ChatWidget, ConversationContext, Reply};
use buddy_store::{CartStore, OrderStore};

use crate::checkout::{self, CheckoutError, PaymentForm};
use crate::ui;

/// Run the chat loop until `/quit` or end of input.
pub async fn run_chat(
    widget: &ChatWidget,
    context: &ConversationContext,
    orders: &OrderStore,
    cart: &CartStore,
    currency: &str,
) -> anyhow::Result<()> {
    let transcript = widget.transcript();
    if transcript.is_empty() {
        println!("Hi! I'm TechBuddy, your AI assistant!");
        println!("I can help with product specifications, compatibility, and recommendations.");
    } else {
        print!("{}", ui::format_transcript(&transcript));
    }
    println!("Type /quit to leave, /clear to reset the conversation.");

    loop {
        let Some(line) = prompt("> ")? else { break };
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                widget.clear()?;
                println!("Conversation cleared.");
                continue;
            }
            _ => {}
        }

        println!("TechBuddy is thinking...");
        match widget.submit(line, context).await {
            Ok(Some(reply)) => {
                print!("{}", ui::format_reply(&reply));
                if matches!(reply, Reply::PurchaseForm { .. }) {
                    run_purchase_flow(widget, context, orders, cart, currency)?;
                }
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("Error: failed to get a response from the assistant ({})", e);
            }
        }
    }

    Ok(())
}

/// Collect payment details for the extracted draft and confirm the order.
fn run_purchase_flow(
    widget: &ChatWidget,
    context: &ConversationContext,
    orders: &OrderStore,
    cart: &CartStore,
    currency: &str,
) -> anyhow::Result<()> {
    let Some(answer) = prompt("Complete the purchase now? [y/N] ")? else {
        return Ok(());
    };
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(());
    }

    let mut draft = widget.purchase_draft(context);
    println!(
        "Purchase summary: {} x{} - {}",
        draft.name,
        draft.quantity,
        ui::format_price(draft.price, currency)
    );

    if draft.needs_price() {
        let Some(raw) = prompt("No price could be determined. Enter one (blank to cancel): ")?
        else {
            return Ok(());
        };
        let raw = raw.trim();
        if raw.is_empty() {
            println!("Purchase cancelled.");
            return Ok(());
        }
        match raw.parse::<f64>() {
            Ok(price) if price > 0.0 => draft.price = price,
            _ => {
                println!("Not a positive price; purchase cancelled.");
                return Ok(());
            }
        }
    }

    loop {
        let form = match read_payment_form()? {
            Some(form) => form,
            None => {
                println!("Purchase cancelled.");
                return Ok(());
            }
        };

        match checkout::place_order(&draft, &form, orders, cart) {
            Ok(order) => {
                print!("{}", ui::format_order(&order, currency));
                return Ok(());
            }
            Err(CheckoutError::Validation(errors)) => {
                println!("Please correct the following: {}", errors.join(", "));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Prompt for the payment fields. Returns `None` if the buyer backs out by
/// leaving the card number blank (or on end of input).
fn read_payment_form() -> io::Result<Option<PaymentForm>> {
    let Some(card_number) = prompt("Card number: ")? else {
        return Ok(None);
    };
    if card_number.trim().is_empty() {
        return Ok(None);
    }

    let mut form = PaymentForm {
        card_number,
        ..Default::default()
    };
    form.expiry = prompt("Expiry (MM/YY): ")?.unwrap_or_default();
    form.cvv = prompt("CVV: ")?.unwrap_or_default();
    form.cardholder_name = prompt("Cardholder name: ")?.unwrap_or_default();
    form.email = prompt("Email: ")?.unwrap_or_default();

    Ok(Some(form))
}

/// Read one line from stdin. `None` on end of input.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end().to_string()))
}
