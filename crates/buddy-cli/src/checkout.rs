//! Purchase form flow
//!
//! Turns a purchase draft into a confirmed order: validates the mock payment
//! fields, synthesizes an order id, persists the order with the card masked
//! to its last four digits, and clears the cart. Payment is simulated; the
//! full card number never reaches storage.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use thiserror::Error;

use buddy_assistant::PurchaseDraft;
use buddy_store::{CartStore, Order, OrderLine, OrderStatus, OrderStore, PaymentRecord};

/// `MM/YY` with the month in 01..=12.
static EXPIRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid expiry pattern"));

/// RFC-shaped email: something@something.something, no whitespace.
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Errors that block order creation
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// One or more payment fields failed validation
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The draft price was never resolved to a positive value
    #[error("order price must be positive before submission")]
    MissingPrice,

    /// Persisting the order failed
    #[error(transparent)]
    Store(#[from] buddy_store::Error),
}

/// Mock payment fields collected from the buyer
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub cardholder_name: String,
    pub email: String,
}

/// Validate the payment fields, collecting every failure.
pub fn validate_payment(form: &PaymentForm) -> Vec<String> {
    let mut errors = Vec::new();

    let digits: String = form.card_number.chars().filter(|c| !c.is_whitespace()).collect();
    if !(13..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        errors.push("invalid card number".to_string());
    }

    if !EXPIRY.is_match(form.expiry.trim()) {
        errors.push("invalid expiry date (use MM/YY)".to_string());
    }

    let cvv = form.cvv.trim();
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        errors.push("invalid CVV".to_string());
    }

    if form.cardholder_name.trim().is_empty() {
        errors.push("cardholder name is required".to_string());
    }

    if !EMAIL.is_match(form.email.trim()) {
        errors.push("invalid email address".to_string());
    }

    errors
}

/// Card brand from the leading digits
pub fn card_brand(card_number: &str) -> &'static str {
    let digits: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
    match digits.chars().next() {
        Some('4') => "Visa",
        Some('5') | Some('2') => "Mastercard",
        Some('3') => "American Express",
        _ => "Unknown",
    }
}

/// Synthesize a unique order id: `ORD_{epoch-millis}_{6 uppercase alnum}`.
pub fn generate_order_id() -> String {
    let entropy: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("ORD_{}_{}", Utc::now().timestamp_millis(), entropy)
}

/// Create and persist a confirmed order from a resolved draft.
///
/// The draft price must already be positive: the extractor's fallback path
/// cannot always recover one, and a priceless order must not exist.
pub fn place_order(
    draft: &PurchaseDraft,
    form: &PaymentForm,
    orders: &OrderStore,
    cart: &CartStore,
) -> Result<Order, CheckoutError> {
    let errors = validate_payment(form);
    if !errors.is_empty() {
        return Err(CheckoutError::Validation(errors));
    }

    if draft.price <= 0.0 {
        return Err(CheckoutError::MissingPrice);
    }

    let digits: String = form.card_number.chars().filter(|c| !c.is_whitespace()).collect();
    let last_four = digits[digits.len() - 4..].to_string();

    let mut order = Order {
        order_id: generate_order_id(),
        status: OrderStatus::Pending,
        total_price: draft.price * draft.quantity as f64,
        items: vec![OrderLine {
            id: draft.id.clone(),
            name: draft.name.clone(),
            price: draft.price,
            quantity: draft.quantity,
            category: draft.category.clone(),
            is_bundle: draft.is_bundle,
        }],
        payment: PaymentRecord {
            method: card_brand(&form.card_number).to_string(),
            last_four_digits: last_four,
        },
        created_at: Utc::now(),
    };

    // Staged while the (simulated) payment runs, then promoted.
    orders.stage_pending(&order)?;

    order.status = OrderStatus::Confirmed;
    orders.put(&order)?;
    orders.update_pending_status(&order.order_id, OrderStatus::Confirmed)?;
    cart.clear()?;

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn valid_form() -> PaymentForm {
        PaymentForm {
            card_number: "4111111111111111".to_string(),
            expiry: "12/25".to_string(),
            cvv: "123".to_string(),
            cardholder_name: "Lina Haddad".to_string(),
            email: "lina@example.com".to_string(),
        }
    }

    fn draft(price: f64) -> PurchaseDraft {
        PurchaseDraft {
            id: "gpu-4070".to_string(),
            name: "RTX 4070".to_string(),
            price,
            quantity: 1,
            category: "graphics-cards".to_string(),
            is_bundle: false,
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_payment(&valid_form()).is_empty());
    }

    #[test]
    fn test_card_number_length_bounds() {
        let mut form = valid_form();
        form.card_number = "123".to_string();
        assert!(validate_payment(&form).iter().any(|e| e.contains("card number")));

        form.card_number = "4111 1111 1111 1111".to_string();
        assert!(validate_payment(&form).is_empty());

        form.card_number = "12345678901234567890".to_string(); // 20 digits
        assert!(!validate_payment(&form).is_empty());
    }

    #[test]
    fn test_expiry_month_must_be_real() {
        let mut form = valid_form();
        form.expiry = "13/25".to_string();
        assert!(validate_payment(&form).iter().any(|e| e.contains("expiry")));

        form.expiry = "00/25".to_string();
        assert!(!validate_payment(&form).is_empty());

        form.expiry = "12/25".to_string();
        assert!(validate_payment(&form).is_empty());
    }

    #[test]
    fn test_cvv_and_name_and_email() {
        let mut form = valid_form();
        form.cvv = "12".to_string();
        form.cardholder_name = "  ".to_string();
        form.email = "not-an-email".to_string();

        let errors = validate_payment(&form);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_card_brands() {
        assert_eq!(card_brand("4111111111111111"), "Visa");
        assert_eq!(card_brand("5500000000000004"), "Mastercard");
        assert_eq!(card_brand("2221000000000009"), "Mastercard");
        assert_eq!(card_brand("340000000000009"), "American Express");
        assert_eq!(card_brand("6011000000000004"), "Unknown");
    }

    #[test]
    fn test_order_id_shape() {
        let id = generate_order_id();
        assert!(id.starts_with("ORD_"));
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 6);

        // Two consecutive ids never collide.
        assert_ne!(generate_order_id(), generate_order_id());
    }

    #[test]
    fn test_place_order_persists_masked_and_clears_cart() {
        let kv = Arc::new(MemoryStore::new());
        let orders = OrderStore::new(kv.clone());
        let cart = CartStore::new(kv.clone());
        cart.add(buddy_store::CartItem {
            id: "gpu-4070".to_string(),
            name: "RTX 4070".to_string(),
            price: 899.99,
            quantity: 1,
            category: "graphics-cards".to_string(),
        })
        .unwrap();

        let order = place_order(&draft(899.99), &valid_form(), &orders, &cart).unwrap();

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.total_price, 899.99);
        assert_eq!(order.payment.method, "Visa");
        assert_eq!(order.payment.last_four_digits, "1111");

        // Exactly one order entry, masked in the persisted record.
        let raw = kv.get(&format!("order_{}", order.order_id)).unwrap();
        assert!(!raw.contains("4111111111111111"));
        assert!(raw.contains("\"last_four_digits\":\"1111\""));

        // The cart key is gone.
        assert!(cart.items().is_empty());
        assert!(kv.get("cart").is_none());

        // The staged entry tracked the confirmation.
        assert_eq!(
            orders.pending()[&order.order_id].status,
            OrderStatus::Confirmed
        );
    }

    #[test]
    fn test_zero_price_blocks_submission() {
        let kv = Arc::new(MemoryStore::new());
        let orders = OrderStore::new(kv.clone());
        let cart = CartStore::new(kv.clone());

        let result = place_order(&draft(0.0), &valid_form(), &orders, &cart);
        assert!(matches!(result, Err(CheckoutError::MissingPrice)));

        // Nothing was persisted.
        assert!(orders.get("ORD_anything").is_none());
    }

    #[test]
    fn test_invalid_form_blocks_submission() {
        let kv = Arc::new(MemoryStore::new());
        let orders = OrderStore::new(kv.clone());
        let cart = CartStore::new(kv.clone());

        let mut form = valid_form();
        form.card_number = "123".to_string();

        match place_order(&draft(899.99), &form, &orders, &cart) {
            Err(CheckoutError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("card number")));
            }
            other => panic!("expected validation failure, got {:?}", other.map(|o| o.order_id)),
        }
    }
}
