//! Wire types for the remote assistant exchange

use serde::{Deserialize, Serialize};

/// Fixed reply when the response carries none of the known text fields.
pub const APOLOGY_REPLY: &str = "I apologize, but I could not process your request.";

/// Per-message product context, derived from props or the current route;
/// recomputed on every send, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub product_category: Option<String>,
}

impl ConversationContext {
    /// Context for a specific product
    pub fn for_product(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            product_id: Some(id.into()),
            product_name: Some(name.into()),
            product_category: Some(category.into()),
        }
    }

    /// Prefix `question` with a one-line statement of the product being
    /// viewed. Without a product id the question passes through untouched.
    pub fn contextual_question(&self, question: &str) -> String {
        let Some(ref id) = self.product_id else {
            return question.to_string();
        };
        let mut prefix = format!("The user is viewing product {}", id);
        if let Some(ref name) = self.product_name {
            prefix.push_str(&format!(" ({})", name));
        }
        if let Some(ref category) = self.product_category {
            prefix.push_str(&format!(" in the {} category", category));
        }
        format!("{}. {}", prefix, question)
    }
}

/// History roles in the endpoint's wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRole {
    #[serde(rename = "userMessage")]
    UserMessage,
    #[serde(rename = "apiMessage")]
    ApiMessage,
}

/// One prior turn as the endpoint expects it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: HistoryRole,
    pub content: String,
}

/// POST body for one prediction exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub question: String,
    pub history: Vec<HistoryMessage>,
}

/// Pull the reply text out of an untyped response.
///
/// Fields are checked in fixed priority order: `answer`, then `text`, then
/// `response`. When none is present the apology string stands in.
pub fn reply_text(body: &serde_json::Value) -> String {
    for field in ["answer", "text", "response"] {
        if let Some(text) = body.get(field).and_then(|v| v.as_str()) {
            return text.to_string();
        }
    }
    APOLOGY_REPLY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contextual_question_full_context() {
        let ctx = ConversationContext::for_product("cpu-7800x3d", "Ryzen 7 7800X3D", "processors");
        assert_eq!(
            ctx.contextual_question("Is it good for gaming?"),
            "The user is viewing product cpu-7800x3d (Ryzen 7 7800X3D) in the processors category. Is it good for gaming?"
        );
    }

    #[test]
    fn test_contextual_question_id_only() {
        let ctx = ConversationContext {
            product_id: Some("gpu-4070".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ctx.contextual_question("price?"),
            "The user is viewing product gpu-4070. price?"
        );
    }

    #[test]
    fn test_contextual_question_without_product_passes_through() {
        let ctx = ConversationContext::default();
        assert_eq!(ctx.contextual_question("hello"), "hello");
    }

    #[test]
    fn test_history_role_wire_names() {
        let msg = HistoryMessage {
            role: HistoryRole::UserMessage,
            content: "hi".to_string(),
        };
        let raw = serde_json::to_string(&msg).unwrap();
        assert!(raw.contains("\"role\":\"userMessage\""));

        let msg = HistoryMessage {
            role: HistoryRole::ApiMessage,
            content: "hello".to_string(),
        };
        let raw = serde_json::to_string(&msg).unwrap();
        assert!(raw.contains("\"role\":\"apiMessage\""));
    }

    #[test]
    fn test_reply_text_priority_order() {
        let body = json!({"response": "c", "text": "b", "answer": "a"});
        assert_eq!(reply_text(&body), "a");

        let body = json!({"response": "c", "text": "b"});
        assert_eq!(reply_text(&body), "b");

        let body = json!({"response": "c"});
        assert_eq!(reply_text(&body), "c");
    }

    #[test]
    fn test_reply_text_fallback_apology() {
        let body = json!({"something": "else"});
        assert_eq!(reply_text(&body), APOLOGY_REPLY);

        // Non-string fields do not count.
        let body = json!({"answer": 42});
        assert_eq!(reply_text(&body), APOLOGY_REPLY);
    }
}
