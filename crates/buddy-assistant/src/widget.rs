//! Chat widget controller
//!
//! Orchestrates one widget instance: submission with a cooperative in-flight
//! guard, transcript access, and the purchase-draft affordance. Rendering
//! and open/close state belong to the host UI.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use buddy_store::{ChatTurn, ConversationStore};

use crate::client::AssistantClient;
use crate::error::Result;
use crate::extract::{EXTRACTOR_WINDOW, PurchaseDraft, extract_purchase_draft};
use crate::interpret::{Reply, interpret};
use crate::types::ConversationContext;

/// One chat widget instance over a shared conversation store.
pub struct ChatWidget {
    client: AssistantClient,
    store: Arc<ConversationStore>,
    in_flight: AtomicBool,
}

impl ChatWidget {
    /// Create a widget. The client and widget must share the same store.
    pub fn new(client: AssistantClient, store: Arc<ConversationStore>) -> Self {
        Self {
            client,
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submit one user message and interpret the reply.
    ///
    /// Returns `Ok(None)` for blank input, and for a submission attempted
    /// while a prior send is still outstanding (a no-op, not an error and
    /// not a queue). Errors carry the transport/parse failure; the apology
    /// turn is already in the transcript by then.
    pub async fn submit(
        &self,
        text: &str,
        context: &ConversationContext,
    ) -> Result<Option<Reply>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("submission ignored: a send is already outstanding");
            return Ok(None);
        }

        let result = self.client.send(text, context).await;
        self.in_flight.store(false, Ordering::SeqCst);

        result.map(|reply| Some(interpret(&reply)))
    }

    /// Whether a send is currently outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// The full retained transcript, re-read from the store.
    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.store.read_all()
    }

    /// Run purchase-intent extraction over the trailing turn window.
    pub fn purchase_draft(&self, context: &ConversationContext) -> PurchaseDraft {
        extract_purchase_draft(&self.store.last(EXTRACTOR_WINDOW), context)
    }

    /// Empty the conversation store.
    pub fn clear(&self) -> Result<()> {
        self.store.clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AssistantTransport, ERROR_REPLY};
    use crate::types::PredictionRequest;
    use async_trait::async_trait;
    use buddy_store::MemoryStore;
    use serde_json::json;
    use std::time::Duration;

    /// Transport that answers after a delay, for in-flight tests.
    struct SlowTransport {
        reply: serde_json::Value,
        delay: Duration,
    }

    #[async_trait]
    impl AssistantTransport for SlowTransport {
        async fn exchange(&self, _request: &PredictionRequest) -> Result<serde_json::Value> {
            tokio::time::sleep(self.delay).await;
            Ok(self.reply.clone())
        }
    }

    fn widget_with(transport: Arc<dyn AssistantTransport>) -> ChatWidget {
        let store = Arc::new(ConversationStore::new(Arc::new(MemoryStore::new())));
        let client = AssistantClient::new(transport, store.clone());
        ChatWidget::new(client, store)
    }

    fn fast_widget(reply: serde_json::Value) -> ChatWidget {
        widget_with(Arc::new(SlowTransport {
            reply,
            delay: Duration::ZERO,
        }))
    }

    #[tokio::test]
    async fn test_submit_returns_interpreted_reply() {
        let widget = fast_widget(json!({"answer": "A | B\n---|---\n1 | 2"}));

        let reply = widget
            .submit("compare them", &ConversationContext::default())
            .await
            .unwrap()
            .unwrap();

        match reply {
            Reply::Table(rows) => assert_eq!(rows.len(), 2),
            other => panic!("expected table, got {:?}", other),
        }
        assert_eq!(widget.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_input_is_a_noop() {
        let widget = fast_widget(json!({"answer": "hi"}));
        assert!(widget.submit("   ", &ConversationContext::default()).await.unwrap().is_none());
        assert!(widget.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_second_submission_while_outstanding_is_a_noop() {
        let widget = Arc::new(widget_with(Arc::new(SlowTransport {
            reply: json!({"answer": "done"}),
            delay: Duration::from_millis(50),
        })));

        let ctx = ConversationContext::default();
        let (first, second) = tokio::join!(
            widget.submit("first", &ctx),
            widget.submit("second", &ctx),
        );

        assert!(first.unwrap().is_some());
        assert!(second.unwrap().is_none());

        // Only the accepted submission reached the transcript.
        let turns = widget.transcript();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].text, "first");
    }

    #[tokio::test]
    async fn test_guard_clears_after_failure() {
        struct FailingTransport;

        #[async_trait]
        impl AssistantTransport for FailingTransport {
            async fn exchange(&self, _request: &PredictionRequest) -> Result<serde_json::Value> {
                Err(crate::error::Error::api(500, "boom"))
            }
        }

        let widget = widget_with(Arc::new(FailingTransport));
        let ctx = ConversationContext::default();

        assert!(widget.submit("hello", &ctx).await.is_err());
        assert!(!widget.is_busy());

        // The widget stays usable and the apology turn is in place.
        let turns = widget.transcript();
        assert_eq!(turns[1].text, ERROR_REPLY);

        let widget2 = fast_widget(json!({"answer": "recovered"}));
        assert!(widget2.submit("again", &ctx).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purchase_draft_reads_trailing_window() {
        let widget = fast_widget(json!({"answer": "RTX 4070: 899.99 JOD\nTotal: 899.99 JOD"}));
        let ctx = ConversationContext::default();
        widget.submit("price?", &ctx).await.unwrap();

        let draft = widget.purchase_draft(&ctx);
        assert_eq!(draft.name, "RTX 4070");
        assert_eq!(draft.price, 899.99);
    }

    #[tokio::test]
    async fn test_clear_empties_transcript() {
        let widget = fast_widget(json!({"answer": "hello"}));
        widget.submit("hi", &ConversationContext::default()).await.unwrap();
        widget.clear().unwrap();
        assert!(widget.transcript().is_empty());
    }
}
