//! Remote assistant client
//!
//! One request per user message. The transport is a trait so tests can stub
//! the exchange; production uses [`HttpTransport`] over reqwest.

use std::sync::Arc;

use async_trait::async_trait;

use buddy_store::{ChatRole, ChatTurn, ConversationStore};

use crate::error::{Error, Result};
use crate::types::{
    ConversationContext, HistoryMessage, HistoryRole, PredictionRequest, reply_text,
};

/// Fixed assistant turn appended when an exchange fails, so the transcript
/// never shows a user message without a response slot.
pub const ERROR_REPLY: &str = "I apologize, but I encountered an error. Please try again later.";

/// Where the hosted assistant lives
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub base_url: String,
    pub chatflow_id: String,
    pub api_key: String,
}

impl Endpoint {
    /// Create an endpoint description
    pub fn new(
        base_url: impl Into<String>,
        chatflow_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            chatflow_id: chatflow_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Full prediction URL for this endpoint
    pub fn prediction_url(&self) -> String {
        format!(
            "{}/api/v1/prediction/{}",
            self.base_url.trim_end_matches('/'),
            self.chatflow_id
        )
    }
}

/// A single request/response exchange with the remote assistant.
#[async_trait]
pub trait AssistantTransport: Send + Sync {
    /// Perform one exchange and return the untyped response body.
    async fn exchange(&self, request: &PredictionRequest) -> Result<serde_json::Value>;
}

/// HTTP transport over reqwest
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    /// Create a transport for the given endpoint
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl AssistantTransport for HttpTransport {
    async fn exchange(&self, request: &PredictionRequest) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(self.endpoint.prediction_url())
            .header("Content-Type", "application/json")
            .header("X-API-KEY", &self.endpoint.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::api(status.as_u16(), body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Client for the remote assistant: builds the contextual request, performs
/// the exchange, normalizes the reply, and keeps the conversation store
/// consistent on both success and failure.
pub struct AssistantClient {
    transport: Arc<dyn AssistantTransport>,
    store: Arc<ConversationStore>,
}

impl AssistantClient {
    /// Create a client over a transport and the shared conversation store
    pub fn new(transport: Arc<dyn AssistantTransport>, store: Arc<ConversationStore>) -> Self {
        Self { transport, store }
    }

    /// Send one user message and return the normalized reply text.
    ///
    /// The user turn is persisted before the network call, so a failed call
    /// still shows the user's own message. Any transport or parse failure
    /// appends [`ERROR_REPLY`] as the assistant turn before propagating.
    pub async fn send(&self, user_text: &str, context: &ConversationContext) -> Result<String> {
        let prior = self.store.read_all();
        self.store.append(ChatTurn::user(user_text))?;

        let request = build_request(user_text, &prior, context);

        match self.transport.exchange(&request).await {
            Ok(body) => {
                let reply = reply_text(&body);
                self.store.append(ChatTurn::assistant(&reply))?;
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!("assistant exchange failed: {}", e);
                self.store.append(ChatTurn::assistant(ERROR_REPLY))?;
                Err(e)
            }
        }
    }
}

/// Assemble the prediction request for one user message.
///
/// Prior turns are rendered as `User:` / `Assistant:` lines prepended to the
/// question, because the endpoint does not reliably honor the separate
/// history field; the structured field is still sent alongside.
fn build_request(
    user_text: &str,
    prior: &[ChatTurn],
    context: &ConversationContext,
) -> PredictionRequest {
    let contextual = context.contextual_question(user_text);

    let question = if prior.is_empty() {
        contextual
    } else {
        let rendered: Vec<String> = prior
            .iter()
            .map(|turn| match turn.role {
                ChatRole::User => format!("User: {}", turn.text),
                ChatRole::Assistant => format!("Assistant: {}", turn.text),
            })
            .collect();
        format!("{}\n{}", rendered.join("\n"), contextual)
    };

    let history = prior
        .iter()
        .map(|turn| HistoryMessage {
            role: match turn.role {
                ChatRole::User => HistoryRole::UserMessage,
                ChatRole::Assistant => HistoryRole::ApiMessage,
            },
            content: turn.text.clone(),
        })
        .collect();

    PredictionRequest { question, history }
}
