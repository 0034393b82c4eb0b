//! Message, payload and receipt types shared by every provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider-specific wire shape built from a [`Message`] for one send.
///
/// Field names differ per provider; the map lives only for the duration of
/// a single `send` call.
pub type Payload = Map<String, Value>;

/// Message content. A send carries exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Body {
    Text(String),
    Html(String),
}

impl Body {
    pub fn content(&self) -> &str {
        match self {
            Body::Text(content) | Body::Html(content) => content,
        }
    }

    /// Field name used in validation errors and form payloads
    pub fn field(&self) -> &'static str {
        match self {
            Body::Text(_) => "text",
            Body::Html(_) => "html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Body::Text(_) => "text/plain",
            Body::Html(_) => "text/html",
        }
    }
}

/// The email being assembled by a [`Mailer`](super::Mailer).
///
/// Nothing is validated on assignment; empty strings are treated as absent
/// when the provider validates the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub recipient: Option<String>,
    pub sender: String,
    pub subject: Option<String>,
    pub body: Option<Body>,
}

impl Message {
    /// Empty message with the configured default sender
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            recipient: None,
            sender: sender.into(),
            subject: None,
            body: None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Some(Body::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn html(&self) -> Option<&str> {
        match &self.body {
            Some(Body::Html(html)) => Some(html),
            _ => None,
        }
    }
}

/// Outcome marker of a successful send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
}

/// Normalized result of a successful send, independent of the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub status: DeliveryStatus,
    /// Identifier of the provider that accepted the message
    pub provider: String,
    /// Backend-assigned id, or a generated one when the backend returns none
    pub message_id: String,
}

impl SendReceipt {
    pub fn sent(provider: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Sent,
            provider: provider.into(),
            message_id: message_id.into(),
        }
    }

    /// Receipt for backends that accept a message without returning an id
    pub fn sent_with_generated_id(provider: impl Into<String>) -> Self {
        Self::sent(provider, uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_receipt_serializes_normalized_shape() {
        let receipt = SendReceipt::sent("sendgrid", "abc-123");
        assert_eq!(
            serde_json::to_value(&receipt).unwrap(),
            json!({"status": "sent", "provider": "sendgrid", "message_id": "abc-123"})
        );
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = SendReceipt::sent_with_generated_id("sendgrid");
        let b = SendReceipt::sent_with_generated_id("sendgrid");
        assert!(!a.message_id.is_empty());
        assert_ne!(a.message_id, b.message_id);
    }

    #[test]
    fn test_body_accessors() {
        let mut message = Message::new("noreply@example.com");
        assert_eq!(message.text(), None);

        message.body = Some(Body::Html("<p>Hi</p>".to_string()));
        assert_eq!(message.html(), Some("<p>Hi</p>"));
        assert_eq!(message.text(), None);
        assert_eq!(message.body.as_ref().unwrap().mime_type(), "text/html");
        assert_eq!(message.body.as_ref().unwrap().field(), "html");
    }
}
