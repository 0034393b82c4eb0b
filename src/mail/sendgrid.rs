//! SendGrid provider.
//!
//! Sends through the v3 mail send API as JSON with a bearer key. Without a
//! live key the simulated SendGrid backend answers instead.

use serde_json::{Value, json};
use tracing::warn;

use super::message::{Message, Payload, SendReceipt};
use super::provider::EmailProvider;
use super::validation;
use crate::config::{LengthLimits, SendGridSettings};
use crate::error::{MailError, MailResult};
use crate::external::simulated::sendgrid_backend;
use crate::external::{JsonTransport, SimulatedTransport, Transport};

const DISPLAY_NAME: &str = "SendGrid";

/// SendGrid email provider
pub struct SendGridProvider {
    limits: LengthLimits,
    transport: Box<dyn Transport>,
}

impl SendGridProvider {
    pub const NAME: &'static str = "sendgrid";

    /// Creates a provider from settings, choosing the live or simulated backend.
    pub fn new(settings: &SendGridSettings) -> Self {
        let transport: Box<dyn Transport> = if settings.uses_live_backend() {
            Box::new(JsonTransport::new(
                DISPLAY_NAME,
                &settings.api_url,
                &settings.api_key,
            ))
        } else {
            warn!(
                provider = Self::NAME,
                "No live SendGrid key configured or simulation forced, using simulated backend"
            );
            Box::new(
                SimulatedTransport::new(DISPLAY_NAME, sendgrid_backend)
                    .with_credential("api_key", &settings.api_key),
            )
        };

        Self {
            limits: settings.limits,
            transport,
        }
    }

    /// Creates a provider with an explicit transport
    pub fn with_transport(limits: LengthLimits, transport: impl Transport + 'static) -> Self {
        Self {
            limits,
            transport: Box::new(transport),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.transport.is_simulated()
    }
}

impl EmailProvider for SendGridProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, message: &Message) -> MailResult<()> {
        validation::validate_message(Self::NAME, &self.limits, message)
    }

    /// `personalizations[0].to[0].email`, `from.email`, `subject` and a
    /// single `content` entry typed by MIME.
    fn build_payload(&self, message: &Message) -> Payload {
        let recipient = message.recipient.as_deref().unwrap_or_default();
        let subject = message.subject.as_deref().unwrap_or_default();
        let content: Vec<Value> = message
            .body
            .iter()
            .map(|body| json!({"type": body.mime_type(), "value": body.content()}))
            .collect();

        let mut payload = Payload::new();
        payload.insert(
            "personalizations".to_string(),
            json!([{"to": [{"email": recipient}]}]),
        );
        payload.insert("from".to_string(), json!({"email": message.sender}));
        payload.insert("subject".to_string(), json!(subject));
        payload.insert("content".to_string(), Value::Array(content));
        payload
    }

    fn transmit(&self, payload: &Payload) -> MailResult<Value> {
        self.transport.post(payload)
    }

    /// An `errors` list means failure. An empty body, or a queued first
    /// message, means success.
    fn interpret(&self, response: Value) -> MailResult<SendReceipt> {
        if let Some(errors) = response
            .get("errors")
            .and_then(Value::as_array)
            .filter(|errors| !errors.is_empty())
        {
            let detail = errors[0]
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown SendGrid API error.");
            return Err(MailError::provider_api(DISPLAY_NAME, detail));
        }

        match &response {
            Value::Null => return Ok(SendReceipt::sent_with_generated_id(Self::NAME)),
            Value::Object(map) if map.is_empty() => {
                return Ok(SendReceipt::sent_with_generated_id(Self::NAME));
            }
            _ => {}
        }

        if let Some(first) = response.pointer("/messages/0")
            && first.get("status").and_then(Value::as_str) == Some("queued")
        {
            return Ok(match first.get("id").and_then(Value::as_str) {
                Some(id) if !id.is_empty() => SendReceipt::sent(Self::NAME, id),
                _ => SendReceipt::sent_with_generated_id(Self::NAME),
            });
        }

        Err(MailError::provider_api(
            DISPLAY_NAME,
            format!("unexpected response: {response}"),
        ))
    }
}
