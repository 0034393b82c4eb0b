//! Mailgun provider.
//!
//! Posts a flat form to `{base}{domain}/messages` with basic auth. Without a
//! live key the simulated Mailgun backend answers instead.

use serde_json::{Value, json};
use tracing::warn;

use super::message::{Message, Payload, SendReceipt};
use super::provider::EmailProvider;
use super::validation;
use crate::config::{LengthLimits, MailgunSettings};
use crate::error::{MailError, MailResult};
use crate::external::simulated::mailgun_backend;
use crate::external::{FormTransport, SimulatedTransport, Transport};

const DISPLAY_NAME: &str = "Mailgun";

/// Acknowledgement Mailgun returns for an accepted message
const QUEUED_ACK: &str = "Queued. Thank you.";

pub struct MailgunProvider {
    limits: LengthLimits,
    transport: Box<dyn Transport>,
}

impl MailgunProvider {
    pub const NAME: &'static str = "mailgun";

    /// Creates a provider from settings, choosing the live or simulated backend.
    pub fn new(settings: &MailgunSettings) -> Self {
        let transport: Box<dyn Transport> = if settings.uses_live_backend() {
            Box::new(FormTransport::new(
                DISPLAY_NAME,
                settings.messages_url(),
                &settings.api_key,
            ))
        } else {
            warn!(
                provider = Self::NAME,
                "No live Mailgun key configured or simulation forced, using simulated backend"
            );
            Box::new(
                SimulatedTransport::new(DISPLAY_NAME, mailgun_backend)
                    .with_credential("auth_key", &settings.api_key),
            )
        };

        Self {
            limits: settings.limits,
            transport,
        }
    }

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

impl EmailProvider for MailgunProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, message: &Message) -> MailResult<()> {
        validation::validate_message(Self::NAME, &self.limits, message)
    }

    fn build_payload(&self, message: &Message) -> Payload {
        let mut payload = Payload::new();
        payload.insert("from".to_string(), json!(message.sender));
        payload.insert(
            "to".to_string(),
            json!(message.recipient.as_deref().unwrap_or_default()),
        );
        payload.insert(
            "subject".to_string(),
            json!(message.subject.as_deref().unwrap_or_default()),
        );
        if let Some(body) = &message.body {
            payload.insert(body.field().to_string(), json!(body.content()));
        }
        payload
    }

    fn transmit(&self, payload: &Payload) -> MailResult<Value> {
        self.transport.post(payload)
    }

    fn interpret(&self, response: Value) -> MailResult<SendReceipt> {
        let message = response.get("message").and_then(Value::as_str);

        if message == Some(QUEUED_ACK)
            && let Some(id) = response.get("id").and_then(Value::as_str)
        {
            return Ok(SendReceipt::sent(Self::NAME, id));
        }

        if response.get("status").and_then(Value::as_str) == Some("failed") {
            return Err(MailError::provider_api(
                DISPLAY_NAME,
                message.unwrap_or("Unknown Mailgun API error."),
            ));
        }

        Err(MailError::provider_api(
            DISPLAY_NAME,
            format!("unexpected response: {response}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::simulated::{MAILGUN_ERROR_RECIPIENT, MAILGUN_ERROR_SUBJECT};
    use crate::mail::{Body, Mailer};
    use std::sync::{Arc, Mutex};

    fn simulated() -> MailgunProvider {
        MailgunProvider::new(&MailgunSettings {
            simulate: true,
            ..MailgunSettings::default()
        })
    }

    fn mailer(provider: MailgunProvider) -> Mailer {
        Mailer::new(Box::new(provider), "noreply@example.com")
    }

    #[test]
    fn test_live_backend_requires_real_key() {
        assert!(MailgunProvider::new(&MailgunSettings::default()).is_simulated());

        let provider = MailgunProvider::new(&MailgunSettings {
            api_key: "key-123".to_string(),
            ..MailgunSettings::default()
        });
        assert!(!provider.is_simulated());
    }

    #[test]
    fn test_payload_is_flat_form() {
        let message = Message {
            recipient: Some("a@b.com".to_string()),
            sender: "noreply@example.com".to_string(),
            subject: Some("Hi".to_string()),
            body: Some(Body::Text("Hello".to_string())),
        };

        assert_eq!(
            Value::Object(simulated().build_payload(&message)),
            json!({"from": "noreply@example.com", "to": "a@b.com", "subject": "Hi", "text": "Hello"})
        );
    }

    #[test]
    fn test_simulated_send() {
        let receipt = mailer(simulated())
            .set_recipient("a@b.com")
            .set_subject("Hi")
            .set_html_content("<p>Hello</p>")
            .send()
            .unwrap();

        assert_eq!(receipt.provider, "mailgun");
        assert!(receipt.message_id.ends_with("@mailgun.org>"));
    }

    #[test]
    fn test_simulated_failures() {
        for (to, subject) in [
            (MAILGUN_ERROR_RECIPIENT, "Hi"),
            ("a@b.com", MAILGUN_ERROR_SUBJECT),
        ] {
            let err = mailer(simulated())
                .set_recipient(to)
                .set_subject(subject)
                .set_text_content("Hello")
                .send()
                .unwrap_err();
            assert!(err.to_string().starts_with("Mailgun API error"));
        }
    }

    #[test]
    fn test_provider_payload_excludes_credential() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let backend = SimulatedTransport::new(DISPLAY_NAME, mailgun_backend)
            .with_credential("auth_key", "MAILGUN_API_KEY_DEFAULT_WARNING");
        let transport = move |payload: &Payload| -> MailResult<Value> {
            let response = backend.post(payload)?;
            *sink.lock().unwrap() = Some(payload.clone());
            Ok(response)
        };

        mailer(MailgunProvider::with_transport(LengthLimits::default(), transport))
            .set_recipient("a@b.com")
            .set_subject("Hi")
            .set_text_content("Hello")
            .send()
            .unwrap();

        // The provider's own payload stays free of credentials
        let payload = seen.lock().unwrap().take().unwrap();
        assert!(!payload.contains_key("auth_key"));
    }

    #[test]
    fn test_interpret_variants() {
        let provider = simulated();

        let receipt = provider
            .interpret(json!({"id": "<x@mailgun.org>", "message": QUEUED_ACK}))
            .unwrap();
        assert_eq!(receipt.message_id, "<x@mailgun.org>");

        let err = provider.interpret(json!({"status": "failed"})).unwrap_err();
        assert!(err.to_string().contains("Unknown Mailgun API error."));

        let err = provider
            .interpret(json!({"status": "failed", "message": "Domain not found"}))
            .unwrap_err();
        assert!(err.to_string().contains("Domain not found"));

        // Acknowledgement without an id is not a success
        assert!(provider.interpret(json!({"message": QUEUED_ACK})).is_err());
        assert!(provider.interpret(Value::Null).is_err());
    }
}
