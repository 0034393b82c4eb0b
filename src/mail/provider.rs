//! Core email provider trait and the mailer that drives a send.
//!
//! A provider supplies the four backend-specific stages; [`Mailer`] owns the
//! message being assembled and runs the stages in a fixed order. Adding a
//! backend means implementing [`EmailProvider`] and registering it with the
//! selector.

use std::fmt;

use serde_json::Value;
use tracing::{debug, error, info, info_span, warn};

use super::message::{Body, Message, Payload, SendReceipt};
use crate::error::MailResult;

/// Backend-specific stages of a send.
///
/// Implementations must not perform I/O outside `transmit`, and must not
/// mutate the message.
///
/// # Example Implementation
/// ```ignore
/// pub struct LogOnlyProvider;
///
/// impl EmailProvider for LogOnlyProvider {
///     fn name(&self) -> &'static str { "log" }
///     fn validate(&self, message: &Message) -> MailResult<()> { Ok(()) }
///     fn build_payload(&self, message: &Message) -> Payload { Payload::new() }
///     fn transmit(&self, payload: &Payload) -> MailResult<Value> { Ok(Value::Null) }
///     fn interpret(&self, response: Value) -> MailResult<SendReceipt> {
///         Ok(SendReceipt::sent_with_generated_id(self.name()))
///     }
/// }
/// ```
pub trait EmailProvider: Send + Sync {
    /// Identifier reported in receipts and accepted by the selector
    fn name(&self) -> &'static str;

    /// Checks required fields, address format and this provider's length limits.
    ///
    /// # Returns
    /// The first violation found, as a validation error
    fn validate(&self, message: &Message) -> MailResult<()>;

    /// Builds the backend wire shape. Only called on a validated message.
    fn build_payload(&self, message: &Message) -> Payload;

    /// Delivers the payload, to the live backend or the simulated one.
    fn transmit(&self, payload: &Payload) -> MailResult<Value>;

    /// Maps the backend response to a receipt or a provider API error.
    fn interpret(&self, response: Value) -> MailResult<SendReceipt>;
}

/// A provider plus the message being built for one send.
///
/// Setters consume and return the mailer so calls chain; `send` consumes it,
/// so every send starts from a fresh mailer.
///
/// # Example
/// ```ignore
/// let receipt = selector
///     .select("sendgrid")?
///     .set_recipient("a@b.com")
///     .set_subject("Hi")
///     .set_text_content("Hello")
///     .send()?;
/// assert_eq!(receipt.provider, "sendgrid");
/// ```
pub struct Mailer {
    provider: Box<dyn EmailProvider>,
    message: Message,
}

impl Mailer {
    pub fn new(provider: Box<dyn EmailProvider>, default_sender: impl Into<String>) -> Self {
        Self {
            provider,
            message: Message::new(default_sender),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn set_recipient(mut self, address: impl Into<String>) -> Self {
        self.message.recipient = Some(address.into());
        self
    }

    pub fn set_subject(mut self, subject: impl Into<String>) -> Self {
        self.message.subject = Some(subject.into());
        self
    }

    /// Overrides the configured default sender
    pub fn set_sender(mut self, address: impl Into<String>) -> Self {
        self.message.sender = address.into();
        self
    }

    /// Sets a plain-text body, replacing any HTML body
    pub fn set_text_content(mut self, text: impl Into<String>) -> Self {
        self.message.body = Some(Body::Text(text.into()));
        self
    }

    /// Sets an HTML body, replacing any plain-text body
    pub fn set_html_content(mut self, html: impl Into<String>) -> Self {
        self.message.body = Some(Body::Html(html.into()));
        self
    }

    /// Validates, builds, transmits and interprets, stopping at the first error.
    ///
    /// Validation failures never reach the transport.
    pub fn send(self) -> MailResult<SendReceipt> {
        let span = info_span!("send", provider = self.provider.name());
        let _guard = span.enter();
        info!("Sending email");

        if let Err(e) = self.provider.validate(&self.message) {
            warn!(error = %e, "Message rejected");
            return Err(e);
        }

        let payload = self.provider.build_payload(&self.message);
        debug!(fields = ?payload.keys().collect::<Vec<_>>(), "Payload built");

        let response = self.provider.transmit(&payload).inspect_err(|e| {
            error!(error = %e, "Transmit failed");
        })?;

        let receipt = self.provider.interpret(response).inspect_err(|e| {
            error!(error = %e, "Backend reported failure");
        })?;

        info!(message_id = %receipt.message_id, "Email sent");
        Ok(receipt)
    }
}

impl fmt::Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer")
            .field("provider", &self.provider.name())
            .field("message", &self.message)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MailError;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Records which stages ran and fails on demand
    struct StagedProvider {
        stages: Arc<Mutex<Vec<&'static str>>>,
        reject: bool,
        response: Value,
    }

    impl StagedProvider {
        fn new(reject: bool, response: Value) -> (Self, Arc<Mutex<Vec<&'static str>>>) {
            let stages = Arc::new(Mutex::new(Vec::new()));
            let provider = Self {
                stages: Arc::clone(&stages),
                reject,
                response,
            };
            (provider, stages)
        }

        fn record(&self, stage: &'static str) {
            self.stages.lock().unwrap().push(stage);
        }
    }

    impl EmailProvider for StagedProvider {
        fn name(&self) -> &'static str {
            "staged"
        }

        fn validate(&self, _message: &Message) -> MailResult<()> {
            self.record("validate");
            if self.reject {
                return Err(MailError::missing("recipient"));
            }
            Ok(())
        }

        fn build_payload(&self, message: &Message) -> Payload {
            self.record("build");
            let mut payload = Payload::new();
            payload.insert("sender".to_string(), json!(message.sender));
            payload
        }

        fn transmit(&self, _payload: &Payload) -> MailResult<Value> {
            self.record("transmit");
            Ok(self.response.clone())
        }

        fn interpret(&self, response: Value) -> MailResult<SendReceipt> {
            self.record("interpret");
            match response["id"].as_str() {
                Some(id) => Ok(SendReceipt::sent(self.name(), id)),
                None => Err(MailError::provider_api("Staged", "no id")),
            }
        }
    }

    fn mailer(provider: StagedProvider) -> Mailer {
        Mailer::new(Box::new(provider), "noreply@example.com")
    }

    #[test]
    fn test_send_runs_stages_in_order() {
        let (provider, stages) = StagedProvider::new(false, json!({"id": "m-1"}));
        let receipt = mailer(provider).set_recipient("a@b.com").send().unwrap();

        assert_eq!(receipt, SendReceipt::sent("staged", "m-1"));
        assert_eq!(
            *stages.lock().unwrap(),
            vec!["validate", "build", "transmit", "interpret"]
        );
    }

    #[test]
    fn test_rejected_message_never_transmits() {
        let (provider, stages) = StagedProvider::new(true, json!({"id": "m-1"}));
        let err = mailer(provider).send().unwrap_err();

        assert!(err.is_validation());
        assert_eq!(*stages.lock().unwrap(), vec!["validate"]);
    }

    #[test]
    fn test_interpret_error_propagates() {
        let (provider, _) = StagedProvider::new(false, json!({}));
        assert!(matches!(
            mailer(provider).send(),
            Err(MailError::ProviderApi { .. })
        ));
    }

    #[test]
    fn test_body_setters_replace_each_other() {
        let (provider, _) = StagedProvider::new(false, Value::Null);
        let mailer = mailer(provider)
            .set_text_content("plain")
            .set_html_content("<b>rich</b>");
        assert_eq!(mailer.message().html(), Some("<b>rich</b>"));
        assert_eq!(mailer.message().text(), None);

        let mailer = mailer.set_text_content("plain again");
        assert_eq!(mailer.message().text(), Some("plain again"));
        assert_eq!(mailer.message().html(), None);
    }

    #[test]
    fn test_sender_defaults_until_overridden() {
        let (provider, _) = StagedProvider::new(false, Value::Null);
        let mailer = mailer(provider);
        assert_eq!(mailer.message().sender, "noreply@example.com");

        let mailer = mailer.set_sender("team@example.org");
        assert_eq!(mailer.message().sender, "team@example.org");
        assert_eq!(mailer.provider_name(), "staged");
    }

    #[test]
    fn test_setters_store_values_verbatim() {
        let (provider, _) = StagedProvider::new(false, Value::Null);
        let mailer = mailer(provider).set_recipient("").set_subject("  spaced  ");
        assert_eq!(mailer.message().recipient.as_deref(), Some(""));
        assert_eq!(mailer.message().subject.as_deref(), Some("  spaced  "));
    }
}
