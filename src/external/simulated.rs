//! Simulated provider backends.
//!
//! Used when no real credential is configured or simulation is forced. Each
//! backend mimics the response shapes of the real service closely enough for
//! the providers' response interpretation to run unchanged. Specific
//! recipients and subjects trigger error responses.

use serde_json::{Value, json};
use uuid::Uuid;

use crate::mail::Payload;

/// Recipient that makes the simulated SendGrid backend fail
pub const SENDGRID_ERROR_RECIPIENT: &str = "error@example.com";
/// Subject that makes the simulated SendGrid backend fail
pub const SENDGRID_ERROR_SUBJECT: &str = "error_trigger_sendgrid";
/// Recipient that makes the simulated Mailgun backend fail
pub const MAILGUN_ERROR_RECIPIENT: &str = "error@mailgun.com";
/// Subject that makes the simulated Mailgun backend fail
pub const MAILGUN_ERROR_SUBJECT: &str = "error_trigger_mailgun";

fn non_empty<'a>(root: &'a Value, pointer: &str) -> Option<&'a str> {
    root.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn sendgrid_error(message: &str) -> Value {
    json!({"errors": [{"message": message}]})
}

/// Answers a SendGrid v3 mail payload.
pub fn sendgrid_backend(payload: &Payload) -> Value {
    let root = Value::Object(payload.clone());

    let recipient = non_empty(&root, "/personalizations/0/to/0/email");
    let sender = non_empty(&root, "/from/email");
    let subject = non_empty(&root, "/subject");
    let content = non_empty(&root, "/content/0/value");

    let (Some(recipient), Some(_), Some(subject), Some(_)) = (recipient, sender, subject, content)
    else {
        let missing = match (recipient, sender, subject) {
            (None, _, _) => "recipient",
            (_, None, _) => "sender",
            (_, _, None) => "subject",
            _ => "content",
        };
        return sendgrid_error(&format!("Simulated SendGrid API error: missing {missing}"));
    };

    if recipient == SENDGRID_ERROR_RECIPIENT {
        return sendgrid_error("Simulated SendGrid API error: invalid recipient");
    }
    if subject == SENDGRID_ERROR_SUBJECT {
        return sendgrid_error("Simulated SendGrid API error: subject triggered failure");
    }

    json!({
        "messages": [{"id": Uuid::new_v4().to_string(), "status": "queued"}]
    })
}

fn mailgun_failure(message: &str) -> Value {
    json!({"message": message, "status": "failed"})
}

/// Answers a Mailgun messages form payload.
pub fn mailgun_backend(payload: &Payload) -> Value {
    let root = Value::Object(payload.clone());

    for (field, label) in [("/from", "from"), ("/to", "to"), ("/subject", "subject")] {
        if non_empty(&root, field).is_none() {
            return mailgun_failure(&format!("'{label}' parameter is not specified"));
        }
    }
    if non_empty(&root, "/text").is_none() && non_empty(&root, "/html").is_none() {
        return mailgun_failure("Need at least one of 'text' or 'html' parameters specified");
    }

    if non_empty(&root, "/to") == Some(MAILGUN_ERROR_RECIPIENT) {
        return mailgun_failure("Simulated Mailgun API error: invalid recipient");
    }
    if non_empty(&root, "/subject") == Some(MAILGUN_ERROR_SUBJECT) {
        return mailgun_failure("Simulated Mailgun API error: subject triggered failure");
    }

    json!({
        "id": format!("<{}@mailgun.org>", Uuid::new_v4()),
        "message": "Queued. Thank you.",
    })
}
