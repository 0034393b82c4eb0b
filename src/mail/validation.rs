//! Validation rules shared by every provider.
//!
//! Providers run these in a fixed order: required fields, address format,
//! then their own length limits. The first failure wins.

use std::sync::LazyLock;

use regex::Regex;

use super::message::{Body, Message};
use crate::config::LengthLimits;
use crate::error::{MailError, MailResult};

/// Something before an `@`, then a domain part containing a dot.
///
/// Deliberately permissive: internationalized domains are not checked here
/// and are left to the provider backends to accept or reject.
static ADDRESS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("address pattern is valid"));

/// Permissive address check used for recipients, senders and the configured default sender.
pub fn is_well_formed_address(address: &str) -> bool {
    ADDRESS_PATTERN.is_match(address)
}

/// The fields every provider requires, borrowed from a message that has them.
pub struct RequiredFields<'a> {
    pub recipient: &'a str,
    pub subject: &'a str,
    pub body: &'a Body,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Recipient, subject and one non-empty body, checked in that order.
pub fn require_fields(message: &Message) -> MailResult<RequiredFields<'_>> {
    let recipient =
        present(message.recipient.as_deref()).ok_or_else(|| MailError::missing("recipient"))?;
    let subject =
        present(message.subject.as_deref()).ok_or_else(|| MailError::missing("subject"))?;
    let body = message
        .body
        .as_ref()
        .filter(|body| !body.content().is_empty())
        .ok_or_else(|| MailError::missing("content (text or html)"))?;

    Ok(RequiredFields {
        recipient,
        subject,
        body,
    })
}

/// Format check on the recipient, then the sender.
pub fn check_addresses(recipient: &str, sender: &str) -> MailResult<()> {
    for (field, address) in [("recipient", recipient), ("sender", sender)] {
        if !is_well_formed_address(address) {
            return Err(MailError::invalid_address(
                field,
                format!("'{}' is not a valid email address", address),
            ));
        }
    }
    Ok(())
}

/// Length limits counted in characters: body, subject, recipient, sender.
pub fn enforce_limits(
    provider: &str,
    limits: &LengthLimits,
    fields: &RequiredFields<'_>,
    sender: &str,
) -> MailResult<()> {
    let body_limit = match fields.body {
        Body::Text(_) => limits.text,
        Body::Html(_) => limits.html,
    };

    let checks = [
        (fields.body.field(), fields.body.content(), body_limit),
        ("subject", fields.subject, limits.subject),
        ("recipient", fields.recipient, limits.address),
        ("sender", sender, limits.address),
    ];

    for (field, value, limit) in checks {
        if value.chars().count() > limit {
            return Err(MailError::too_long(field, provider, limit));
        }
    }

    Ok(())
}

/// Full shared validation pipeline for a provider with the given limits.
pub fn validate_message(provider: &str, limits: &LengthLimits, message: &Message) -> MailResult<()> {
    let fields = require_fields(message)?;
    check_addresses(fields.recipient, &message.sender)?;
    enforce_limits(provider, limits, &fields, &message.sender)
}
