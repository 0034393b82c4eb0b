//! Name-based provider selection.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::mailgun::MailgunProvider;
use super::provider::{EmailProvider, Mailer};
use super::sendgrid::SendGridProvider;
use crate::config::MailSettings;
use crate::error::{MailError, MailResult};

/// Every provider the selector can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    SendGrid,
    Mailgun,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::SendGrid, ProviderKind::Mailgun];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::SendGrid => SendGridProvider::NAME,
            ProviderKind::Mailgun => MailgunProvider::NAME,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = MailError;

    /// Matches provider names case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| MailError::ProviderNotImplemented {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds a fresh, ready-to-configure [`Mailer`] for a provider name.
///
/// Each call constructs a new provider instance; nothing is shared between
/// mailers except the process-wide HTTP client.
#[derive(Debug, Clone, Default)]
pub struct ProviderSelector {
    settings: MailSettings,
}

impl ProviderSelector {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MailSettings {
        &self.settings
    }

    /// Names accepted by [`select`](Self::select)
    pub fn available() -> Vec<&'static str> {
        ProviderKind::ALL.iter().map(ProviderKind::as_str).collect()
    }

    /// Constructs the provider for `kind` from the current settings
    pub fn provider(&self, kind: ProviderKind) -> Box<dyn EmailProvider> {
        match kind {
            ProviderKind::SendGrid => Box::new(SendGridProvider::new(&self.settings.sendgrid)),
            ProviderKind::Mailgun => Box::new(MailgunProvider::new(&self.settings.mailgun)),
        }
    }

    /// Returns a new mailer for `name` with the default sender pre-filled.
    ///
    /// # Errors
    /// `ProviderNotImplemented` naming the rejected identifier
    pub fn select(&self, name: &str) -> MailResult<Mailer> {
        let kind: ProviderKind = name.parse()?;
        debug!(provider = %kind, "Provider selected");

        Ok(Mailer::new(
            self.provider(kind),
            self.settings.default_sender.clone(),
        ))
    }
}
