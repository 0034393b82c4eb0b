//! Check command handler
//!
//! Reports the effective mail configuration without sending anything.
//! Credentials are never printed.

use crate::config::Settings;
use crate::mail::ProviderKind;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// One line per provider: name, backend in use and endpoint
    pub fn report(&self) -> Vec<String> {
        let mail = &self.config.mail;

        ProviderKind::ALL
            .iter()
            .map(|kind| {
                let (live, endpoint) = match kind {
                    ProviderKind::SendGrid => {
                        (mail.sendgrid.uses_live_backend(), mail.sendgrid.api_url.clone())
                    }
                    ProviderKind::Mailgun => {
                        (mail.mailgun.uses_live_backend(), mail.mailgun.messages_url())
                    }
                };
                let backend = if live { "live" } else { "simulated" };
                format!("{:<10} {:<10} {}", kind.as_str(), backend, endpoint)
            })
            .collect()
    }

    /// Settings were validated while loading; this prints the summary.
    pub fn execute(&self) -> anyhow::Result<()> {
        println!("Configuration OK");
        println!("default sender: {}", self.config.mail.default_sender);
        for line in self.report() {
            println!("{}", line);
        }
        Ok(())
    }
}
