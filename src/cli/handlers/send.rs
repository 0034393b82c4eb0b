//! Send command handler
//!
//! Builds a mailer through the selector, applies the CLI arguments and
//! prints the receipt as JSON on success.

use crate::cli::parser::SendArgs;
use crate::config::Settings;
use crate::mail::{ProviderSelector, SendReceipt};

/// Handler for the send command
pub struct SendCommandHandler {
    selector: ProviderSelector,
}

impl SendCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self {
            selector: ProviderSelector::new(config.mail),
        }
    }

    /// Sends the message described by `args`
    ///
    /// # Errors
    /// Any `MailError` from selection, validation or delivery, unchanged
    pub fn send(&self, args: &SendArgs) -> anyhow::Result<SendReceipt> {
        let mut mailer = self
            .selector
            .select(&args.provider)?
            .set_recipient(&args.to)
            .set_subject(&args.subject);

        if let Some(from) = &args.from {
            mailer = mailer.set_sender(from);
        }
        if let Some(text) = &args.text {
            mailer = mailer.set_text_content(text);
        }
        if let Some(html) = &args.html {
            mailer = mailer.set_html_content(html);
        }

        Ok(mailer.send()?)
    }

    /// Sends and prints the receipt to stdout
    pub fn execute(&self, args: &SendArgs) -> anyhow::Result<()> {
        let receipt = self.send(args)?;
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        Ok(())
    }
}
