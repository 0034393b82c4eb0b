//! Email provider abstraction.
//!
//! Callers obtain a [`Mailer`] from the [`ProviderSelector`], set the message
//! fields, and call `send`. Each provider validates against its own limits,
//! builds its wire payload, transmits through a live or simulated transport,
//! and normalizes the response into a [`SendReceipt`].

mod mailgun;
mod message;
mod provider;
mod selector;
mod sendgrid;
pub mod validation;

pub use mailgun::MailgunProvider;
pub use message::{Body, DeliveryStatus, Message, Payload, SendReceipt};
pub use provider::{EmailProvider, Mailer};
pub use selector::{ProviderKind, ProviderSelector};
pub use sendgrid::SendGridProvider;
pub use validation::is_well_formed_address;
