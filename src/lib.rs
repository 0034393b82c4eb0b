//! courier-rs Library
//!
//! Provider-agnostic transactional email: pick a provider by name, fill in a
//! message, send it, and get back a normalized receipt.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod mail;

pub use error::{MailError, MailResult};
pub use mail::{Mailer, ProviderSelector, SendReceipt};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
