mod mail_error;

pub use mail_error::{MailError, MailResult};
