use thiserror::Error;

/// Every failure a send can surface.
///
/// Validation variants are raised before any payload is built; `ProviderApi`
/// covers both transport failures and backend responses that signal an error.
#[derive(Error, Debug)]
pub enum MailError {
    /// A required message field (recipient, subject, content) was never set or is empty
    #[error("Missing required field: {field} is required")]
    MissingField { field: String },

    /// Recipient or sender failed the format check or exceeds the provider limit
    #[error("Invalid email address for {field}: {reason}")]
    InvalidAddress { field: String, reason: String },

    /// Subject exceeds the provider limit
    #[error("Invalid subject: {reason}")]
    InvalidSubject { reason: String },

    /// Text or HTML body exceeds the provider limit
    #[error("Invalid {field} content: {reason}")]
    InvalidContent { field: String, reason: String },

    /// The selector was asked for a provider it does not know
    #[error("Email provider '{name}' is not implemented")]
    ProviderNotImplemented { name: String },

    /// Transport failure or an error reported by the provider backend
    #[error("{provider} API error: {message}")]
    ProviderApi {
        provider: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl MailError {
    pub fn missing(field: impl Into<String>) -> Self {
        MailError::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_address(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MailError::InvalidAddress {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Builds the length error matching `field`, naming the provider and its limit.
    pub fn too_long(field: &str, provider: &str, limit: usize) -> Self {
        let reason = format!("exceeds the {provider} maximum of {limit} characters");
        match field {
            "subject" => MailError::InvalidSubject { reason },
            "text" | "html" => MailError::InvalidContent {
                field: field.to_string(),
                reason,
            },
            _ => MailError::InvalidAddress {
                field: field.to_string(),
                reason,
            },
        }
    }

    pub fn provider_api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        MailError::ProviderApi {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a transport-level failure, keeping the underlying cause as the source.
    pub fn transport(
        provider: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        MailError::ProviderApi {
            provider: provider.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// True for the variants raised by message validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MailError::MissingField { .. }
                | MailError::InvalidAddress { .. }
                | MailError::InvalidSubject { .. }
                | MailError::InvalidContent { .. }
        )
    }
}

/// Type alias for Result with MailError to simplify function signatures
pub type MailResult<T> = Result<T, MailError>;
