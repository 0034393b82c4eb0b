//! Configuration validation logic
//!
//! Validation methods for the loaded settings, run once by the loader so
//! providers can treat their configuration as trusted constants.

use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, LengthLimits, LoggerSettings, MailSettings, MailgunSettings, SendGridSettings,
    Settings,
};
use crate::mail::is_well_formed_address;

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

impl LengthLimits {
    /// Every limit must allow at least one character
    pub fn validate(&self, prefix: &str) -> Result<(), ConfigError> {
        let limits = [
            ("address", self.address),
            ("subject", self.subject),
            ("text", self.text),
            ("html", self.html),
        ];

        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::validation(
                    format!("{}.limits.{}", prefix, name),
                    "Length limit must be greater than 0.",
                ));
            }
        }

        Ok(())
    }
}

impl SendGridSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.api_url) {
            return Err(ConfigError::ValidationError {
                field: "mail.sendgrid.api_url".to_string(),
                message: format!(
                    "Invalid endpoint '{}'. Expected an http:// or https:// URL.",
                    self.api_url
                ),
            });
        }

        self.limits.validate("mail.sendgrid")
    }
}

impl MailgunSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.api_base_url) {
            return Err(ConfigError::ValidationError {
                field: "mail.mailgun.api_base_url".to_string(),
                message: format!(
                    "Invalid endpoint '{}'. Expected an http:// or https:// URL.",
                    self.api_base_url
                ),
            });
        }

        if self.domain.trim().is_empty() {
            return Err(ConfigError::validation(
                "mail.mailgun.domain",
                "Mailgun sending domain is required.",
            ));
        }

        self.limits.validate("mail.mailgun")
    }
}

impl MailSettings {
    /// Validate provider settings
    ///
    /// # Validation Rules
    /// - Default sender must be a well-formed address
    /// - Endpoints must be http(s) URLs
    /// - Mailgun domain must not be empty
    /// - Every length limit must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_well_formed_address(&self.default_sender) {
            return Err(ConfigError::ValidationError {
                field: "mail.default_sender".to_string(),
                message: format!(
                    "Default sender '{}' is not a valid email address.",
                    self.default_sender
                ),
            });
        }

        self.sendgrid.validate()?;
        self.mailgun.validate()
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate the complete configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.mail.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_default_sender() {
        let mut settings = Settings::default();
        settings.mail.default_sender = "not-an-address".to_string();
        match settings.validate() {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "mail.default_sender")
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut settings = Settings::default();
        settings.mail.mailgun.limits.html = 0;
        match settings.validate() {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "mail.mailgun.limits.html")
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let mut settings = Settings::default();
        settings.mail.sendgrid.api_url = "ftp://api.sendgrid.com".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_mailgun_domain_rejected() {
        let mut settings = Settings::default();
        settings.mail.mailgun.domain = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = Settings::default();
        settings.logger.level = "verbose".to_string();
        match settings.validate() {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "logger.level"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }
}
