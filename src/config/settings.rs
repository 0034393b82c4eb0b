//! Configuration settings structures for courier-rs
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

/// Substring marking a credential as a placeholder rather than a live key
pub const PLACEHOLDER_MARKER: &str = "DEFAULT_WARNING";

// ============================================================================
// Default value functions
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/courier.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_sender() -> String {
    "noreply@example.com".to_string()
}

fn default_max_address_length() -> usize {
    254
}

fn default_max_subject_length() -> usize {
    255
}

fn default_max_text_length() -> usize {
    10_000
}

fn default_max_html_length() -> usize {
    50_000
}

fn default_sendgrid_api_url() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}

fn default_mailgun_api_base_url() -> String {
    "https://api.mailgun.net/v3/".to_string()
}

fn default_mailgun_domain() -> String {
    "sandbox.mailgun.org".to_string()
}

// ============================================================================
// Logger Settings (compatible with LoggerConfig)
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to LoggerConfig
    ///
    /// This method transforms the configuration file representation into
    /// the runtime LoggerConfig used by the logger module.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        Ok(FileConfig::new(
            self.enabled,
            PathBuf::from(self.path),
            self.append,
            format,
        ))
    }
}

// ============================================================================
// Mail Provider Settings
// ============================================================================

/// Per-provider maximum lengths, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthLimits {
    /// Maximum length of the recipient and sender addresses
    #[serde(default = "default_max_address_length")]
    pub address: usize,

    /// Maximum subject length
    #[serde(default = "default_max_subject_length")]
    pub subject: usize,

    /// Maximum plain-text body length
    #[serde(default = "default_max_text_length")]
    pub text: usize,

    /// Maximum HTML body length
    #[serde(default = "default_max_html_length")]
    pub html: usize,
}

impl Default for LengthLimits {
    fn default() -> Self {
        Self {
            address: default_max_address_length(),
            subject: default_max_subject_length(),
            text: default_max_text_length(),
            html: default_max_html_length(),
        }
    }
}

/// SendGrid (JSON API, bearer credential)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendGridSettings {
    /// API key; empty or placeholder keys select the simulated backend
    #[serde(default)]
    pub api_key: String,

    /// Mail send endpoint
    #[serde(default = "default_sendgrid_api_url")]
    pub api_url: String,

    /// Force the simulated backend even when a live key is configured
    #[serde(default)]
    pub simulate: bool,

    #[serde(default)]
    pub limits: LengthLimits,
}

impl Default for SendGridSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_sendgrid_api_url(),
            simulate: false,
            limits: LengthLimits::default(),
        }
    }
}

impl SendGridSettings {
    /// Whether requests should go to the real SendGrid endpoint
    pub fn uses_live_backend(&self) -> bool {
        !self.simulate && is_live_credential(&self.api_key)
    }
}

/// Mailgun (form-encoded API, basic auth)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailgunSettings {
    /// API key; empty or placeholder keys select the simulated backend
    #[serde(default)]
    pub api_key: String,

    /// Regional API base, e.g. `https://api.eu.mailgun.net/v3/`
    #[serde(default = "default_mailgun_api_base_url")]
    pub api_base_url: String,

    /// Sending domain, part of the endpoint path
    #[serde(default = "default_mailgun_domain")]
    pub domain: String,

    /// Force the simulated backend even when a live key is configured
    #[serde(default)]
    pub simulate: bool,

    #[serde(default)]
    pub limits: LengthLimits,
}

impl Default for MailgunSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_mailgun_api_base_url(),
            domain: default_mailgun_domain(),
            simulate: false,
            limits: LengthLimits::default(),
        }
    }
}

impl MailgunSettings {
    /// Whether requests should go to the real Mailgun endpoint
    pub fn uses_live_backend(&self) -> bool {
        !self.simulate && is_live_credential(&self.api_key)
    }

    /// Full messages endpoint: `{api_base_url}{domain}/messages`
    pub fn messages_url(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        format!("{}/{}/messages", base, self.domain.trim_matches('/'))
    }
}

/// Provider settings consumed by the selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSettings {
    /// Sender used until a caller overrides it
    #[serde(default = "default_sender")]
    pub default_sender: String,

    #[serde(default)]
    pub sendgrid: SendGridSettings,

    #[serde(default)]
    pub mailgun: MailgunSettings,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            default_sender: default_sender(),
            sendgrid: SendGridSettings::default(),
            mailgun: MailgunSettings::default(),
        }
    }
}

impl MailSettings {
    /// Settings that route every provider to its simulated backend
    pub fn simulated() -> Self {
        let mut settings = Self::default();
        settings.sendgrid.simulate = true;
        settings.mailgun.simulate = true;
        settings
    }
}

/// A credential is live when it is non-blank and not a placeholder value.
pub fn is_live_credential(key: &str) -> bool {
    !key.trim().is_empty() && !key.contains(PLACEHOLDER_MARKER)
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// Mail provider configuration
    #[serde(default)]
    pub mail: MailSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_limits() -> impl Strategy<Value = LengthLimits> {
        (1usize..=1000, 1usize..=1000, 1usize..=100_000, 1usize..=100_000).prop_map(
            |(address, subject, text, html)| LengthLimits {
                address,
                subject,
                text,
                html,
            },
        )
    }

    fn arb_mail_settings() -> impl Strategy<Value = MailSettings> {
        (
            "[a-z]{1,10}@[a-z]{1,10}\\.com",
            "[A-Za-z0-9._]{0,40}",
            any::<bool>(),
            arb_limits(),
            "[A-Za-z0-9._]{0,40}",
            "[a-z]{1,12}\\.org",
            any::<bool>(),
            arb_limits(),
        )
            .prop_map(
                |(sender, sg_key, sg_sim, sg_limits, mg_key, domain, mg_sim, mg_limits)| {
                    MailSettings {
                        default_sender: sender,
                        sendgrid: SendGridSettings {
                            api_key: sg_key,
                            simulate: sg_sim,
                            limits: sg_limits,
                            ..SendGridSettings::default()
                        },
                        mailgun: MailgunSettings {
                            api_key: mg_key,
                            domain,
                            simulate: mg_sim,
                            limits: mg_limits,
                            ..MailgunSettings::default()
                        },
                    }
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_settings_round_trip_serialization(mail in arb_mail_settings()) {
            let settings = Settings { mail, ..Settings::default() };
            let toml_str = toml::to_string(&settings)
                .expect("Settings should serialize to TOML");
            let deserialized: Settings = toml::from_str(&toml_str)
                .expect("TOML should deserialize back to Settings");
            prop_assert_eq!(settings, deserialized);
        }
    }

    #[test]
    fn test_length_limit_defaults() {
        let limits = LengthLimits::default();
        assert_eq!(limits.address, 254);
        assert_eq!(limits.subject, 255);
        assert_eq!(limits.text, 10_000);
        assert_eq!(limits.html, 50_000);
    }

    #[test]
    fn test_mail_settings_defaults() {
        let mail = MailSettings::default();
        assert_eq!(mail.default_sender, "noreply@example.com");
        assert_eq!(mail.sendgrid.api_url, "https://api.sendgrid.com/v3/mail/send");
        assert_eq!(mail.mailgun.domain, "sandbox.mailgun.org");
        assert!(!mail.sendgrid.uses_live_backend());
        assert!(!mail.mailgun.uses_live_backend());
    }

    #[test]
    fn test_is_live_credential() {
        assert!(is_live_credential("SG.real-key"));
        assert!(!is_live_credential(""));
        assert!(!is_live_credential("   "));
        assert!(!is_live_credential("SG.mock_sendgrid_api_key_12345_DEFAULT_WARNING"));
    }

    #[test]
    fn test_simulate_overrides_live_key() {
        let mut sendgrid = SendGridSettings {
            api_key: "SG.real-key".to_string(),
            ..SendGridSettings::default()
        };
        assert!(sendgrid.uses_live_backend());
        sendgrid.simulate = true;
        assert!(!sendgrid.uses_live_backend());
    }

    #[test]
    fn test_mailgun_messages_url() {
        let mailgun = MailgunSettings::default();
        assert_eq!(
            mailgun.messages_url(),
            "https://api.mailgun.net/v3/sandbox.mailgun.org/messages"
        );

        let eu = MailgunSettings {
            api_base_url: "https://api.eu.mailgun.net/v3".to_string(),
            domain: "mg.example.com".to_string(),
            ..MailgunSettings::default()
        };
        assert_eq!(
            eu.messages_url(),
            "https://api.eu.mailgun.net/v3/mg.example.com/messages"
        );
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml_str = r#"
[mail]
default_sender = "team@example.org"

[mail.mailgun.limits]
subject = 100
"#;
        let settings: Settings = toml::from_str(toml_str).expect("Should deserialize");
        assert_eq!(settings.mail.default_sender, "team@example.org");
        assert_eq!(settings.mail.mailgun.limits.subject, 100);
        assert_eq!(settings.mail.mailgun.limits.html, 50_000);
        assert_eq!(settings.mail.sendgrid, SendGridSettings::default());
        assert_eq!(settings.logger, LoggerSettings::default());
    }

    #[test]
    fn test_logger_settings_into_logger_config() {
        let config = LoggerSettings::default()
            .into_logger_config()
            .expect("Should convert");
        assert_eq!(config.level, "info");
        assert!(config.console.enabled);
        assert!(!config.file.enabled);
        assert_eq!(config.file.format, LogFormat::Json);
    }

    #[test]
    fn test_file_settings_into_file_config_invalid_format() {
        let settings = FileSettings {
            format: "xml".to_string(),
            ..FileSettings::default()
        };
        let result = settings.into_file_config();
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "logger.file.format"
        ));
    }

    #[test]
    fn test_logger_settings_into_logger_config_both_disabled() {
        let settings = LoggerSettings {
            console: ConsoleSettings {
                enabled: false,
                colored: false,
            },
            ..LoggerSettings::default()
        };
        assert!(settings.into_logger_config().is_err());
    }
}
