//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build;

/// Send transactional email through interchangeable providers
#[derive(Parser, Debug)]
#[command(name = "courier-rs")]
#[command(about = "Send transactional email through interchangeable providers")]
#[command(long_about = "
courier-rs sends a single transactional email through a selectable provider
(SendGrid or Mailgun). Providers without a live API key answer from a local
simulated backend, so every command works offline.

EXAMPLES:
    # Send a plain-text message through SendGrid
    courier-rs send --provider sendgrid --to a@b.com --subject Hi --text Hello

    # Send HTML through Mailgun from a custom sender
    courier-rs send --provider mailgun --to a@b.com --subject Hi \\
        --html '<p>Hello</p>' --from team@example.org

    # Force the simulated backend even with live keys configured
    courier-rs send --provider sendgrid --to a@b.com --subject Hi --text Hello --simulate

    # List registered providers
    courier-rs providers

    # Validate configuration for production
    courier-rs --env production check
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load exactly this TOML file instead of the layered `config/` directory.
    /// Environment variable overrides still apply.
    ///
    /// Example: --config /etc/courier-rs/production.toml
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `config/{environment}.toml` layer is loaded.
    ///
    /// Available values: development (dev), test, staging (stage), production (prod)
    #[arg(short, long, global = true, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Cannot be used with --quiet.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Cannot be used with --verbose.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one email and print the receipt as JSON
    ///
    /// Examples:
    ///   courier-rs send --provider sendgrid --to a@b.com --subject Hi --text Hello
    ///   courier-rs send --provider mailgun --to a@b.com --subject Hi --html '<b>Hi</b>'
    Send(SendArgs),

    /// List the registered provider names
    Providers,

    /// Validate configuration and report which backends are live
    Check,
}

/// Arguments of the `send` command
#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Provider name, matched case-insensitively
    #[arg(short, long, value_name = "NAME")]
    pub provider: String,

    /// Recipient address
    #[arg(long, value_name = "ADDR")]
    pub to: String,

    /// Subject line
    #[arg(short, long)]
    pub subject: String,

    /// Plain-text body
    #[arg(long, conflicts_with = "html", required_unless_present = "html")]
    pub text: Option<String>,

    /// HTML body
    #[arg(long)]
    pub html: Option<String>,

    /// Sender address, overriding the configured default sender
    #[arg(long, value_name = "ADDR")]
    pub from: Option<String>,

    /// Answer from the simulated backend even when a live key is configured
    #[arg(long)]
    pub simulate: bool,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["courier-rs", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["courier-rs", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["courier-rs"]).is_err());
    }

    #[test]
    fn test_send_command() {
        let cli = Cli::try_parse_from([
            "courier-rs",
            "send",
            "--provider",
            "SendGrid",
            "--to",
            "a@b.com",
            "--subject",
            "Hi",
            "--text",
            "Hello",
        ])
        .unwrap();

        let Commands::Send(args) = cli.command else {
            panic!("Expected Send command");
        };
        assert_eq!(args.provider, "SendGrid");
        assert_eq!(args.to, "a@b.com");
        assert_eq!(args.text.as_deref(), Some("Hello"));
        assert!(args.html.is_none());
        assert!(args.from.is_none());
        assert!(!args.simulate);
    }

    #[test]
    fn test_send_requires_exactly_one_body() {
        let base = ["courier-rs", "send", "--provider", "mailgun", "--to", "a@b.com", "-s", "Hi"];

        let err = Cli::try_parse_from(base).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let both = [&base[..], &["--text", "t", "--html", "<b>h</b>"][..]].concat();
        let err = Cli::try_parse_from(both).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let html_only = [&base[..], &["--html", "<b>h</b>"][..]].concat();
        assert!(Cli::try_parse_from(html_only).is_ok());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["courier-rs", "check", "--env", "prod", "--verbose"]).unwrap();
        assert!(matches!(cli.command, Commands::Check));
        assert!(matches!(cli.env, Some(Environment::Production)));
        assert!(cli.verbose);
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["courier-rs", "--verbose", "--quiet", "providers"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
