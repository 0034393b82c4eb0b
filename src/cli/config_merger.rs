//! Configuration merger for CLI arguments and config files
//!
//! Loads settings through `ConfigLoader` and applies CLI overrides on top.
//! CLI arguments have the highest priority.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

/// Applies CLI argument overrides to file-based configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration selected by `--config` and `--env`
    ///
    /// # Errors
    /// Returns ConfigError if loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match &cli.config {
            Some(path) => ConfigLoader::from_file(path.clone()),
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Returns a copy of the base configuration with CLI overrides applied
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Commands::Send(args) = &cli.command
            && args.simulate
        {
            config.mail.sendgrid.simulate = true;
            config.mail.mailgun.simulate = true;
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn merged(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_verbose_and_quiet_set_log_level() {
        assert_eq!(merged(&["courier-rs", "--verbose", "providers"]).logger.level, "debug");
        assert_eq!(merged(&["courier-rs", "--quiet", "providers"]).logger.level, "error");
        assert_eq!(merged(&["courier-rs", "providers"]).logger.level, "info");
    }

    #[test]
    fn test_simulate_flag_forces_both_providers() {
        let settings = merged(&[
            "courier-rs", "send", "-p", "sendgrid", "--to", "a@b.com", "-s", "Hi", "--text", "x",
            "--simulate",
        ]);
        assert!(settings.mail.sendgrid.simulate);
        assert!(settings.mail.mailgun.simulate);
    }

    #[test]
    fn test_merge_leaves_base_untouched() {
        let merger = ConfigurationMerger::new(Settings::default());
        let cli = Cli::try_parse_from(["courier-rs", "--verbose", "check"]).unwrap();
        merger.merge_cli_args(&cli).unwrap();
        assert_eq!(merger.config(), &Settings::default());
    }

    #[test]
    fn test_merge_rejects_invalid_base() {
        let mut base = Settings::default();
        base.mail.default_sender = "not-an-address".to_string();
        let cli = Cli::try_parse_from(["courier-rs", "check"]).unwrap();

        assert!(matches!(
            ConfigurationMerger::new(base).merge_cli_args(&cli),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
