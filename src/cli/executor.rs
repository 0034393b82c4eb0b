//! Command executor for dispatching CLI commands
//!
//! Entry point for executing CLI commands after parsing and configuration
//! loading.

use super::handlers::{CheckCommandHandler, SendCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::mail::ProviderSelector;

/// Execute a CLI command with the given settings
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
///
/// # Errors
/// Returns errors from command handlers
pub fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Send(args) => SendCommandHandler::new(settings).execute(args),
        Commands::Providers => {
            for name in ProviderSelector::available() {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Check => CheckCommandHandler::new(settings).execute(),
    }
}
