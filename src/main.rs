use clap::Parser;

use courier_rs::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(version = courier_rs::pkg_version(), "courier-rs starting");

    execute_command(&cli, settings)
}
