mod cli;
mod platform;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (destination, level) = cli.log_settings();
    folio_logging::initialize(destination, level, &cli.log_path());

    let config = cli.converter_config()?;
    platform::run_app(cli.session(), config, cli.mode())
}
