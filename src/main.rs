//! This crate contains the source code for the binary for the delvemap level editor.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use delvemap::{cli::Cli, logging, App, Config};

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    logging::init(logging::level_from_verbosity(config.log_level, cli.verbose))?;

    let output = App::new(config, &cli.config, cli.level.as_deref()).run(&cli.command)?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
