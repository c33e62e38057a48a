//! bindata - embed files as Rust source with an HTTP serving runtime.

mod cli;
mod config;
mod emit;
mod encode;
mod format;
mod generate;
mod logger;
mod registry;
mod runtime;
mod walk;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;
    generate::run(&config)?;
    Ok(())
}
