//! imgpress - local batch image converter.

#![allow(dead_code)]

mod archive;
mod batch;
mod cli;
mod codec;
mod convert;
mod error;
mod intake;
mod logger;
mod options;
mod store;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Convert { args } => cli::convert::run_convert(args),
    }
}
