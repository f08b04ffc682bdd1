//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::options::TargetFormat;

/// imgpress batch image converter CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert images to the target format
    #[command(visible_alias = "c")]
    Convert {
        #[command(flatten)]
        args: ConvertArgs,
    },
}

/// Convert command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Image files to convert, processed in the given order
    #[arg(value_name = "FILE", required = true, value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Target format
    #[arg(short, long, value_enum, default_value_t = TargetFormat::Webp)]
    pub format: TargetFormat,

    /// Quality from 1 to 100 (ignored for png)
    #[arg(short, long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Directory to write converted files into
    #[arg(short, long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub output: PathBuf,

    /// Bundle all converted images into converted-images.zip instead of
    /// writing individual files
    #[arg(short, long)]
    pub archive: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
