//! CLI argument definitions and command entry points.

pub mod args;
pub mod convert;

pub use args::{Cli, Commands};
