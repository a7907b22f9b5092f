//! Command-line interface.

mod commands;
mod helpers;
mod icons;
pub mod progress;

pub use commands::{is_verbose, run, Cli};
