//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, ConvertArgs};
pub use commands::{handle_config_action, list_subsets, run_convert, CliError};
pub use enums::{CharacterSet, ModeArg};
