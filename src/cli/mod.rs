//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing and subcommand handlers.

mod args;
mod commands;
mod live;

pub use args::{Args, Command};
pub use commands::{handle_config_action, list_cameras, list_ramps, render_still, resolve_options};
pub use live::run_live;
