//! CLI module for lessonhub
//!
//! Provides command-line interface for:
//! - serve: load configuration, open the store, run the HTTP server

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
