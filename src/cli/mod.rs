//! CLI module for schemata
//!
//! Provides command-line interface for:
//! - models: List declared model types
//! - schema: Print a type's resolved schema
//! - validate: Construct and validate JSON records read from stdin

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{models, run, run_command, schema, validate};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_response};
