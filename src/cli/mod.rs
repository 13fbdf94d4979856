//! CLI module for podar
//!
//! Argument types, command handlers and logging setup for the `podar` binary.

mod args;
mod commands;
mod logging;

pub use args::{Cli, Command, OutputFormat, ScheduleArgs, ValidateArgs};
pub use commands::{run_command, schedule_table, ScheduleRow};
pub use logging::{init_tracing, LogLevel};
