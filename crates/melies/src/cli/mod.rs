//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the
//! melies binary.

mod cleanup;
mod commands;
mod run;
mod serve;
mod wire;

pub use cleanup::handle_cleanup;
pub use commands::{Cli, Commands};
pub use run::{run_pipeline, show_job};
pub use serve::handle_serve;
