//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the manimate binary.

mod animate;
mod check;
mod commands;

pub use animate::{AnimateOutcome, run_animate};
pub use check::run_check;
pub use commands::{AnimateArgs, Cli, Commands};
