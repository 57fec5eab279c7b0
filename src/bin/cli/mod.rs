//! CLI Module Organization
//!
//! - args: CLI argument structures
//! - commands: command execution, one sub-module per command family
//! - output: shared JSON and table printing helpers

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used items for convenience
pub use args::*;
pub use commands::*;
