//! CLI command implementations for proc-parse.
//!
//! This module provides implementations for all CLI subcommands:
//! - `stat`, `meminfo`, `netdev`, `snmp`, `netstat`, `all`: record output
//! - `check`: Source accessibility validation
//! - `config`: Configuration file generation

pub mod check;
pub mod config;
pub mod dump;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use dump::{command_all, command_dump, OutputOptions, Target};
