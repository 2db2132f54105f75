// Library root: re-exports the CLI's modules so integration tests can drive
// the subcommands without spawning the binary.

pub mod commands;
pub mod config;
pub mod report;
