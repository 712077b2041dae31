//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_policies;
pub mod output;
