//! CLI subcommand implementations.

pub mod history;
pub mod label;
pub mod log;
pub mod serve;
pub mod status;
