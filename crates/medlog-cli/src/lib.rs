//! Medication log CLI library.
//!
//! This crate provides the CLI interface for the medication log.

pub mod backend;
mod cli;
pub mod commands;
mod config;

pub use backend::{Backend, RemoteGateway, open_database};
pub use cli::{Cli, Commands};
pub use config::Config;
